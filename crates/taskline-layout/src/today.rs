//! Today marker and initial scroll position

use chrono::NaiveDate;
use taskline_core::dates::to_percent;
use taskline_core::TimeWindow;

/// Position of `today` in the window, or `None` when it falls outside
pub fn today_percent(window: &TimeWindow, today: NaiveDate) -> Option<f64> {
    window
        .contains(today)
        .then(|| to_percent(today, window.from, window.to))
}

/// Horizontal scroll offset that centers the today marker in the viewport.
///
/// `None` when there is no marker to center.
pub fn autoscroll_offset(total_width: f64, viewport_width: f64, today_pct: Option<f64>) -> Option<f64> {
    let pct = today_pct?;
    let x = total_width * pct / 100.0 - viewport_width / 2.0;
    Some(x.clamp(0.0, total_width.max(0.0)))
}
