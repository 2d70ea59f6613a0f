//! # taskline-layout
//!
//! Timeline layout engine for taskline.
//!
//! One pass goes raw records → normalizer → filter engine → layout engine →
//! link resolver, plus the today marker. Every step is a pure function of its
//! inputs and is recomputed whenever the window, filters, or task set change.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use serde_json::json;
//! use taskline_core::{Filters, TimeWindow};
//! use taskline_layout::compute_timeline;
//!
//! let raw = json!([
//!     {"id": "a", "title": "Design", "startDate": "2025-03-01", "dueDate": "2025-03-03"},
//!     {"id": "b", "title": "Build", "startDate": "2025-03-04", "dueDate": "2025-03-06",
//!      "dependsOn": "a:FS"}
//! ]);
//!
//! let window = TimeWindow::month(2025, 3).unwrap();
//! let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
//! let timeline = compute_timeline(&raw, window, &Filters::all(), today);
//!
//! assert_eq!(timeline.rows.len(), 2);
//! assert_eq!(timeline.links.len(), 1);
//! assert!(timeline.today_pct.is_some());
//! ```

pub mod filter;
pub mod layout;
pub mod links;
pub mod today;

pub use filter::{
    apply_filters, distinct_options, filter_options, matches_filters, overlaps, visible_tasks,
    FilterField, NameMatcher,
};
pub use layout::{layout_tasks, position_for, LayoutMap};
pub use links::{anchor_pcts, resolve_links, route};
pub use today::{autoscroll_offset, today_percent};

use chrono::NaiveDate;
use serde_json::Value;
use taskline_core::{Filters, Geometry, Task, TimeWindow, Timeline, TimelineRow};
use taskline_parser::{normalize_tasks, sort_tasks};
use tracing::debug;

/// Timeline computation with a fixed pixel geometry
#[derive(Clone, Debug, Default)]
pub struct TimelineEngine {
    pub geometry: Geometry,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Compute a timeline from canonical tasks.
    ///
    /// `tasks` must already be in display order (normally `(start, end)`);
    /// rows are assigned in that order.
    pub fn compute(&self, tasks: &[Task], window: TimeWindow, filters: &Filters, today: NaiveDate) -> Timeline {
        let visible = visible_tasks(tasks, &window, filters);
        let layout = layout_tasks(&visible, &window);
        let links = resolve_links(&visible, &layout, &self.geometry);

        let rows: Vec<TimelineRow> = visible
            .iter()
            .enumerate()
            .map(|(row, task)| TimelineRow {
                task: (*task).clone(),
                position: position_for(task, row, &window),
            })
            .collect();

        debug!(
            total = tasks.len(),
            visible = rows.len(),
            links = links.len(),
            from = %window.from,
            to = %window.to,
            "timeline computed"
        );

        Timeline {
            window,
            geometry: self.geometry,
            rows,
            links,
            today,
            today_pct: today_percent(&window, today),
            filter_options: filter_options(tasks),
            dropped_records: 0,
        }
    }

    /// Normalize, sort and compute from a raw payload in any storage shape
    pub fn compute_raw(&self, raw: &Value, window: TimeWindow, filters: &Filters, today: NaiveDate) -> Timeline {
        let mut normalized = normalize_tasks(raw);
        sort_tasks(&mut normalized.tasks);
        let mut timeline = self.compute(&normalized.tasks, window, filters, today);
        timeline.dropped_records = normalized.dropped;
        timeline
    }
}

/// Compute a timeline from raw records with the default geometry
pub fn compute_timeline(raw: &Value, window: TimeWindow, filters: &Filters, today: NaiveDate) -> Timeline {
    TimelineEngine::new().compute_raw(raw, window, filters, today)
}
