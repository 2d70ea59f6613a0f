//! Date and scale utilities
//!
//! Pure functions mapping calendar dates to day offsets and to percentage
//! positions inside a time window. Time of day never enters the math: every
//! value here is a [`NaiveDate`].

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::TimeWindow;

/// Signed number of calendar days from `a` to `b`
pub fn day_offset(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Window width in days, never less than one
pub fn span_days(from: NaiveDate, to: NaiveDate) -> i64 {
    day_offset(from, to).max(1)
}

/// Position of `date` within `[from, to]` as a percentage in `[0, 100]`.
///
/// Dates outside the window are pinned to the nearest edge.
pub fn to_percent(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> f64 {
    let span = span_days(from, to);
    let offset = day_offset(from, date).clamp(0, span);
    offset as f64 / span as f64 * 100.0
}

/// Every calendar date from `from` to `to`, inclusive
pub fn day_scale(from: NaiveDate, to: NaiveDate) -> DayScale {
    DayScale {
        next: from,
        remaining: (day_offset(from, to) + 1).max(0) as usize,
    }
}

/// Iterator returned by [`day_scale`]
#[derive(Clone, Debug)]
pub struct DayScale {
    next: NaiveDate,
    remaining: usize,
}

impl Iterator for DayScale {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        if self.remaining > 0 {
            // succ_opt only fails at NaiveDate::MAX
            match current.succ_opt() {
                Some(d) => self.next = d,
                None => self.remaining = 0,
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DayScale {}

/// One column header in the day scale
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTick {
    pub date: NaiveDate,
    /// Day of month, or the short month name on the 1st
    pub label: String,
    /// First column of the window or first day of a month
    pub month_start: bool,
    pub today: bool,
}

/// Header ticks for every day in `window`
pub fn day_ticks(window: &TimeWindow, today: NaiveDate) -> Vec<DayTick> {
    day_scale(window.from, window.to)
        .enumerate()
        .map(|(i, date)| DayTick {
            date,
            label: if date.day() == 1 {
                date.format("%b").to_string()
            } else {
                date.day().to_string()
            },
            month_start: i == 0 || date.day() == 1,
            today: date == today,
        })
        .collect()
}
