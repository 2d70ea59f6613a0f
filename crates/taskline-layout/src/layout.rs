//! Layout engine: one row per visible task, horizontal span from dates

use std::collections::HashMap;

use taskline_core::dates::to_percent;
use taskline_core::{LayoutPosition, Task, TaskId, TimeWindow};

/// Layout positions for one pass, keyed by task ID
#[derive(Clone, Debug, Default)]
pub struct LayoutMap {
    positions: HashMap<TaskId, LayoutPosition>,
    rows: usize,
}

impl LayoutMap {
    pub fn get(&self, id: &str) -> Option<&LayoutPosition> {
        self.positions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Number of rows laid out
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Position of a single task inside `window` at `row`
pub fn position_for(task: &Task, row: usize, window: &TimeWindow) -> LayoutPosition {
    LayoutPosition {
        row,
        left_pct: to_percent(task.start, window.from, window.to),
        right_pct: to_percent(task.end, window.from, window.to),
    }
}

/// Assign rows in list order. The caller sorts; no packing is attempted.
///
/// A repeated ID keeps the position of its last occurrence.
pub fn layout_tasks(tasks: &[&Task], window: &TimeWindow) -> LayoutMap {
    let positions = tasks
        .iter()
        .enumerate()
        .map(|(row, task)| (task.id.clone(), position_for(task, row, window)))
        .collect();
    LayoutMap {
        positions,
        rows: tasks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn rows_follow_input_order() {
        let a = Task::new("a", date(3, 10));
        let b = Task::new("b", date(3, 1));
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let layout = layout_tasks(&[&a, &b], &window);
        assert_eq!(layout.get("a").unwrap().row, 0);
        assert_eq!(layout.get("b").unwrap().row, 1);
        assert_eq!(layout.rows(), 2);
    }

    #[test]
    fn spans_are_window_percentages() {
        let task = Task::new("t", date(3, 1)).ends(date(3, 16));
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let pos = position_for(&task, 0, &window);
        assert_eq!(pos.left_pct, 0.0);
        assert_eq!(pos.right_pct, 50.0);
        assert_eq!(pos.width_pct(), 50.0);
    }

    #[test]
    fn spans_clip_to_window() {
        let task = Task::new("t", date(2, 10)).ends(date(4, 10));
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let pos = position_for(&task, 0, &window);
        assert_eq!(pos.left_pct, 0.0);
        assert_eq!(pos.right_pct, 100.0);
    }

    #[test]
    fn zero_length_task_keeps_a_sliver() {
        let task = Task::new("m", date(3, 16));
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let pos = position_for(&task, 0, &window);
        assert_eq!(pos.left_pct, pos.right_pct);
        assert_eq!(pos.width_pct(), 0.5);
    }

    #[test]
    fn duplicate_ids_keep_last_row() {
        let first = Task::new("dup", date(3, 1));
        let second = Task::new("dup", date(3, 5));
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let layout = layout_tasks(&[&first, &second], &window);
        assert_eq!(layout.get("dup").unwrap().row, 1);
        assert_eq!(layout.rows(), 2);
    }

    #[test]
    fn empty_layout() {
        let window = TimeWindow::new(date(3, 1), date(3, 31));
        let layout = layout_tasks(&[], &window);
        assert!(layout.is_empty());
        assert!(!layout.contains("x"));
    }
}
