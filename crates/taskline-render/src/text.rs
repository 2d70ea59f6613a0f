//! Plain-text timeline rendering for terminals and logs

use std::fmt::Write;

use taskline_core::{RenderError, Renderer, Timeline};

use crate::truncate;

/// ASCII timeline renderer
///
/// ```text
/// Design      |####......................| 2025-03-01 → 2025-03-05 DONE
/// Build       |.....##########...........| 2025-03-06 → 2025-03-20 BLOCKED
/// ```
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of the bar area in characters
    pub bar_width: usize,
    /// Width of the title column in characters
    pub label_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            bar_width: 40,
            label_width: 20,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bar_width(mut self, width: usize) -> Self {
        self.bar_width = width.max(1);
        self
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width.max(4);
        self
    }

    /// Character cells covered by a bar spanning `left_pct..right_pct`
    fn bar(&self, left_pct: f64, right_pct: f64) -> String {
        let width = self.bar_width.max(1);
        let cells = width as f64;
        let start = (((left_pct / 100.0) * cells).floor() as usize).min(width - 1);
        let end = (((right_pct / 100.0) * cells).ceil() as usize).clamp(start + 1, width);
        (0..width)
            .map(|i| if i >= start && i < end { '#' } else { '.' })
            .collect()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, timeline: &Timeline) -> Result<String, RenderError> {
        let mut out = String::new();
        let window = &timeline.window;
        writeln!(out, "Timeline {} → {}", window.from, window.to)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        if timeline.is_empty() {
            writeln!(out, "  (no tasks)").map_err(|e| RenderError::Format(e.to_string()))?;
        }

        for row in &timeline.rows {
            let task = &row.task;
            writeln!(
                out,
                "{:<width$} |{}| {} → {} {}",
                truncate(&task.title, self.label_width),
                self.bar(row.position.left_pct, row.position.right_pct),
                task.start,
                task.end,
                task.status,
                width = self.label_width
            )
            .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        if !timeline.links.is_empty() {
            writeln!(out, "Links:").map_err(|e| RenderError::Format(e.to_string()))?;
            for link in &timeline.links {
                writeln!(out, "  {} -{}-> {}", link.from_id, link.dep_type, link.to_id)
                    .map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }

        match timeline.today_pct {
            Some(pct) => writeln!(out, "Today: {} ({:.1}%)", timeline.today, pct),
            None => writeln!(out, "Today: {} (outside window)", timeline.today),
        }
        .map_err(|e| RenderError::Format(e.to_string()))?;

        if timeline.dropped_records > 0 {
            writeln!(out, "Dropped records: {}", timeline.dropped_records)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        Ok(out)
    }
}
