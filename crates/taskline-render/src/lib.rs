//! # taskline-render
//!
//! Rendering backends for computed timelines.
//!
//! This crate provides:
//! - SVG timeline rendering (bars, day header, today line, dependency links)
//! - Plain-text rendering for terminals
//!
//! ## Example
//!
//! ```rust,ignore
//! use taskline_core::Renderer;
//! use taskline_render::{SvgTimelineRenderer, TextRenderer};
//!
//! let svg = SvgTimelineRenderer::new().render(&timeline)?;
//! let text = TextRenderer::new().render(&timeline)?;
//! ```

pub mod text;

pub use text::TextRenderer;

use svg::node::element::{Definitions, Group, Line, Marker, Path, Rectangle, Text};
use svg::Document;
use taskline_core::dates::{day_ticks, to_percent};
use taskline_core::{DependencyType, RenderError, Renderer, TaskStatus, Timeline, TimelineRow};

/// SVG timeline renderer configuration.
///
/// Chart width and row metrics come from the timeline's own geometry so
/// bars and links share one coordinate space.
#[derive(Clone, Debug)]
pub struct SvgTimelineRenderer {
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Draw dependency links
    pub show_dependencies: bool,
    /// Draw the today line
    pub show_today: bool,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Link and arrowhead color
    pub link_color: String,
    /// Today line color
    pub today_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgTimelineRenderer {
    fn default() -> Self {
        Self {
            label_width: 180,
            header_height: 40,
            padding: 20,
            show_dependencies: true,
            show_today: true,
            background_color: "#ffffff".into(),
            grid_color: "#eef0f3".into(),
            text_color: "#1f2937".into(),
            link_color: "#9ca3af".into(),
            today_color: "#ef4444".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgTimelineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure label column width
    pub fn label_width(mut self, width: u32) -> Self {
        self.label_width = width;
        self
    }

    pub fn hide_dependencies(mut self) -> Self {
        self.show_dependencies = false;
        self
    }

    pub fn hide_today(mut self) -> Self {
        self.show_today = false;
        self
    }

    fn chart_left(&self) -> f64 {
        f64::from(self.padding + self.label_width)
    }

    fn chart_top(&self) -> f64 {
        f64::from(self.padding + self.header_height)
    }

    /// Bar fill for a status
    pub fn status_color(status: &TaskStatus) -> &'static str {
        match status {
            TaskStatus::Planned => "#94a3b8",
            TaskStatus::InProgress => "#3b82f6",
            TaskStatus::Blocked => "#ef4444",
            TaskStatus::Done | TaskStatus::Completed => "#22c55e",
            TaskStatus::Other(_) => "#a855f7",
        }
    }

    /// CSS class for a link, by dependency type
    pub fn link_class(dep_type: DependencyType) -> &'static str {
        match dep_type {
            DependencyType::FinishToStart => "glnk glnk--fs",
            DependencyType::StartToStart => "glnk glnk--ss",
            DependencyType::FinishToFinish => "glnk glnk--ff",
            DependencyType::StartToFinish => "glnk glnk--sf",
        }
    }

    /// Day labels along the top, month name on the 1st
    fn render_header(&self, timeline: &Timeline) -> Group {
        let g = &timeline.geometry;
        let window = &timeline.window;
        let mut group = Group::new().set("class", "header");

        let month_label = window.from.format("%B %Y").to_string();
        group = group.add(
            Text::new(month_label)
                .set("x", self.padding)
                .set("y", self.padding + 14)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 2)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str()),
        );

        let label_y = self.chart_top() - 8.0;
        for tick in day_ticks(window, timeline.today) {
            let x = self.chart_left() + g.pct_to_x(to_percent(tick.date, window.from, window.to));
            let mut class = String::from("gantt__tick");
            if tick.month_start {
                class.push_str(" gantt__tick--month");
            }
            if tick.today {
                class.push_str(" gantt__tick--today");
            }
            let fill = if tick.today {
                self.today_color.as_str()
            } else {
                self.text_color.as_str()
            };
            group = group.add(
                Text::new(tick.label)
                    .set("class", class)
                    .set("x", x)
                    .set("y", label_y)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size.saturating_sub(2))
                    .set("fill", fill)
                    .set("text-anchor", "middle"),
            );
        }
        group
    }

    /// Vertical day grid behind the bars
    fn render_grid(&self, timeline: &Timeline) -> Group {
        let g = &timeline.geometry;
        let window = &timeline.window;
        let mut group = Group::new().set("class", "grid");
        let height = g.total_height(timeline.rows.len());

        for tick in day_ticks(window, timeline.today) {
            let x = g.pct_to_x(to_percent(tick.date, window.from, window.to));
            group = group.add(
                Line::new()
                    .set("x1", x)
                    .set("y1", 0)
                    .set("x2", x)
                    .set("y2", height)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", if tick.month_start { 2 } else { 1 }),
            );
        }
        group
    }

    fn render_row(&self, timeline: &Timeline, row: &TimelineRow) -> Group {
        let g = &timeline.geometry;
        let task = &row.task;
        let pos = &row.position;
        let mut group = Group::new()
            .set("class", "gantt__row")
            .set("data-task", task.id.as_str());

        group = group.add(
            Text::new(truncate(&task.title, 24))
                .set("x", -f64::from(self.label_width) + 8.0)
                .set("y", g.row_center_y(pos.row) + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size)
                .set("fill", self.text_color.as_str()),
        );

        let status_class = format!("gantt__bar gantt__bar--{}", task.status.as_str().to_lowercase());
        group = group.add(
            Rectangle::new()
                .set("class", status_class)
                .set("x", g.pct_to_x(pos.left_pct))
                .set("y", g.row_top(pos.row))
                .set("width", g.pct_to_x(pos.width_pct()))
                .set("height", g.row_height)
                .set("rx", 4)
                .set("ry", 4)
                .set("fill", Self::status_color(&task.status)),
        );
        group
    }

    fn render_links(&self, timeline: &Timeline) -> Group {
        let mut group = Group::new().set("class", "gantt__links");
        for link in &timeline.links {
            group = group.add(
                Path::new()
                    .set("class", Self::link_class(link.dep_type))
                    .set("d", link.path.to_svg_d())
                    .set("fill", "none")
                    .set("stroke", self.link_color.as_str())
                    .set("stroke-width", 1.5)
                    .set("marker-end", "url(#arrow)")
                    .set("data-from", link.from_id.as_str())
                    .set("data-to", link.to_id.as_str()),
            );
        }
        group
    }

    fn render_today(&self, timeline: &Timeline) -> Option<Line> {
        let pct = timeline.today_pct?;
        let g = &timeline.geometry;
        let x = g.pct_to_x(pct);
        Some(
            Line::new()
                .set("class", "gantt__todayline")
                .set("x1", x)
                .set("y1", 0)
                .set("x2", x)
                .set("y2", g.total_height(timeline.rows.len()))
                .set("stroke", self.today_color.as_str())
                .set("stroke-width", 2),
        )
    }

    fn arrow_marker(&self) -> Definitions {
        let marker = Marker::new()
            .set("id", "arrow")
            .set("viewBox", "0 0 8 8")
            .set("refX", 8)
            .set("refY", 4)
            .set("markerWidth", 8)
            .set("markerHeight", 8)
            .set("orient", "auto")
            .add(
                Path::new()
                    .set("d", "M0,0 L8,4 L0,8 z")
                    .set("fill", self.link_color.as_str()),
            );
        Definitions::new().add(marker)
    }
}

impl Renderer for SvgTimelineRenderer {
    type Output = String;

    fn render(&self, timeline: &Timeline) -> Result<String, RenderError> {
        let g = &timeline.geometry;
        if !(g.chart_width.is_finite() && g.chart_width > 0.0) {
            return Err(RenderError::InvalidData(format!(
                "chart width must be positive, got {}",
                g.chart_width
            )));
        }

        let width = self.chart_left() + g.chart_width + f64::from(self.padding);
        let height = self.chart_top() + g.total_height(timeline.rows.len().max(1)) + f64::from(self.padding);

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(self.arrow_marker());
        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );
        document = document.add(self.render_header(timeline));

        let mut chart = Group::new().set("class", "gantt__chart").set(
            "transform",
            format!("translate({},{})", self.chart_left(), self.chart_top()),
        );
        chart = chart.add(self.render_grid(timeline));

        if timeline.is_empty() {
            chart = chart.add(
                Text::new("No tasks match the filters for this window.")
                    .set("class", "gantt__empty")
                    .set("x", g.chart_width / 2.0)
                    .set("y", g.row_center_y(0))
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size)
                    .set("fill", self.text_color.as_str())
                    .set("text-anchor", "middle"),
            );
        }
        for row in &timeline.rows {
            chart = chart.add(self.render_row(timeline, row));
        }
        if self.show_dependencies {
            chart = chart.add(self.render_links(timeline));
        }
        if self.show_today {
            if let Some(line) = self.render_today(timeline) {
                chart = chart.add(line);
            }
        }
        document = document.add(chart);

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Truncate a string to a maximum number of characters with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
