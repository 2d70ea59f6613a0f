//! # taskline-core
//!
//! Core domain model for the taskline timeline engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `Dependency`, `TaskStatus`, `TimeWindow`, `Filters`
//! - Timeline output types: `Timeline`, `TimelineRow`, `DependencyLink`
//! - Date/scale utilities (see [`dates`])
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use taskline_core::{DependencyType, Task, TimeWindow};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
//!
//! let design = Task::new("design", d(3)).title("Design").ends(d(7));
//! let build = Task::new("build", d(10))
//!     .title("Build")
//!     .ends(d(20))
//!     .depends_on_typed("design", DependencyType::FinishToStart);
//!
//! let window = TimeWindow::month(2025, 3).unwrap();
//! assert!(window.contains(design.start));
//! assert_eq!(build.depends_on[0].target_id, "design");
//! ```

pub mod dates;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task
pub type TaskId = String;

/// Filter value meaning "no constraint"
pub const ALL: &str = "all";

/// Minimum visible bar width, in percent of the window
pub const MIN_WIDTH_PCT: f64 = 0.5;

// ============================================================================
// Dependencies
// ============================================================================

/// Types of task dependencies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-Start: successor starts after predecessor finishes
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    /// Start-to-Start: successor starts when predecessor starts
    #[serde(rename = "SS")]
    StartToStart,
    /// Finish-to-Finish: successor finishes when predecessor finishes
    #[serde(rename = "FF")]
    FinishToFinish,
    /// Start-to-Finish: successor finishes when predecessor starts
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyType {
    /// Two-letter code (`FS`, `SS`, `FF`, `SF`)
    pub const fn code(self) -> &'static str {
        match self {
            DependencyType::FinishToStart => "FS",
            DependencyType::StartToStart => "SS",
            DependencyType::FinishToFinish => "FF",
            DependencyType::StartToFinish => "SF",
        }
    }

    /// Parse a two-letter code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FS" => Some(DependencyType::FinishToStart),
            "SS" => Some(DependencyType::StartToStart),
            "FF" => Some(DependencyType::FinishToFinish),
            "SF" => Some(DependencyType::StartToFinish),
            _ => None,
        }
    }

    /// Parse a code, falling back to Finish-to-Start for anything unrecognized
    pub fn parse_lenient(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }
}

impl std::fmt::Display for DependencyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Directed edge from a dependent task to one of its predecessors
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    /// ID of the predecessor task
    pub target_id: TaskId,
    /// Type of dependency
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
}

impl Dependency {
    pub fn new(target_id: impl Into<String>, dep_type: DependencyType) -> Self {
        Self {
            target_id: target_id.into(),
            dep_type,
        }
    }
}

// ============================================================================
// Status / Priority
// ============================================================================

/// Task status.
///
/// Unrecognized values are kept verbatim (upper-cased) in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Planned,
    #[default]
    InProgress,
    Blocked,
    Done,
    Completed,
    Other(String),
}

impl TaskStatus {
    /// The recognized statuses, in display order
    pub const CANONICAL: [TaskStatus; 5] = [
        TaskStatus::Planned,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::Completed,
    ];

    /// Normalize free-form input: trim, collapse whitespace runs to `_`,
    /// upper-case. Blank input yields the default (`IN_PROGRESS`).
    pub fn normalize(raw: &str) -> Self {
        let joined = raw.split_whitespace().collect::<Vec<_>>().join("_");
        if joined.is_empty() {
            return TaskStatus::default();
        }
        match joined.to_uppercase().as_str() {
            "PLANNED" => TaskStatus::Planned,
            "IN_PROGRESS" => TaskStatus::InProgress,
            "BLOCKED" => TaskStatus::Blocked,
            "DONE" => TaskStatus::Done,
            "COMPLETED" => TaskStatus::Completed,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Planned => "PLANNED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Blocked => "BLOCKED",
            TaskStatus::Done => "DONE",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Other(s) => s,
        }
    }

    pub fn is_canonical(&self) -> bool {
        !matches!(self, TaskStatus::Other(_))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TaskStatus::normalize(&raw))
    }
}

/// Task priority (lowest precedence is the default)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive parse; anything unrecognized is `Low`
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

// ============================================================================
// Task
// ============================================================================

/// A task in canonical (normalized) shape
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// First day of the task
    pub start: NaiveDate,
    /// Last day of the task (never before `start`)
    pub end: NaiveDate,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Predecessors, in declaration order
    pub depends_on: Vec<Dependency>,
    /// Project display name
    pub project: String,
    pub project_id: String,
    /// Assignee display name
    pub assigned: String,
    pub lead: String,
    pub note: String,
}

impl Task {
    /// Create a single-day task with the given ID
    pub fn new(id: impl Into<String>, start: NaiveDate) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            start,
            end: start,
            status: TaskStatus::default(),
            priority: Priority::default(),
            depends_on: Vec::new(),
            project: String::new(),
            project_id: String::new(),
            assigned: String::new(),
            lead: String::new(),
            note: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the last day; a date before `start` is clamped to `start`
    pub fn ends(mut self, end: NaiveDate) -> Self {
        self.end = end.max(self.start);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add a Finish-to-Start dependency
    pub fn depends_on(self, target: impl Into<String>) -> Self {
        self.depends_on_typed(target, DependencyType::FinishToStart)
    }

    pub fn depends_on_typed(mut self, target: impl Into<String>, dep_type: DependencyType) -> Self {
        self.depends_on.push(Dependency::new(target, dep_type));
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn assigned(mut self, assigned: impl Into<String>) -> Self {
        self.assigned = assigned.into();
        self
    }

    pub fn lead(mut self, lead: impl Into<String>) -> Self {
        self.lead = lead.into();
        self
    }

    /// Number of calendar days covered, inclusive
    pub fn duration_days(&self) -> i64 {
        dates::day_offset(self.start, self.end) + 1
    }
}

// ============================================================================
// Time Window
// ============================================================================

/// The visible calendar date range for one layout pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TimeWindow {
    /// Create a window; reversed bounds are swapped
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// The calendar month `year-month`, first to last day
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self {
            from,
            to: next.pred_opt()?,
        })
    }

    /// The calendar month containing `date`
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::month(date.year(), date.month())
    }

    pub fn next_month(&self) -> Option<Self> {
        let (year, month) = if self.from.month() == 12 {
            (self.from.year() + 1, 1)
        } else {
            (self.from.year(), self.from.month() + 1)
        };
        Self::month(year, month)
    }

    pub fn prev_month(&self) -> Option<Self> {
        let (year, month) = if self.from.month() == 1 {
            (self.from.year() - 1, 12)
        } else {
            (self.from.year(), self.from.month() - 1)
        };
        Self::month(year, month)
    }

    /// Inclusive containment test
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Width of the window in days, never less than one
    pub fn span_days(&self) -> i64 {
        dates::span_days(self.from, self.to)
    }
}

// ============================================================================
// Viewer / Filters
// ============================================================================

/// User role bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lead,
    Assignee,
}

impl Role {
    /// Bucket order used by the user directory
    pub const ALL: [Role; 3] = [Role::Admin, Role::Lead, Role::Assignee];

    /// Parse a role name (trimmed, case-insensitive). `owner` is an admin.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "owner" => Some(Role::Admin),
            "lead" => Some(Role::Lead),
            "assignee" => Some(Role::Assignee),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Lead => "lead",
            Role::Assignee => "assignee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is looking at the timeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub name: String,
    pub role: Role,
}

impl Viewer {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Active filters for one timeline pass. `"all"` means unconstrained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub project: String,
    pub assignee: String,
    pub status: String,
    /// Viewer identity; assignees only see their own tasks
    pub viewer: Option<Viewer>,
}

impl Default for Filters {
    fn default() -> Self {
        Self::all()
    }
}

impl Filters {
    /// No constraints
    pub fn all() -> Self {
        Self {
            project: ALL.into(),
            assignee: ALL.into(),
            status: ALL.into(),
            viewer: None,
        }
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = Some(viewer);
        self
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Row and horizontal span assigned to a task for one pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPosition {
    pub row: usize,
    pub left_pct: f64,
    pub right_pct: f64,
}

impl LayoutPosition {
    /// Rendered bar width; zero-length spans stay visible as a sliver
    pub fn width_pct(&self) -> f64 {
        (self.right_pct - self.left_pct).max(MIN_WIDTH_PCT)
    }
}

/// Pixel geometry shared by the link resolver and renderers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Width of the chart area in pixels
    pub chart_width: f64,
    /// Height per task row in pixels
    pub row_height: f64,
    /// Vertical gap between rows
    pub row_gap: f64,
    /// Space above the first row
    pub top_margin: f64,
    /// Horizontal offset of the vertical link segment from its start anchor
    pub elbow: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            chart_width: 800.0,
            row_height: 36.0,
            row_gap: 8.0,
            top_margin: 8.0,
            elbow: 12.0,
        }
    }
}

impl Geometry {
    /// Top edge of a row
    pub fn row_top(&self, row: usize) -> f64 {
        self.top_margin + row as f64 * (self.row_height + self.row_gap)
    }

    /// Vertical center of a row
    pub fn row_center_y(&self, row: usize) -> f64 {
        self.row_top(row) + self.row_height / 2.0
    }

    pub fn pct_to_x(&self, pct: f64) -> f64 {
        pct / 100.0 * self.chart_width
    }

    /// Height needed to draw `rows` rows
    pub fn total_height(&self, rows: usize) -> f64 {
        self.top_margin + rows as f64 * (self.row_height + self.row_gap)
    }
}

/// A point in chart pixel space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orthogonal three-segment link path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    pub points: [Point; 4],
}

impl LinkPath {
    /// SVG path data (`M x y L x y ...`)
    pub fn to_svg_d(&self) -> String {
        let [a, b, c, d] = self.points;
        format!(
            "M {} {} L {} {} L {} {} L {} {}",
            a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y
        )
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// A visible task with its layout position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub task: Task,
    pub position: LayoutPosition,
}

/// A drawable dependency link
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLink {
    /// Predecessor
    pub from_id: TaskId,
    /// Dependent task
    pub to_id: TaskId,
    #[serde(rename = "type")]
    pub dep_type: DependencyType,
    pub from_pct: f64,
    pub to_pct: f64,
    pub path: LinkPath,
}

/// Picker values for each filter, `"all"` first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub project: Vec<String>,
    pub assignee: Vec<String>,
    pub status: Vec<String>,
}

/// Result of one timeline computation pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub window: TimeWindow,
    pub geometry: Geometry,
    pub rows: Vec<TimelineRow>,
    pub links: Vec<DependencyLink>,
    /// Reference date for the today marker
    pub today: NaiveDate,
    pub today_pct: Option<f64>,
    pub filter_options: FilterOptions,
    /// Raw records discarded by normalization (no usable start date)
    pub dropped_records: usize,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by task ID
    pub fn row(&self, id: &str) -> Option<&TimelineRow> {
        self.rows.iter().find(|r| r.task.id == id)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a computed timeline to the output format
    fn render(&self, timeline: &Timeline) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
