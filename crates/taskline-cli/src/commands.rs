//! Subcommand arguments and handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use taskline_core::{Filters, Renderer, Role, TaskStatus, TimeWindow, Timeline, Viewer, ALL};
use taskline_layout::{autoscroll_offset, TimelineEngine};
use taskline_parser::normalize_tasks;
use taskline_render::{SvgTimelineRenderer, TextRenderer};
use taskline_store::{JsonTaskStore, TaskStore, UserDirectory, UserUpdate, TASKS_FILE, USERS_FILE};
use tracing::info;

use crate::config::Config;

// ============================================================================
// Arguments
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Svg,
    Text,
}

#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Task file (defaults to <data-dir>/taskData.json)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Month to show as YYYY-MM (defaults to the month containing today)
    #[arg(long, value_name = "YYYY-MM", conflicts_with_all = ["from", "to"])]
    month: Option<String>,

    /// First day of a custom window
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of a custom window
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Project filter
    #[arg(long, default_value = ALL)]
    project: String,

    /// Assignee filter
    #[arg(long, default_value = ALL)]
    assignee: String,

    /// Status filter (any spelling, e.g. "in progress")
    #[arg(long, default_value = ALL)]
    status: String,

    /// Viewer name for role scoping
    #[arg(long, value_name = "NAME")]
    as_user: Option<String>,

    /// Viewer role (admin, lead, assignee); assignee when only --as-user is given
    #[arg(long, value_name = "ROLE", value_parser = parse_role)]
    as_role: Option<Role>,

    /// Reference date for the today marker (defaults to the local date)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long)]
    chart_width: Option<f64>,

    /// SVG label column width in pixels
    #[arg(long)]
    label_width: Option<u32>,

    /// Visible width; adds the initial scroll offset to JSON output
    #[arg(long)]
    viewport_width: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Print stored records (healing legacy file shapes)
    List {
        /// Print normalized tasks instead of raw records
        #[arg(long)]
        normalized: bool,
    },

    /// Delete a task by id
    Delete { id: String },

    /// Replace all records with the contents of a JSON file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Allow replacing with an empty list
        #[arg(long)]
        allow_empty: bool,
    },

    /// Merge a project's records from a JSON file
    Upsert {
        project_id: String,

        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Print all role buckets
    List,

    /// Add a user (assignee unless --role is given)
    Add {
        name: String,

        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
    },

    /// Move, rename or reposition a user
    Move {
        name: String,

        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,

        /// New display name
        #[arg(long)]
        rename: Option<String>,

        /// Position within the role, clamped to its length
        #[arg(long)]
        index: Option<usize>,
    },

    /// Reorder a role; unlisted names keep their order after the listed ones
    Reorder {
        #[arg(value_parser = parse_role)]
        role: Role,

        names: Vec<String>,
    },

    /// Remove a user from every role
    Remove { name: String },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::parse(raw).ok_or_else(|| format!("unknown role '{raw}' (expected admin, lead or assignee)"))
}

/// Window for `YYYY-MM`
fn parse_month(raw: &str) -> Result<TimeWindow> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .with_context(|| format!("Invalid month '{raw}', expected YYYY-MM"))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year in '{raw}'"))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month in '{raw}'"))?;
    TimeWindow::month(year, month).with_context(|| format!("Month out of range: '{raw}'"))
}

// ============================================================================
// Timeline
// ============================================================================

/// Timeline JSON plus the initial scroll position when a viewport is known
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineOutput<'a> {
    #[serde(flatten)]
    timeline: &'a Timeline,
    #[serde(skip_serializing_if = "Option::is_none")]
    scroll_left: Option<f64>,
}

impl TimelineArgs {
    fn window(&self, today: NaiveDate) -> Result<TimeWindow> {
        if let Some(month) = &self.month {
            return parse_month(month);
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            return Ok(TimeWindow::new(from, to));
        }
        TimeWindow::containing(today).context("Today is outside the supported calendar")
    }

    fn filters(&self) -> Filters {
        let viewer = match (&self.as_user, self.as_role) {
            (None, None) => None,
            (name, role) => Some(Viewer::new(
                name.clone().unwrap_or_default(),
                role.unwrap_or(Role::Assignee),
            )),
        };
        let status = if self.status.eq_ignore_ascii_case(ALL) {
            ALL.to_string()
        } else {
            TaskStatus::normalize(&self.status).as_str().to_string()
        };
        let filters = Filters::all()
            .project(self.project.as_str())
            .assignee(self.assignee.as_str())
            .status(status);
        match viewer {
            Some(viewer) => filters.viewer(viewer),
            None => filters,
        }
    }
}

pub fn timeline(args: &TimelineArgs, config: &Config, data_dir: &Path) -> Result<()> {
    let today = args.today.unwrap_or_else(|| chrono::Local::now().date_naive());
    let window = args.window(today)?;

    // An explicit --data file is read as-is; only the managed store is healed.
    let raw = match &args.data {
        Some(path) => read_json(path)?,
        None => {
            let path = data_dir.join(TASKS_FILE);
            let records = JsonTaskStore::open(&path)
                .list_tasks()
                .with_context(|| format!("Failed to read tasks from {}", path.display()))?;
            Value::Array(records)
        }
    };

    let mut geometry = config.geometry;
    if let Some(width) = args.chart_width {
        geometry.chart_width = width;
    }
    let engine = TimelineEngine::with_geometry(geometry);
    let timeline = engine.compute_raw(&raw, window, &args.filters(), today);

    let rendered = match args.format {
        OutputFormat::Json => {
            let viewport = args.viewport_width.or(config.render.viewport_width);
            let scroll_left =
                viewport.and_then(|v| autoscroll_offset(geometry.chart_width, v, timeline.today_pct));
            let output = TimelineOutput {
                timeline: &timeline,
                scroll_left,
            };
            serde_json::to_string_pretty(&output)?
        }
        OutputFormat::Svg => SvgTimelineRenderer::new()
            .label_width(args.label_width.unwrap_or(config.render.label_width))
            .render(&timeline)?,
        OutputFormat::Text => TextRenderer::new().render(&timeline)?,
    };

    write_output(args.output.as_deref(), &rendered)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

// ============================================================================
// Tasks
// ============================================================================

pub fn tasks(action: TaskAction, data_dir: &Path) -> Result<()> {
    let store = JsonTaskStore::open(data_dir.join(TASKS_FILE));

    match action {
        TaskAction::List { normalized } => {
            let records = store.list_tasks()?;
            let out = if normalized {
                let normalized = normalize_tasks(&Value::Array(records));
                serde_json::to_string_pretty(&normalized.tasks)?
            } else {
                serde_json::to_string_pretty(&records)?
            };
            println!("{out}");
        }
        TaskAction::Delete { id } => {
            let remaining = store.delete(&id)?;
            println!("Deleted task {id} ({remaining} remaining)");
        }
        TaskAction::Import { file, allow_empty } => {
            let payload = read_json(&file)?;
            let count = store.replace_all(&payload, allow_empty)?;
            println!("Imported {count} task records");
        }
        TaskAction::Upsert { project_id, file } => {
            if project_id.trim().is_empty() {
                bail!("Project id must not be empty");
            }
            let payload = read_json(&file)?;
            let summary = store.upsert_project(&project_id, &payload)?;
            println!("{}", serde_json::to_string(&summary)?);
        }
    }
    Ok(())
}

// ============================================================================
// Users
// ============================================================================

pub fn users(action: UserAction, data_dir: &Path) -> Result<()> {
    let directory = UserDirectory::open(data_dir.join(USERS_FILE))?;

    let buckets = match action {
        UserAction::List => directory.list()?,
        UserAction::Add { name, role } => directory.add(&name, role)?,
        UserAction::Move {
            name,
            role,
            rename,
            index,
        } => directory.update(
            &name,
            UserUpdate {
                role,
                new_name: rename,
                index,
            },
        )?,
        UserAction::Reorder { role, names } => directory.reorder(role, &names)?,
        UserAction::Remove { name } => directory.remove(&name)?,
    };

    println!("{}", serde_json::to_string_pretty(&buckets)?);
    Ok(())
}
