//! Task normalizer
//!
//! Maps loosely-shaped raw records onto canonical [`Task`]s. Normalization
//! never fails: a record without a usable start date is dropped (and
//! counted), every other missing or malformed field falls back to a default.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use taskline_core::{Priority, Task, TaskStatus};
use tracing::{debug, warn};

use crate::coerce::coerce_to_array;
use crate::deps::parse_dependencies;

/// Start-date field names, in lookup order
pub const START_KEYS: [&str; 5] = ["startDate", "started", "start", "from", "date"];

/// End-date field names, in lookup order
pub const END_KEYS: [&str; 5] = ["dueDate", "due", "end", "to", "finish"];

const ID_KEYS: [&str; 2] = ["id", "_id"];
const TITLE_KEYS: [&str; 3] = ["title", "task", "name"];
const DEPENDENCY_KEYS: [&str; 3] = ["dependsOn", "dependencies", "predecessors"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Output of a normalization pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    pub tasks: Vec<Task>,
    /// Records discarded for lack of a usable start date
    pub dropped: usize,
}

/// Normalize a raw payload in any supported storage shape
pub fn normalize_tasks(payload: &Value) -> Normalized {
    let records = coerce_to_array(payload);
    let mut out = Normalized::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(index, record) {
            Some(task) => out.tasks.push(task),
            None => {
                debug!(index, "dropping record without a usable start date");
                out.dropped += 1;
            }
        }
    }

    if out.dropped > 0 {
        warn!(
            dropped = out.dropped,
            kept = out.tasks.len(),
            "some task records were dropped during normalization"
        );
    }
    out
}

/// Normalize one record. `index` is its position in the flattened list and
/// seeds the fallback ID.
pub fn normalize_record(index: usize, record: &Value) -> Option<Task> {
    let fields = record.as_object()?;

    let start = first_date(fields, &START_KEYS)?;
    let end = first_date(fields, &END_KEYS).unwrap_or(start).max(start);

    let id = first_text(fields, &ID_KEYS).unwrap_or_else(|| format!("t-{index}"));
    let title = first_text(fields, &TITLE_KEYS).unwrap_or_else(|| "Untitled".into());

    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .map(TaskStatus::normalize)
        .unwrap_or_default();
    let priority = fields
        .get("priority")
        .and_then(Value::as_str)
        .map(Priority::parse_lenient)
        .unwrap_or_default();

    let depends_on = DEPENDENCY_KEYS
        .iter()
        .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
        .map(parse_dependencies)
        .unwrap_or_default();

    Some(Task {
        id,
        title,
        start,
        end,
        status,
        priority,
        depends_on,
        project: text_or_empty(fields, "project"),
        project_id: text_or_empty(fields, "projectId"),
        assigned: text_or_empty(fields, "assigned"),
        lead: text_or_empty(fields, "lead"),
        note: text_or_empty(fields, "note"),
    })
}

/// Parse a calendar date from the formats found in stored task files.
///
/// Time of day and offsets are discarded; the date is taken as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    // "2025-03-01<anything>"
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Sort by `(start, end)`, keeping input order for ties
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.start, t.end));
}

fn first_date(fields: &Map<String, Value>, keys: &[&str]) -> Option<NaiveDate> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str).and_then(parse_date))
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn text_or_empty(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
