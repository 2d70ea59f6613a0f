//! # taskline-store
//!
//! File-backed storage for task records and the user directory.
//!
//! Both stores keep one pretty-printed JSON document on disk and rewrite it
//! whole on every change (`<file>.tmp` then rename). Task records are kept
//! raw: the store never normalizes them, so fields the timeline does not
//! know about survive a round trip.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use taskline_store::{JsonTaskStore, TaskStore};
//!
//! let store = JsonTaskStore::open(Path::new("data/taskData.json"));
//! let records = store.list_tasks()?;
//! # Ok::<(), taskline_store::StoreError>(())
//! ```

pub mod tasks;
pub mod users;

pub use tasks::{JsonTaskStore, UpsertSummary};
pub use users::{RoleBuckets, UserDirectory, UserUpdate};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

/// Default task file name inside a data directory
pub const TASKS_FILE: &str = "taskData.json";

/// Default user directory file name inside a data directory
pub const USERS_FILE: &str = "user.json";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Refusing to overwrite with an empty task list (allow empty to force)")]
    EmptyReplace,

    #[error("Task id is required")]
    MissingId,

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

/// Read access to raw task records
pub trait TaskStore {
    /// All stored records, flattened to an array
    fn list_tasks(&self) -> Result<Vec<Value>, StoreError>;
}

/// Write `value` to `path` through a sibling temp file
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    info!(path = %path.display(), "store written");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// ID of a raw record, accepting strings and numbers
pub(crate) fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
