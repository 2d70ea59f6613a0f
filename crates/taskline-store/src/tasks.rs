//! Task record file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use taskline_parser::coerce_to_array;
use tracing::{debug, warn};

use crate::{record_id, write_json_atomic, StoreError, TaskStore};

/// Result of a per-project upsert
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    /// Number of incoming records applied
    pub updated: usize,
    /// Records in the file afterwards
    pub total: usize,
}

/// Task records stored as a JSON array in a single file
#[derive(Clone, Debug)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    /// Open a store at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file, returning the flattened records and whether the file
    /// was already a plain array
    fn read(&self) -> Result<(Vec<Value>, bool), StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), true)),
            Err(e) => return Err(e.into()),
        };
        let data: Value = serde_json::from_str(&content)?;
        let canonical = data.is_array();
        Ok((coerce_to_array(&data), canonical))
    }

    fn write(&self, records: &[Value]) -> Result<(), StoreError> {
        write_json_atomic(&self.path, records)
    }

    /// Replace the whole dataset.
    ///
    /// `payload` may be in any storage shape. An empty result is refused
    /// unless `allow_empty` is set.
    pub fn replace_all(&self, payload: &Value, allow_empty: bool) -> Result<usize, StoreError> {
        let records = coerce_to_array(payload);
        if records.is_empty() && !allow_empty {
            return Err(StoreError::EmptyReplace);
        }
        self.write(&records)?;
        Ok(records.len())
    }

    /// Merge records belonging to `project_id` into the store.
    ///
    /// Incoming records whose `projectId` differs (or that carry no `id`) are
    /// ignored. Matching ids are shallow-merged, new ids are appended.
    pub fn upsert_project(&self, project_id: &str, payload: &Value) -> Result<UpsertSummary, StoreError> {
        let changes: Vec<Value> = coerce_to_array(payload)
            .into_iter()
            .filter(|c| project_id.is_empty() || c.get("projectId").and_then(Value::as_str) == Some(project_id))
            .filter(|c| record_id(c).is_some())
            .collect();

        let (mut records, _) = self.read()?;
        if changes.is_empty() {
            debug!(project_id, "upsert with no matching records");
            return Ok(UpsertSummary {
                updated: 0,
                total: records.len(),
            });
        }

        let updated = changes.len();
        merge_by_id(&mut records, changes);
        self.write(&records)?;
        Ok(UpsertSummary {
            updated,
            total: records.len(),
        })
    }

    /// Remove every record with the given id. Returns the remaining count.
    pub fn delete(&self, id: &str) -> Result<usize, StoreError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::MissingId);
        }
        let (records, _) = self.read()?;
        let before = records.len();
        let remaining: Vec<Value> = records
            .into_iter()
            .filter(|r| record_id(r).as_deref() != Some(id))
            .collect();
        if remaining.len() == before {
            return Err(StoreError::NotFound {
                kind: "task",
                key: id.to_string(),
            });
        }
        self.write(&remaining)?;
        Ok(remaining.len())
    }
}

impl TaskStore for JsonTaskStore {
    /// Missing files read as empty. A file in a legacy shape is rewritten as
    /// a plain array.
    fn list_tasks(&self) -> Result<Vec<Value>, StoreError> {
        let (records, canonical) = self.read()?;
        if !canonical {
            warn!(path = %self.path.display(), records = records.len(), "healing non-array task file");
            self.write(&records)?;
        }
        Ok(records)
    }
}

/// Shallow-merge `changes` into `records` by id, keeping existing order
fn merge_by_id(records: &mut Vec<Value>, changes: Vec<Value>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(id) = record_id(record) {
            index.entry(id).or_insert(i);
        }
    }

    for change in changes {
        let Some(id) = record_id(&change) else {
            continue;
        };
        match index.get(&id) {
            Some(&i) => match (&mut records[i], change) {
                (Value::Object(prev), Value::Object(next)) => prev.extend(next),
                (slot, next) => *slot = next,
            },
            None => {
                index.insert(id, records.len());
                records.push(change);
            }
        }
    }
}
