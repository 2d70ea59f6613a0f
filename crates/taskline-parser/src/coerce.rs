//! Storage-shape coercion
//!
//! Task files have been written in three shapes over time:
//!
//! ```text
//! [ {..}, {..} ]                          canonical array
//! { "Ann": [ {..} ], "Bo": [ {..} ] }     grouped by lead
//! { "0": {..}, "1": {..}, "id": "x" }     array-ish object
//! ```
//!
//! [`coerce_to_array`] maps all of them onto a flat list of records. Grouped
//! records get their group key injected as `lead`.

use serde_json::Value;

/// Which storage shape a payload was recognized as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageShape {
    /// Already a flat array
    Array,
    /// Object whose values are arrays, keyed by lead
    GroupedByLead,
    /// Object with numeric-string keys
    ArrayIsh,
    /// Nothing usable
    Empty,
}

/// True only for the canonical array shape
pub fn is_canonical(data: &Value) -> bool {
    data.is_array()
}

/// Flatten any known storage shape into a list of records
pub fn coerce_to_array(data: &Value) -> Vec<Value> {
    coerce_with_shape(data).1
}

/// Like [`coerce_to_array`], also reporting the detected shape
pub fn coerce_with_shape(data: &Value) -> (StorageShape, Vec<Value>) {
    match data {
        Value::Array(items) => (StorageShape::Array, items.clone()),
        Value::Object(_) => {
            let grouped = flatten_lead_groups(data);
            if !grouped.is_empty() {
                return (StorageShape::GroupedByLead, grouped);
            }
            let indexed = collect_numeric_keys(data);
            if !indexed.is_empty() {
                return (StorageShape::ArrayIsh, indexed);
            }
            (StorageShape::Empty, Vec::new())
        }
        _ => (StorageShape::Empty, Vec::new()),
    }
}

fn flatten_lead_groups(data: &Value) -> Vec<Value> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (lead, group) in map {
        let Some(items) = group.as_array() else {
            continue;
        };
        for item in items {
            let mut record = item.clone();
            if let Some(fields) = record.as_object_mut() {
                fields.insert("lead".into(), Value::String(lead.clone()));
            }
            out.push(record);
        }
    }
    out
}

fn collect_numeric_keys(data: &Value) -> Vec<Value> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };
    let mut keyed: Vec<(u64, &Value)> = map
        .iter()
        .filter(|(k, _)| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()))
        .map(|(k, v)| (k.parse().unwrap_or(u64::MAX), v))
        .collect();
    keyed.sort_by_key(|(index, _)| *index);
    keyed.into_iter().map(|(_, v)| v.clone()).collect()
}
