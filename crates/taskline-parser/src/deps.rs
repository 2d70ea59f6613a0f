//! Dependency-list parsing
//!
//! One entry point, [`parse_dependencies`], dispatching on the JSON type of
//! the raw value:
//!
//! - array of objects: `[{"id": "t2", "type": "SS"}]`
//! - array of strings: `["t2:SS", "t3"]`
//! - comma-separated string: `"t2:SS, t3"`
//!
//! Types default to `FS`; entries without an ID are dropped.

use serde_json::{Map, Value};
use taskline_core::{Dependency, DependencyType};

const ID_KEYS: [&str; 4] = ["id", "targetId", "taskId", "ref"];
const TYPE_KEYS: [&str; 3] = ["type", "depType", "kind"];

/// Parse any supported dependency shape into canonical pairs
pub fn parse_dependencies(value: &Value) -> Vec<Dependency> {
    match value {
        Value::Array(items) => items.iter().filter_map(parse_entry).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(parse_token)
            .collect(),
        Value::Object(map) => parse_object(map).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn parse_entry(entry: &Value) -> Option<Dependency> {
    match entry {
        Value::Object(map) => parse_object(map),
        Value::String(s) => parse_token(s),
        Value::Number(n) => Some(Dependency::new(n.to_string(), DependencyType::FinishToStart)),
        _ => None,
    }
}

/// `"id"` or `"id:type"`
fn parse_token(token: &str) -> Option<Dependency> {
    let mut parts = token.split(':');
    let id = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
    let dep_type = parts
        .next()
        .map(DependencyType::parse_lenient)
        .unwrap_or_default();
    Some(Dependency::new(id, dep_type))
}

fn parse_object(map: &Map<String, Value>) -> Option<Dependency> {
    let id = ID_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })?;
    let dep_type = TYPE_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(DependencyType::parse_lenient)
        .unwrap_or_default();
    Some(Dependency::new(id, dep_type))
}
