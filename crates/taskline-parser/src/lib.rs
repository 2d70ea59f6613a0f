//! # taskline-parser
//!
//! Turns raw task payloads into canonical `Task`s.
//!
//! This crate provides:
//! - Storage-shape coercion (arrays, lead-grouped objects, array-ish objects)
//! - Dependency-list parsing (objects, `"id:type"` strings, comma strings)
//! - The task normalizer, with dropped-record accounting
//!
//! ## Example
//!
//! ```rust
//! use taskline_parser::parse_str;
//!
//! let input = r#"[
//!     {"id": "t1", "title": "Design", "startDate": "2025-03-03", "dueDate": "2025-03-07"},
//!     {"id": "t2", "title": "Build", "start": "2025-03-10", "dependsOn": ["t1:FS"]},
//!     {"id": "t3", "title": "No date"}
//! ]"#;
//!
//! let normalized = parse_str(input).unwrap();
//! assert_eq!(normalized.tasks.len(), 2);
//! assert_eq!(normalized.dropped, 1);
//! ```

pub mod coerce;
pub mod deps;
pub mod normalize;

pub use coerce::{coerce_to_array, coerce_with_shape, is_canonical, StorageShape};
pub use deps::parse_dependencies;
pub use normalize::{normalize_record, normalize_tasks, parse_date, sort_tasks, Normalized};

use thiserror::Error;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Normalize tasks from a JSON document
pub fn parse_str(input: &str) -> Result<Normalized, ParseError> {
    let payload: serde_json::Value = serde_json::from_str(input)?;
    Ok(normalize_tasks(&payload))
}

/// Normalize tasks from a JSON file
pub fn parse_file(path: &std::path::Path) -> Result<Normalized, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_str_invalid_json() {
        let err = parse_str("{not json").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
        assert!(format!("{}", err).contains("Invalid JSON"));
    }

    #[test]
    fn test_parse_file_not_found() {
        let path = Path::new("/nonexistent/path/to/tasks.json");
        let result = parse_file(path);
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_parse_file_grouped() {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        writeln!(
            temp_file,
            r#"{{"Ann": [{{"id": "a", "start": "2025-01-02"}}], "Bo": [{{"id": "b", "start": "2025-01-03"}}]}}"#
        )
        .unwrap();

        let normalized = parse_file(temp_file.path()).unwrap();
        assert_eq!(normalized.tasks.len(), 2);
        assert_eq!(normalized.tasks[0].lead, "Ann");
        assert_eq!(normalized.tasks[1].lead, "Bo");
    }

    #[test]
    fn test_parse_str_scalar_payload_is_empty() {
        let normalized = parse_str("\"hello\"").unwrap();
        assert!(normalized.tasks.is_empty());
        assert_eq!(normalized.dropped, 0);
    }
}
