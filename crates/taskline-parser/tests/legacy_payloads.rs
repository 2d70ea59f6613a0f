//! Payloads in the shapes older task files were written in.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use taskline_core::{Dependency, DependencyType, TaskStatus};
use taskline_parser::{coerce_with_shape, normalize_tasks, parse_str, StorageShape};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

#[test]
fn dependency_tokens_survive_a_round_trip() {
    let raw = json!([{"id": "t1", "startDate": "2025-03-01", "dependsOn": ["t2:SS", "t3"]}]);
    let first = normalize_tasks(&raw);
    let task = &first.tasks[0];
    assert_eq!(
        task.depends_on,
        vec![
            Dependency::new("t2", DependencyType::StartToStart),
            Dependency::new("t3", DependencyType::FinishToStart),
        ]
    );

    let stored = serde_json::to_value(&first.tasks).unwrap();
    let second = normalize_tasks(&stored);
    assert_eq!(second.tasks, first.tasks);
}

#[test]
fn due_before_start_collapses_to_one_day() {
    let raw = json!([{"id": "x", "startDate": "2025-03-10", "dueDate": "2025-03-04"}]);
    let task = &normalize_tasks(&raw).tasks[0];
    assert_eq!(task.start, date(3, 10));
    assert_eq!(task.end, date(3, 10));
}

#[test]
fn missing_start_is_dropped_and_counted() {
    let raw = json!([
        {"id": "a", "title": "Keeps", "start": "2025-03-01"},
        {"id": "b", "title": "Only a due date", "dueDate": "2025-03-05"},
        {"id": "c", "startDate": "not a date"},
        "not an object"
    ]);
    let normalized = normalize_tasks(&raw);
    assert_eq!(normalized.tasks.len(), 1);
    assert_eq!(normalized.dropped, 3);
}

#[test]
fn grouped_by_lead_file() {
    let input = r#"{
        "Ann": [{"_id": "a1", "name": "Wiring", "startDate": "2025/03/02", "status": "in progress"}],
        "Bo": [{"task": "Paint", "date": "03/05/2025", "status": "Done"}]
    }"#;
    let normalized = parse_str(input).unwrap();
    let ids: Vec<_> = normalized.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["a1", "t-1"]);
    assert_eq!(normalized.tasks[0].lead, "Ann");
    assert_eq!(normalized.tasks[0].title, "Wiring");
    assert_eq!(normalized.tasks[0].status, TaskStatus::InProgress);
    assert_eq!(normalized.tasks[1].start, date(3, 5));
    assert_eq!(normalized.tasks[1].status, TaskStatus::Done);
}

#[test]
fn array_ish_object_keeps_numeric_order() {
    let raw = json!({
        "10": {"id": "ten", "start": "2025-03-10"},
        "2": {"id": "two", "start": "2025-03-02"},
        "meta": {"id": "ignored", "start": "2025-03-01"}
    });
    let (shape, records) = coerce_with_shape(&raw);
    assert_eq!(shape, StorageShape::ArrayIsh);
    let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["two", "ten"]);
}

#[test]
fn timestamps_keep_their_written_date() {
    let raw = json!([
        {"id": "a", "start": "2025-03-01T23:30:00-08:00"},
        {"id": "b", "start": "2025-03-02T10:00:00Z", "due": "2025-03-04 18:00"}
    ]);
    let tasks = normalize_tasks(&raw).tasks;
    assert_eq!(tasks[0].start, date(3, 1));
    assert_eq!(tasks[1].start, date(3, 2));
    assert_eq!(tasks[1].end, date(3, 4));
}
