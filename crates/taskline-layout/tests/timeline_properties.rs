//! End-to-end timeline properties: raw records in, rows and links out.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use taskline_core::{DependencyType, Filters, Geometry, Role, TimeWindow, Viewer};
use taskline_layout::{autoscroll_offset, compute_timeline, TimelineEngine};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn march() -> TimeWindow {
    TimeWindow::month(2025, 3).unwrap()
}

#[test]
fn finish_to_start_link_geometry() {
    let raw = json!([
        {"id": "A", "title": "A", "startDate": "2025-03-01", "dueDate": "2025-03-03"},
        {"id": "B", "title": "B", "startDate": "2025-03-04", "dueDate": "2025-03-06",
         "dependsOn": [{"id": "A", "type": "FS"}]}
    ]);
    let timeline = compute_timeline(&raw, march(), &Filters::all(), date(2025, 3, 10));

    let a = timeline.row("A").unwrap();
    let b = timeline.row("B").unwrap();
    assert_eq!(a.position.row, 0);
    assert_eq!(b.position.row, 1);

    assert_eq!(timeline.links.len(), 1);
    let link = &timeline.links[0];
    assert_eq!(link.from_id, "A");
    assert_eq!(link.to_id, "B");
    assert_eq!(link.dep_type, DependencyType::FinishToStart);
    assert_eq!(link.from_pct, a.position.right_pct);
    assert_eq!(link.to_pct, b.position.left_pct);

    let g = Geometry::default();
    let a_right = g.pct_to_x(a.position.right_pct);
    let b_left = g.pct_to_x(b.position.left_pct);
    let points = link.path.points;
    assert_eq!(points.len(), 4);
    assert_eq!(points[0].x, a_right);
    assert_eq!(points[1].x, a_right + 12.0);
    assert_eq!(points[2].x, a_right + 12.0);
    assert_eq!(points[3].x, b_left);
    assert_eq!(points[0].y, g.row_center_y(0));
    assert_eq!(points[3].y, g.row_center_y(1));
}

#[test]
fn every_dependency_type_anchors() {
    let raw = json!([
        {"id": "p", "start": "2025-03-02", "end": "2025-03-08"},
        {"id": "fs", "start": "2025-03-10", "end": "2025-03-12", "dependsOn": "p:FS"},
        {"id": "ss", "start": "2025-03-10", "end": "2025-03-13", "dependsOn": "p:SS"},
        {"id": "ff", "start": "2025-03-10", "end": "2025-03-14", "dependsOn": "p:FF"},
        {"id": "sf", "start": "2025-03-10", "end": "2025-03-15", "dependsOn": "p:SF"}
    ]);
    let timeline = compute_timeline(&raw, march(), &Filters::all(), date(2025, 3, 1));
    let p = timeline.row("p").unwrap().position;

    for link in &timeline.links {
        let succ = timeline.row(&link.to_id).unwrap().position;
        let expected = match link.dep_type {
            DependencyType::FinishToStart => (p.right_pct, succ.left_pct),
            DependencyType::StartToStart => (p.left_pct, succ.left_pct),
            DependencyType::FinishToFinish => (p.right_pct, succ.right_pct),
            DependencyType::StartToFinish => (p.left_pct, succ.right_pct),
        };
        assert_eq!((link.from_pct, link.to_pct), expected, "{}", link.to_id);
    }
    assert_eq!(timeline.links.len(), 4);
}

#[test]
fn predecessor_outside_window_is_skipped() {
    let raw = json!([
        {"id": "old", "start": "2025-02-01", "end": "2025-02-20"},
        {"id": "new", "start": "2025-03-05", "end": "2025-03-09", "dependsOn": ["old", "missing:SS"]}
    ]);
    let timeline = compute_timeline(&raw, march(), &Filters::all(), date(2025, 3, 1));
    assert!(timeline.row("old").is_none());
    assert_eq!(timeline.rows.len(), 1);
    assert!(timeline.links.is_empty());
}

#[test]
fn filtered_predecessor_is_skipped() {
    let raw = json!([
        {"id": "a", "start": "2025-03-01", "assigned": "Ann"},
        {"id": "b", "start": "2025-03-02", "assigned": "Sam", "dependsOn": "a"}
    ]);
    let filters = Filters::all().assignee("Sam");
    let timeline = compute_timeline(&raw, march(), &filters, date(2025, 3, 1));
    let ids: Vec<_> = timeline.rows.iter().map(|r| r.task.id.as_str()).collect();
    assert_eq!(ids, ["b"]);
    assert!(timeline.links.is_empty());
    assert_eq!(timeline.filter_options.assignee, ["all", "Ann", "Sam"]);
}

#[test]
fn assignee_viewer_scope() {
    let raw = json!([
        {"id": "a", "start": "2025-03-01", "assigned": "sam@example.com"},
        {"id": "b", "start": "2025-03-02", "assigned": "Ann"}
    ]);
    let filters = Filters::all().viewer(Viewer::new("Sam Carter", Role::Assignee));
    let timeline = compute_timeline(&raw, march(), &filters, date(2025, 3, 1));
    let ids: Vec<_> = timeline.rows.iter().map(|r| r.task.id.as_str()).collect();
    assert_eq!(ids, ["a"]);
}

#[test]
fn lead_viewer_scope() {
    let raw = json!({
        "Ann Lee": [{"id": "mine", "start": "2025-03-01", "assigned": "Bo"}],
        "Bo": [{"id": "other", "start": "2025-03-02", "assigned": "Ann"}]
    });
    let filters = Filters::all().viewer(Viewer::new("Ann", Role::Lead));
    let timeline = compute_timeline(&raw, march(), &filters, date(2025, 3, 1));
    let ids: Vec<_> = timeline.rows.iter().map(|r| r.task.id.as_str()).collect();
    assert_eq!(ids, ["mine"]);

    let admin = Filters::all().viewer(Viewer::new("Ann", Role::Admin));
    assert_eq!(compute_timeline(&raw, march(), &admin, date(2025, 3, 1)).rows.len(), 2);
}

#[test]
fn legacy_grouped_payload() {
    let raw = json!({
        "Ann": [{"id": "a", "startDate": "2025-03-03", "status": "planned"}],
        "Bo": [{"id": "b", "startDate": "2025-03-01", "status": "in progress"}]
    });
    let timeline = compute_timeline(&raw, march(), &Filters::all().status("PLANNED"), date(2025, 3, 1));
    assert_eq!(timeline.rows.len(), 1);
    assert_eq!(timeline.rows[0].task.lead, "Ann");
}

#[test]
fn today_marker_and_autoscroll() {
    let raw = json!([{"id": "a", "start": "2025-03-01"}]);
    let timeline = compute_timeline(&raw, march(), &Filters::all(), date(2025, 3, 16));
    assert_eq!(timeline.today_pct, Some(50.0));
    assert_eq!(autoscroll_offset(3100.0, 1000.0, timeline.today_pct), Some(1050.0));

    let elsewhere = compute_timeline(&raw, march(), &Filters::all(), date(2025, 4, 16));
    assert_eq!(elsewhere.today_pct, None);
    assert_eq!(autoscroll_offset(3100.0, 1000.0, elsewhere.today_pct), None);
}

#[test]
fn single_day_window() {
    let day = date(2025, 3, 5);
    let window = TimeWindow::new(day, day);
    let raw = json!([
        {"id": "a", "start": "2025-03-05"},
        {"id": "b", "start": "2025-03-01", "end": "2025-03-09"}
    ]);
    let timeline = TimelineEngine::new().compute_raw(&raw, window, &Filters::all(), day);
    assert_eq!(timeline.rows.len(), 2);
    for row in &timeline.rows {
        assert!((0.0..=100.0).contains(&row.position.left_pct));
        assert!((0.0..=100.0).contains(&row.position.right_pct));
    }
    assert_eq!(timeline.today_pct, Some(0.0));
}

#[test]
fn timeline_serializes_for_ui() {
    let raw = json!([
        {"id": "a", "start": "2025-03-01", "end": "2025-03-03"},
        {"id": "b", "start": "2025-03-04", "dependsOn": ["a:SS"]}
    ]);
    let timeline = compute_timeline(&raw, march(), &Filters::all(), date(2025, 3, 1));
    let json = serde_json::to_value(&timeline).unwrap();
    assert_eq!(json["rows"][1]["task"]["dependsOn"], json!([{"targetId": "a", "type": "SS"}]));
    assert_eq!(json["links"][0]["fromId"], "a");
    assert_eq!(json["links"][0]["type"], "SS");
    assert_eq!(json["todayPct"], json!(0.0));
    assert_eq!(json["filterOptions"]["status"][0], "all");
    assert_eq!(json["droppedRecords"], 0);
}
