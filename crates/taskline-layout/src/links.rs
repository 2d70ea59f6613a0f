//! Dependency-link resolver
//!
//! Anchor selection by dependency type:
//!
//! | type | from (predecessor) | to (successor) |
//! |------|--------------------|----------------|
//! | FS   | finish             | start          |
//! | SS   | start              | start          |
//! | FF   | finish             | finish         |
//! | SF   | start              | finish         |
//!
//! Links are routed as three orthogonal segments with the vertical segment
//! placed `elbow` pixels from the start anchor, toward the end anchor.
//! Cycles are drawn like any other edge.

use taskline_core::{DependencyLink, DependencyType, Geometry, LayoutPosition, LinkPath, Point, Task};
use tracing::trace;

use crate::layout::LayoutMap;

/// `(from_pct, to_pct)` anchors for a link between two positioned tasks
pub fn anchor_pcts(dep_type: DependencyType, from: &LayoutPosition, to: &LayoutPosition) -> (f64, f64) {
    match dep_type {
        DependencyType::FinishToStart => (from.right_pct, to.left_pct),
        DependencyType::StartToStart => (from.left_pct, to.left_pct),
        DependencyType::FinishToFinish => (from.right_pct, to.right_pct),
        DependencyType::StartToFinish => (from.left_pct, to.right_pct),
    }
}

/// Orthogonal path `(fx,fy) → (mid,fy) → (mid,ty) → (tx,ty)`
pub fn route(from: Point, to: Point, elbow: f64) -> LinkPath {
    let mid_x = if to.x >= from.x {
        from.x + elbow
    } else {
        from.x - elbow
    };
    LinkPath {
        points: [
            from,
            Point::new(mid_x, from.y),
            Point::new(mid_x, to.y),
            to,
        ],
    }
}

/// Link geometry for one edge
pub fn link_between(
    from_id: &str,
    from: &LayoutPosition,
    to_id: &str,
    to: &LayoutPosition,
    dep_type: DependencyType,
    geometry: &Geometry,
) -> DependencyLink {
    let (from_pct, to_pct) = anchor_pcts(dep_type, from, to);
    let path = route(
        Point::new(geometry.pct_to_x(from_pct), geometry.row_center_y(from.row)),
        Point::new(geometry.pct_to_x(to_pct), geometry.row_center_y(to.row)),
        geometry.elbow,
    );
    DependencyLink {
        from_id: from_id.to_string(),
        to_id: to_id.to_string(),
        dep_type,
        from_pct,
        to_pct,
        path,
    }
}

/// Resolve every declared dependency between laid-out tasks.
///
/// Edges whose predecessor has no layout position (filtered out, outside the
/// window, or unknown) are skipped.
pub fn resolve_links(tasks: &[&Task], layout: &LayoutMap, geometry: &Geometry) -> Vec<DependencyLink> {
    let mut links = Vec::new();
    for task in tasks {
        let Some(to_pos) = layout.get(&task.id) else {
            continue;
        };
        for dep in &task.depends_on {
            let Some(from_pos) = layout.get(&dep.target_id) else {
                trace!(task = %task.id, predecessor = %dep.target_id, "skipping dangling dependency");
                continue;
            };
            links.push(link_between(
                &dep.target_id,
                from_pos,
                &task.id,
                to_pos,
                dep.dep_type,
                geometry,
            ));
        }
    }
    links
}
