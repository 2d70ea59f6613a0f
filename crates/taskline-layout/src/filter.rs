//! Filter and visibility engine

use std::cmp::Ordering;
use std::collections::BTreeSet;

use taskline_core::{FilterOptions, Filters, Role, Task, TaskStatus, TimeWindow, Viewer, ALL};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Task fields that have a filter picker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
    Project,
    Assignee,
    Status,
}

impl FilterField {
    fn value<'a>(self, task: &'a Task) -> &'a str {
        match self {
            FilterField::Project => &task.project,
            FilterField::Assignee => &task.assigned,
            FilterField::Status => task.status.as_str(),
        }
    }
}

/// Inclusive overlap: the task has at least one day inside the window
pub fn overlaps(task: &Task, window: &TimeWindow) -> bool {
    task.end >= window.from && task.start <= window.to
}

/// True if `task` passes every active filter
pub fn matches_filters(task: &Task, filters: &Filters) -> bool {
    let field_ok = |wanted: &str, field: FilterField| wanted == ALL || field.value(task) == wanted;

    field_ok(&filters.project, FilterField::Project)
        && field_ok(&filters.assignee, FilterField::Assignee)
        && field_ok(&filters.status, FilterField::Status)
        && filters.viewer.as_ref().map_or(true, |v| viewer_sees(v, task))
}

/// Tasks passing all filters, in input order
pub fn apply_filters<'a>(tasks: &'a [Task], filters: &Filters) -> Vec<&'a Task> {
    tasks.iter().filter(|t| matches_filters(t, filters)).collect()
}

/// Tasks overlapping `window` and passing all filters, in input order
pub fn visible_tasks<'a>(tasks: &'a [Task], window: &TimeWindow, filters: &Filters) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| overlaps(t, window) && matches_filters(t, filters))
        .collect()
}

/// `"all"` followed by the sorted distinct non-empty values of `field`
pub fn distinct_options(tasks: &[Task], field: FilterField) -> Vec<String> {
    let values: BTreeSet<&str> = tasks
        .iter()
        .map(|t| field.value(t))
        .filter(|v| !v.is_empty())
        .collect();
    let mut sorted: Vec<&str> = values.into_iter().collect();
    sorted.sort_by(|a, b| collate(a, b));

    std::iter::once(ALL.to_string())
        .chain(sorted.into_iter().map(str::to_string))
        .collect()
}

/// Picker lists for every filter, computed over the full task set.
///
/// Status always offers the five recognized statuses; any other status
/// present in the data is listed after them.
pub fn filter_options(tasks: &[Task]) -> FilterOptions {
    let mut status: Vec<String> = std::iter::once(ALL.to_string())
        .chain(TaskStatus::CANONICAL.iter().map(|s| s.as_str().to_string()))
        .collect();
    let extra: BTreeSet<&str> = tasks
        .iter()
        .filter(|t| !t.status.is_canonical())
        .map(|t| t.status.as_str())
        .collect();
    status.extend(extra.into_iter().map(str::to_string));

    FilterOptions {
        project: distinct_options(tasks, FilterField::Project),
        assignee: distinct_options(tasks, FilterField::Assignee),
        status,
    }
}

/// Dictionary ordering: accents and case are ignored first, then the
/// lowercase form, then bytes break remaining ties
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Lowercase with diacritics stripped (`"Émile"` -> `"emile"`)
fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Admins see everything, leads the tasks they lead, assignees their own
fn viewer_sees(viewer: &Viewer, task: &Task) -> bool {
    match viewer.role {
        Role::Admin => true,
        Role::Lead => NameMatcher::new(&viewer.name).matches(&task.lead),
        Role::Assignee => NameMatcher::new(&viewer.name).matches(&task.assigned),
    }
}

/// Loose person-name matching for "my tasks".
///
/// Two names match when their full forms, e-mail local parts, or first words
/// agree (case-insensitive), or when one's local part equals the other's
/// first word.
#[derive(Clone, Debug)]
pub struct NameMatcher {
    who: NameParts,
}

#[derive(Clone, Debug, Default)]
struct NameParts {
    full: String,
    local: String,
    first: String,
}

impl NameParts {
    fn of(name: &str) -> Self {
        let full = name.trim().to_lowercase();
        if full.is_empty() {
            return Self::default();
        }
        let local = full.split('@').next().unwrap_or(&full).to_string();
        let first = full.split_whitespace().next().unwrap_or(&full).to_string();
        Self { full, local, first }
    }
}

impl NameMatcher {
    pub fn new(name: &str) -> Self {
        Self {
            who: NameParts::of(name),
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        let c = NameParts::of(candidate);
        if c.full.is_empty() {
            return false;
        }
        let who = &self.who;
        c.full == who.full
            || c.local == who.local
            || c.first == who.first
            || who.local == c.first
            || who.first == c.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn march() -> TimeWindow {
        TimeWindow::month(2025, 3).unwrap()
    }

    #[test]
    fn overlap_is_inclusive() {
        let w = march();
        let before = Task::new("a", NaiveDate::from_ymd_opt(2025, 2, 20).unwrap())
            .ends(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        let touching = Task::new("b", NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()).ends(date(1));
        let last_day = Task::new("c", date(31)).ends(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
        let spanning = Task::new("d", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .ends(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(!overlaps(&before, &w));
        assert!(overlaps(&touching, &w));
        assert!(overlaps(&last_day, &w));
        assert!(overlaps(&spanning, &w));
    }

    #[test]
    fn assignee_filter() {
        let tasks = vec![
            Task::new("1", date(1)).assigned("Sam"),
            Task::new("2", date(1)).assigned("Ann"),
        ];
        let filters = Filters::all().assignee("Sam");
        let ids: Vec<_> = apply_filters(&tasks, &filters).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let tasks = vec![
            Task::new("1", date(1)).project("Apollo").status(TaskStatus::Done),
            Task::new("2", date(1)).project("Apollo").status(TaskStatus::Planned),
            Task::new("3", date(1)).project("Gemini").status(TaskStatus::Done),
        ];
        let filters = Filters::all().project("Apollo").status("DONE");
        let ids: Vec<_> = apply_filters(&tasks, &filters).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1"]);
    }

    #[test]
    fn visible_requires_overlap() {
        let tasks = vec![
            Task::new("in", date(5)),
            Task::new("out", NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()),
        ];
        let ids: Vec<_> = visible_tasks(&tasks, &march(), &Filters::all())
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["in"]);
    }

    #[test]
    fn distinct_options_sorted_with_all_first() {
        let tasks = vec![
            Task::new("1", date(1)).project("zeta"),
            Task::new("2", date(1)).project("Alpha"),
            Task::new("3", date(1)).project("beta"),
            Task::new("4", date(1)).project("Alpha"),
            Task::new("5", date(1)),
        ];
        assert_eq!(
            distinct_options(&tasks, FilterField::Project),
            ["all", "Alpha", "beta", "zeta"]
        );
    }

    #[test]
    fn distinct_options_ignore_accents_when_sorting() {
        let tasks = vec![
            Task::new("1", date(1)).project("Zulu"),
            Task::new("2", date(1)).project("Émile"),
            Task::new("3", date(1)).project("Alpha"),
            Task::new("4", date(1)).project("emile"),
            Task::new("5", date(1)).project("Ötzi"),
        ];
        assert_eq!(
            distinct_options(&tasks, FilterField::Project),
            ["all", "Alpha", "emile", "Émile", "Ötzi", "Zulu"]
        );
    }

    #[test]
    fn status_options_include_unknown_values() {
        let tasks = vec![
            Task::new("1", date(1)).status(TaskStatus::normalize("on hold")),
            Task::new("2", date(1)).status(TaskStatus::Done),
        ];
        let options = filter_options(&tasks);
        assert_eq!(
            options.status,
            ["all", "PLANNED", "IN_PROGRESS", "BLOCKED", "DONE", "COMPLETED", "ON_HOLD"]
        );
        assert_eq!(options.assignee, ["all"]);
    }

    #[test]
    fn name_matcher_variants() {
        let m = NameMatcher::new("Sam Carter");
        assert!(m.matches("sam carter"));
        assert!(m.matches("Sam"));
        assert!(m.matches("sam@example.com"));
        assert!(!m.matches("Ann"));
        assert!(!m.matches(""));

        let by_mail = NameMatcher::new("ann@example.com");
        assert!(by_mail.matches("Ann Lee"));
        assert!(by_mail.matches("ann@other.org"));
    }

    #[test]
    fn assignee_viewer_sees_own_tasks_only() {
        let tasks = vec![
            Task::new("1", date(1)).assigned("Sam Carter"),
            Task::new("2", date(1)).assigned("Ann"),
            Task::new("3", date(1)),
        ];
        let mine = Filters::all().viewer(Viewer::new("sam", Role::Assignee));
        let ids: Vec<_> = apply_filters(&tasks, &mine).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1"]);

        let admin = Filters::all().viewer(Viewer::new("sam", Role::Admin));
        assert_eq!(apply_filters(&tasks, &admin).len(), 3);
    }

    #[test]
    fn lead_viewer_sees_tasks_they_lead() {
        let tasks = vec![
            Task::new("mine", date(1)).lead("Ann Lee").assigned("Bo"),
            Task::new("other", date(1)).lead("Bo").assigned("Ann"),
            Task::new("unled", date(1)),
        ];
        let lead = Filters::all().viewer(Viewer::new("Ann", Role::Lead));
        let ids: Vec<_> = apply_filters(&tasks, &lead).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["mine"]);
    }
}
