//! Filter/sort pipeline over the task cache.
//!
//! Pure and deterministic: the current moment is an explicit parameter and
//! nothing here touches the clock, so two applications with identical inputs
//! produce identical sequences. That stability matters — the ordering
//! engine's drag indices refer to the sequence this module produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ProjectId, Status, Task};

/// Status predicate. `Pending` and `Overdue` are the derived filters the
/// dashboard summary cards jump to; they used to arrive as a navigation side
/// channel and are now ordinary criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Is(Status),
    /// Not done: Todo or In Progress.
    Pending,
    /// Past due, not due today, and not done.
    Overdue,
}

/// Project predicate: a specific project, or the pass-through sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectFilter {
    #[default]
    All,
    Is(ProjectId),
}

/// Creation-time window, measured in whole days back from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateWindow {
    #[default]
    #[serde(rename = "All Time")]
    AllTime,
    #[serde(rename = "Last 24 Hours")]
    Last24Hours,
    #[serde(rename = "Last 7 Days")]
    Last7Days,
    #[serde(rename = "Last 30 Days")]
    Last30Days,
}

impl DateWindow {
    fn max_days(self) -> Option<i64> {
        match self {
            DateWindow::AllTime => None,
            DateWindow::Last24Hours => Some(1),
            DateWindow::Last7Days => Some(7),
            DateWindow::Last30Days => Some(30),
        }
    }
}

/// Sort applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// Descending creation time.
    #[default]
    Newest,
    /// Ascending creation time.
    Oldest,
    /// Ascending `order`; ties keep cache order (stable sort).
    Manual,
}

/// The full criteria object passed into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub status: StatusFilter,
    pub project: ProjectFilter,
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    pub window: DateWindow,
    pub sort: SortMode,
}

/// A task is overdue when its due day is past and it is not done. A task due
/// today is not yet late.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) => due < now.date_naive() && !task.status.is_done(),
        None => false,
    }
}

/// Signed day count from now to the due date; negative when past due. Derived
/// on demand, never stored.
pub fn days_until_due(task: &Task, now: DateTime<Utc>) -> Option<i64> {
    task.due_date.map(|due| (due - now.date_naive()).num_days())
}

/// Apply the pipeline: every predicate must hold, then a stable sort.
pub fn apply<'a, I>(tasks: I, criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let needle = criteria.search.trim().to_lowercase();
    let mut out: Vec<&Task> = tasks
        .into_iter()
        .filter(|task| {
            matches_status(task, criteria.status, now)
                && matches_project(task, &criteria.project)
                && matches_search(task, &needle)
                && matches_window(task, criteria.window, now)
        })
        .collect();

    match criteria.sort {
        SortMode::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Manual => out.sort_by_key(|task| task.order),
    }
    out
}

fn matches_status(task: &Task, filter: StatusFilter, now: DateTime<Utc>) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Is(status) => task.status == status,
        StatusFilter::Pending => !task.status.is_done(),
        StatusFilter::Overdue => is_overdue(task, now),
    }
}

fn matches_project(task: &Task, filter: &ProjectFilter) -> bool {
    match filter {
        ProjectFilter::All => true,
        ProjectFilter::Is(id) => task.project.as_ref() == Some(id),
    }
}

/// Substring match over the task's own text and, recursively, its subtasks'.
fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task.subtasks.iter().any(|sub| {
            sub.title.to_lowercase().contains(needle)
                || sub.description.to_lowercase().contains(needle)
        })
}

fn matches_window(task: &Task, window: DateWindow, now: DateTime<Utc>) -> bool {
    match window.max_days() {
        None => true,
        Some(max) => whole_days_between(task.created_at, now) <= max,
    }
}

/// Whole-day difference, rounded up. A task created 25 hours ago is 2 days
/// old for windowing purposes.
fn whole_days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (now - then).num_seconds().unsigned_abs();
    secs.div_ceil(86_400) as i64
}
