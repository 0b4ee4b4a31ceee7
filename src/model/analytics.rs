//! Read-only aggregates computed by the store for the dashboard.
//!
//! The client consumes these as-is; it never derives them locally, so the
//! dashboard numbers and the filter pipeline cannot drift apart on the client
//! side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline counts for the dashboard summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Not done: Todo or In Progress.
    pub pending_tasks: u32,
    pub overdue_tasks: u32,
}

/// One slice of the priority distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySlice {
    /// Priority wire name: `"High"`, `"Medium"`, `"Low"`.
    pub name: String,
    pub value: u32,
}

/// Completed-task count for one calendar day (last-7-days chart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub count: u32,
}
