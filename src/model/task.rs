use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::project::ProjectId;
use super::subtask::Subtask;

/// Opaque, stable task identity assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Task lifecycle status. Shared by tasks and subtasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Todo,
    /// Stored as `"In Progress"` in the document store.
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    pub fn is_done(self) -> bool {
        self == Status::Done
    }

    /// The store's wire name for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "Todo",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Rank used for priority-descending sorts: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Local reconciliation state for the optimistic reorder path.
///
/// Only the ordering path writes this; a full reload resets every task to
/// `Synced` because reloaded records come straight from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Synced,
    /// A bulk reorder write carrying this task is in flight.
    PendingWrite,
    /// The reorder write failed; the store disagrees with the cache until the
    /// next full reload.
    WriteFailed,
}

/// A top-level work item with all its owned subtasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    /// Weak reference to a project; `None` means unassigned.
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Ordered; duplicates allowed.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owned exclusively by this task; deleted with it.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Sort key for the manual view. Dense only within the manually ordered
    /// view; relative sequence matches the last committed arrangement.
    #[serde(default)]
    pub order: i64,
    /// Server-assigned.
    pub created_at: DateTime<Utc>,
    /// Server-assigned.
    pub updated_at: DateTime<Utc>,
    /// Local-only; never serialized.
    #[serde(skip)]
    pub sync: SyncState,
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.description == other.description
            && self.status == other.status
            && self.priority == other.priority
            && self.project == other.project
            && self.due_date == other.due_date
            && self.tags == other.tags
            && self.subtasks == other.subtasks
            && self.order == other.order
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

impl Eq for Task {}
