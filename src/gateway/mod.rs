//! Remote store contract.
//!
//! The engine is agnostic to the wire format: anything that can satisfy this
//! operation set — a REST/JSON server, the in-memory store in [`memory`] —
//! can back a session. All mutating calls are fire-and-confirm: success
//! carries no payload the client depends on beyond the follow-up reload.
//!
//! History entries are appended *here*, server-side, as side effects of task
//! and subtask mutations; the client never writes them.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{
    AnalyticsSummary, DailyCompletion, HistoryEntry, HistoryId, Priority, PrioritySlice, Project,
    ProjectId, Status, SubtaskId, Task, TaskId,
};
use crate::ops::order::OrderAssignment;

/// Error from a gateway call.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("remote error {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Fields for creating a task. The server assigns identity, timestamps, and
/// the initial history entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl Default for TaskDraft {
    /// The create-form defaults: Todo, Medium, unassigned.
    fn default() -> Self {
        TaskDraft {
            title: String::new(),
            description: String::new(),
            status: Status::Todo,
            priority: Priority::Medium,
            project: None,
            due_date: None,
            tags: Vec::new(),
        }
    }
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial task update; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// `Some(None)` clears the project assignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Option<ProjectId>>,
    /// `Some(None)` clears the due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Fields for creating a subtask.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Default for SubtaskDraft {
    fn default() -> Self {
        SubtaskDraft {
            title: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
        }
    }
}

impl SubtaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        SubtaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial subtask update; only supplied fields change.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

/// Fields for creating or fully updating a project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        ProjectDraft {
            name: String::new(),
            description: String::new(),
            color: "#6366f1".to_string(),
        }
    }
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectDraft {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// The full operation set the engine requires from the remote store.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    // --- tasks ---
    async fn list_tasks(&self) -> GatewayResult<Vec<Task>>;
    async fn get_task(&self, id: &TaskId) -> GatewayResult<Task>;
    async fn create_task(&self, draft: TaskDraft) -> GatewayResult<Task>;
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> GatewayResult<()>;
    async fn delete_task(&self, id: &TaskId) -> GatewayResult<()>;
    /// Bulk write of new sort keys, one round trip for the whole view.
    async fn reorder_tasks(&self, plan: Vec<OrderAssignment>) -> GatewayResult<()>;

    // --- subtasks ---
    async fn create_subtask(&self, task: &TaskId, draft: SubtaskDraft) -> GatewayResult<()>;
    async fn update_subtask(
        &self,
        task: &TaskId,
        subtask: &SubtaskId,
        patch: SubtaskPatch,
    ) -> GatewayResult<()>;
    async fn set_subtask_status(
        &self,
        task: &TaskId,
        subtask: &SubtaskId,
        status: Status,
    ) -> GatewayResult<()>;
    async fn delete_subtask(&self, task: &TaskId, subtask: &SubtaskId) -> GatewayResult<()>;

    // --- history ---
    async fn list_history(&self, task: &TaskId) -> GatewayResult<Vec<HistoryEntry>>;
    async fn delete_history_entry(&self, task: &TaskId, entry: &HistoryId) -> GatewayResult<()>;
    async fn clear_history(&self, task: &TaskId) -> GatewayResult<()>;

    // --- projects ---
    async fn list_projects(&self) -> GatewayResult<Vec<Project>>;
    async fn create_project(&self, draft: ProjectDraft) -> GatewayResult<Project>;
    async fn update_project(&self, id: &ProjectId, draft: ProjectDraft) -> GatewayResult<()>;
    /// Unassigns referencing tasks; never cascades into task deletion.
    async fn delete_project(&self, id: &ProjectId) -> GatewayResult<()>;

    // --- analytics (server-computed, read-only) ---
    async fn analytics_summary(&self) -> GatewayResult<AnalyticsSummary>;
    async fn analytics_priority(&self) -> GatewayResult<Vec<PrioritySlice>>;
    async fn analytics_daily(&self) -> GatewayResult<Vec<DailyCompletion>>;
}
