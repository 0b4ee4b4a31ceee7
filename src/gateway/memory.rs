//! In-memory implementation of the store contract.
//!
//! This is the reference implementation of the server-side rules the engine
//! relies on: id and timestamp assignment, history entries appended as side
//! effects of mutations, cascade deletion of subtasks and history with their
//! task, unassignment (never deletion) of tasks when a project goes away, and
//! the dashboard aggregates. Tests run against it; it also documents exactly
//! what a real transport must provide.
//!
//! Test hooks: seeded documents via the builder, per-operation injected
//! failures, and an append-only call log so tests can assert that an
//! operation issued zero network calls.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use super::{
    GatewayError, GatewayResult, ProjectDraft, StoreGateway, SubtaskDraft, SubtaskPatch,
    TaskDraft, TaskPatch,
};
use crate::model::{
    AnalyticsSummary, DailyCompletion, HistoryEntry, HistoryId, Priority, PrioritySlice, Project,
    ProjectId, Status, Subtask, SubtaskId, SyncState, Task, TaskId,
};
use crate::ops::filter::is_overdue;
use crate::ops::order::OrderAssignment;

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: IndexMap<TaskId, Task>,
    projects: IndexMap<ProjectId, Project>,
    history: HashMap<TaskId, Vec<HistoryEntry>>,
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a task document directly, bypassing the create path.
    pub fn with_task(self, task: Task) -> Self {
        {
            let mut inner = self.lock();
            inner.tasks.insert(task.id.clone(), task);
        }
        self
    }

    /// Seed a project document directly.
    pub fn with_project(self, project: Project) -> Self {
        {
            let mut inner = self.lock();
            inner.projects.insert(project.id.clone(), project);
        }
        self
    }

    /// Make the named operation fail with a remote error until further
    /// notice. The call is still recorded in the call log.
    pub fn fail_on(self, op: &'static str) -> Self {
        self.lock().failing.insert(op);
        self
    }

    /// Every operation invoked so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    /// Current stored state of a task, for assertions.
    pub fn task_snapshot(&self, id: &TaskId) -> Option<Task> {
        self.lock().tasks.get(id).cloned()
    }

    pub fn project_snapshot(&self, id: &ProjectId) -> Option<Project> {
        self.lock().projects.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked test thread must not wedge every later assertion.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, op: &'static str) -> GatewayResult<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.calls.push(op);
        if inner.failing.contains(op) {
            return Err(GatewayError::Remote {
                status: 500,
                message: format!("injected failure for {op}"),
            });
        }
        Ok(inner)
    }
}

impl Inner {
    /// Append a history entry for a task (the server-side audit side effect).
    fn log(&mut self, task: &TaskId, action: &str, details: String) {
        let entry = HistoryEntry {
            id: HistoryId(Uuid::new_v4().to_string()),
            task: task.clone(),
            action: action.to_string(),
            details,
            timestamp: Utc::now(),
        };
        self.history.entry(task.clone()).or_default().push(entry);
    }

    fn task_mut(&mut self, id: &TaskId) -> GatewayResult<&mut Task> {
        self.tasks
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(format!("task {id}")))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl StoreGateway for MemoryGateway {
    async fn list_tasks(&self) -> GatewayResult<Vec<Task>> {
        let inner = self.enter("list_tasks")?;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: &TaskId) -> GatewayResult<Task> {
        let inner = self.enter("get_task")?;
        inner
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("task {id}")))
    }

    async fn create_task(&self, draft: TaskDraft) -> GatewayResult<Task> {
        let mut inner = self.enter("create_task")?;
        let now = Utc::now();
        let task = Task {
            id: TaskId(new_id()),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            priority: draft.priority,
            project: draft.project,
            due_date: draft.due_date,
            tags: draft.tags,
            subtasks: Vec::new(),
            // New tasks land at the end of the manual view.
            order: inner.tasks.len() as i64,
            created_at: now,
            updated_at: now,
            sync: SyncState::Synced,
        };
        let id = task.id.clone();
        let title = task.title.clone();
        inner.tasks.insert(id.clone(), task.clone());
        inner.log(&id, "Task created", title);
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> GatewayResult<()> {
        let mut inner = self.enter("update_task")?;
        let mut changed = Vec::new();
        {
            let task = inner.task_mut(id)?;
            if let Some(title) = patch.title {
                task.title = title;
                changed.push("title");
            }
            if let Some(description) = patch.description {
                task.description = description;
                changed.push("description");
            }
            if let Some(status) = patch.status {
                task.status = status;
                changed.push("status");
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
                changed.push("priority");
            }
            if let Some(project) = patch.project {
                task.project = project;
                changed.push("project");
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
                changed.push("dueDate");
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
                changed.push("tags");
            }
            task.updated_at = Utc::now();
        }
        inner.log(id, "Task updated", changed.join(", "));
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> GatewayResult<()> {
        let mut inner = self.enter("delete_task")?;
        if inner.tasks.shift_remove(id).is_none() {
            return Err(GatewayError::NotFound(format!("task {id}")));
        }
        // Subtasks live inside the document; history cascades with the task.
        inner.history.remove(id);
        Ok(())
    }

    async fn reorder_tasks(&self, plan: Vec<OrderAssignment>) -> GatewayResult<()> {
        let mut inner = self.enter("reorder_tasks")?;
        for assignment in plan {
            let task = inner.task_mut(&assignment.id)?;
            task.order = assignment.order;
        }
        Ok(())
    }

    async fn create_subtask(&self, task_id: &TaskId, draft: SubtaskDraft) -> GatewayResult<()> {
        let mut inner = self.enter("create_subtask")?;
        let now = Utc::now();
        let title = draft.title.clone();
        {
            let task = inner.task_mut(task_id)?;
            task.subtasks.push(Subtask {
                id: SubtaskId(new_id()),
                title: draft.title,
                description: draft.description,
                status: Status::Todo,
                priority: draft.priority,
                due_date: draft.due_date,
                created_at: now,
                updated_at: now,
            });
            task.updated_at = now;
        }
        inner.log(task_id, "Subtask added", title);
        Ok(())
    }

    async fn update_subtask(
        &self,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
        patch: SubtaskPatch,
    ) -> GatewayResult<()> {
        let mut inner = self.enter("update_subtask")?;
        let title;
        {
            let task = inner.task_mut(task_id)?;
            let now = Utc::now();
            let sub = task
                .subtasks
                .iter_mut()
                .find(|s| s.id == *subtask_id)
                .ok_or_else(|| GatewayError::NotFound(format!("subtask {subtask_id}")))?;
            if let Some(t) = patch.title {
                sub.title = t;
            }
            if let Some(description) = patch.description {
                sub.description = description;
            }
            if let Some(status) = patch.status {
                sub.status = status;
            }
            if let Some(priority) = patch.priority {
                sub.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                sub.due_date = due_date;
            }
            sub.updated_at = now;
            title = sub.title.clone();
            task.updated_at = now;
        }
        inner.log(task_id, "Subtask updated", title);
        Ok(())
    }

    async fn set_subtask_status(
        &self,
        task_id: &TaskId,
        subtask_id: &SubtaskId,
        status: Status,
    ) -> GatewayResult<()> {
        let mut inner = self.enter("set_subtask_status")?;
        let details;
        {
            let task = inner.task_mut(task_id)?;
            let now = Utc::now();
            let sub = task
                .subtasks
                .iter_mut()
                .find(|s| s.id == *subtask_id)
                .ok_or_else(|| GatewayError::NotFound(format!("subtask {subtask_id}")))?;
            details = format!("{}: {} -> {}", sub.title, sub.status, status);
            sub.status = status;
            sub.updated_at = now;
            task.updated_at = now;
        }
        inner.log(task_id, "Subtask status changed", details);
        Ok(())
    }

    async fn delete_subtask(&self, task_id: &TaskId, subtask_id: &SubtaskId) -> GatewayResult<()> {
        let mut inner = self.enter("delete_subtask")?;
        let title;
        {
            let task = inner.task_mut(task_id)?;
            let index = task
                .subtasks
                .iter()
                .position(|s| s.id == *subtask_id)
                .ok_or_else(|| GatewayError::NotFound(format!("subtask {subtask_id}")))?;
            title = task.subtasks.remove(index).title;
            task.updated_at = Utc::now();
        }
        inner.log(task_id, "Subtask removed", title);
        Ok(())
    }

    async fn list_history(&self, task: &TaskId) -> GatewayResult<Vec<HistoryEntry>> {
        let inner = self.enter("list_history")?;
        Ok(inner.history.get(task).cloned().unwrap_or_default())
    }

    async fn delete_history_entry(&self, task: &TaskId, entry: &HistoryId) -> GatewayResult<()> {
        let mut inner = self.enter("delete_history_entry")?;
        let entries = inner
            .history
            .get_mut(task)
            .ok_or_else(|| GatewayError::NotFound(format!("history for task {task}")))?;
        let index = entries
            .iter()
            .position(|e| e.id == *entry)
            .ok_or_else(|| GatewayError::NotFound(format!("history entry {}", entry.as_str())))?;
        entries.remove(index);
        Ok(())
    }

    async fn clear_history(&self, task: &TaskId) -> GatewayResult<()> {
        let mut inner = self.enter("clear_history")?;
        inner.history.remove(task);
        Ok(())
    }

    async fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        let inner = self.enter("list_projects")?;
        Ok(inner.projects.values().cloned().collect())
    }

    async fn create_project(&self, draft: ProjectDraft) -> GatewayResult<Project> {
        let mut inner = self.enter("create_project")?;
        let project = Project {
            id: ProjectId(new_id()),
            name: draft.name,
            description: draft.description,
            color: draft.color,
        };
        inner.projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &ProjectId, draft: ProjectDraft) -> GatewayResult<()> {
        let mut inner = self.enter("update_project")?;
        let project = inner
            .projects
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(format!("project {id}")))?;
        project.name = draft.name;
        project.description = draft.description;
        project.color = draft.color;
        Ok(())
    }

    async fn delete_project(&self, id: &ProjectId) -> GatewayResult<()> {
        let mut inner = self.enter("delete_project")?;
        if inner.projects.shift_remove(id).is_none() {
            return Err(GatewayError::NotFound(format!("project {id}")));
        }
        // Weak references: referencing tasks are unassigned, never deleted.
        for task in inner.tasks.values_mut() {
            if task.project.as_ref() == Some(id) {
                task.project = None;
            }
        }
        Ok(())
    }

    async fn analytics_summary(&self) -> GatewayResult<AnalyticsSummary> {
        let inner = self.enter("analytics_summary")?;
        let now = Utc::now();
        let mut summary = AnalyticsSummary::default();
        for task in inner.tasks.values() {
            summary.total_tasks += 1;
            if task.status.is_done() {
                summary.completed_tasks += 1;
            } else {
                summary.pending_tasks += 1;
            }
            if is_overdue(task, now) {
                summary.overdue_tasks += 1;
            }
        }
        Ok(summary)
    }

    async fn analytics_priority(&self) -> GatewayResult<Vec<PrioritySlice>> {
        let inner = self.enter("analytics_priority")?;
        Ok([Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|priority| PrioritySlice {
                name: priority.as_str().to_string(),
                value: inner
                    .tasks
                    .values()
                    .filter(|t| t.priority == priority)
                    .count() as u32,
            })
            .collect())
    }

    async fn analytics_daily(&self) -> GatewayResult<Vec<DailyCompletion>> {
        let inner = self.enter("analytics_daily")?;
        let today = Utc::now().date_naive();
        Ok((0..7)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                DailyCompletion {
                    date,
                    count: inner
                        .tasks
                        .values()
                        .filter(|t| t.status.is_done() && t.updated_at.date_naive() == date)
                        .count() as u32,
                }
            })
            .collect())
    }
}
