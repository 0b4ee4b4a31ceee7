//! Single-task session: subtask lifecycle and the history audit log.
//!
//! Like the board, every mutation is followed by a reload of the whole
//! record; the per-session [`ReloadGuard`] keeps an out-of-order response
//! from clobbering a newer one, and `detach` stops all write-back once the
//! view observing this session goes away.

use tracing::debug;

use crate::Confirmation;
use crate::cache::{ReloadGuard, ReloadOutcome};
use crate::error::ClientError;
use crate::gateway::{StoreGateway, SubtaskDraft, SubtaskPatch};
use crate::model::{HistoryEntry, HistoryId, Status, Subtask, SubtaskId, Task, TaskId};
use crate::ops::subtask_view::{self, SubtaskSort};

/// One task opened for inspection and editing.
pub struct TaskDetail<G> {
    gateway: G,
    task_id: TaskId,
    task: Option<Task>,
    history: Vec<HistoryEntry>,
    guard: ReloadGuard,
}

impl<G: StoreGateway> TaskDetail<G> {
    pub fn new(gateway: G, task_id: TaskId) -> Self {
        TaskDetail {
            gateway,
            task_id,
            task: None,
            history: Vec::new(),
            guard: ReloadGuard::default(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// The record as of the last admitted reload; `None` before the first
    /// load completes or after the task is deleted.
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Audit entries, newest first as the store returns them.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Fetch the record and its history together so the two never show
    /// different generations of the same task.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let ticket = self.guard.begin();
        let task = self.gateway.get_task(&self.task_id).await?;
        let history = self.gateway.list_history(&self.task_id).await?;
        match self.guard.admit(ticket) {
            ReloadOutcome::Applied => {
                self.task = Some(task);
                self.history = history;
            }
            outcome => debug!(?outcome, task = %self.task_id, "detail reload superseded"),
        }
        Ok(())
    }

    /// Subtasks as displayed: search filter then sort, computed fresh from
    /// the loaded record on every call.
    pub fn visible_subtasks(&self, search: &str, sort: SubtaskSort) -> Vec<&Subtask> {
        match &self.task {
            Some(task) => subtask_view::visible_subtasks(&task.subtasks, search, sort),
            None => Vec::new(),
        }
    }

    pub async fn add_subtask(&mut self, draft: SubtaskDraft) -> Result<(), ClientError> {
        if draft.title.trim().is_empty() {
            return Err(ClientError::Validation(
                "subtask title must not be empty".into(),
            ));
        }
        self.gateway.create_subtask(&self.task_id, draft).await?;
        self.load().await
    }

    pub async fn update_subtask(
        &mut self,
        subtask: &SubtaskId,
        patch: SubtaskPatch,
    ) -> Result<(), ClientError> {
        self.gateway
            .update_subtask(&self.task_id, subtask, patch)
            .await?;
        self.load().await
    }

    /// Move a subtask through todo / in-progress / done directly.
    pub async fn set_subtask_status(
        &mut self,
        subtask: &SubtaskId,
        status: Status,
    ) -> Result<(), ClientError> {
        self.gateway
            .set_subtask_status(&self.task_id, subtask, status)
            .await?;
        self.load().await
    }

    /// Confirm-gated. A cancelled gate is a no-op with no network call.
    pub async fn remove_subtask(
        &mut self,
        subtask: &SubtaskId,
        confirm: Confirmation,
    ) -> Result<(), ClientError> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        self.gateway.delete_subtask(&self.task_id, subtask).await?;
        self.load().await
    }

    /// Confirm-gated deletion of a single audit entry.
    pub async fn delete_history_entry(
        &mut self,
        entry: &HistoryId,
        confirm: Confirmation,
    ) -> Result<(), ClientError> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        self.gateway
            .delete_history_entry(&self.task_id, entry)
            .await?;
        self.load().await
    }

    /// Confirm-gated wipe of the whole audit log.
    pub async fn clear_history(&mut self, confirm: Confirmation) -> Result<(), ClientError> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        self.gateway.clear_history(&self.task_id).await?;
        self.load().await
    }

    /// Delete the task itself. Returns `true` if the deletion went through;
    /// on success the session detaches, since the record no longer exists.
    pub async fn delete_task(&mut self, confirm: Confirmation) -> Result<bool, ClientError> {
        if !confirm.is_confirmed() {
            return Ok(false);
        }
        self.gateway.delete_task(&self.task_id).await?;
        self.task = None;
        self.history.clear();
        self.guard.detach();
        Ok(true)
    }

    /// Abandon in-flight reloads and refuse all future write-back.
    pub fn detach(&mut self) {
        self.guard.detach();
    }
}
