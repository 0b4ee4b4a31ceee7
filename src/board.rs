//! Task list session: owns the cache and filter criteria, and orchestrates
//! reloads and the manual-reorder write path.
//!
//! Every mutation goes through the gateway and is followed by a full reload —
//! reload-over-merge trades bandwidth for correctness and eliminates
//! merge-conflict logic. The one deliberate exception is the reorder path,
//! which updates the cache optimistically and reconciles in the background.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::Confirmation;
use crate::cache::{ReloadOutcome, TaskCache};
use crate::error::ClientError;
use crate::gateway::{StoreGateway, TaskDraft, TaskPatch};
use crate::model::{ClientConfig, Project, SyncState, Task, TaskId};
use crate::ops::filter::{self, FilterCriteria};
use crate::ops::order;

/// The task list and its display state.
pub struct TaskBoard<G> {
    gateway: G,
    cache: TaskCache,
    projects: Vec<Project>,
    criteria: FilterCriteria,
}

impl<G: StoreGateway> TaskBoard<G> {
    pub fn new(gateway: G) -> Self {
        TaskBoard {
            gateway,
            cache: TaskCache::new(),
            projects: Vec::new(),
            criteria: FilterCriteria::default(),
        }
    }

    /// A board whose initial criteria come from the config file.
    pub fn with_config(gateway: G, config: &ClientConfig) -> Self {
        let mut board = Self::new(gateway);
        board.criteria.sort = config.defaults.sort;
        board.criteria.window = config.defaults.date_window;
        board
    }

    /// Full refresh: tasks and projects together, replacing the cache
    /// wholesale. A reload that loses the race to a newer one is discarded.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let ticket = self.cache.begin_reload();
        let tasks = self.gateway.list_tasks().await?;
        let projects = self.gateway.list_projects().await?;
        match self.cache.complete_reload(ticket, tasks) {
            ReloadOutcome::Applied => self.projects = projects,
            outcome => debug!(?outcome, "board reload superseded"),
        }
        Ok(())
    }

    /// Direct access to the underlying store, for operations the board does
    /// not mediate (analytics, cross-session setup).
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.cache.get(id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// The displayed sequence: the pipeline applied to the cache. Drag
    /// indices passed to [`move_task`] refer to positions in this sequence.
    ///
    /// [`move_task`]: TaskBoard::move_task
    pub fn visible(&self, now: DateTime<Utc>) -> Vec<&Task> {
        filter::apply(self.cache.iter(), &self.criteria, now)
    }

    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<TaskId, ClientError> {
        if draft.title.trim().is_empty() {
            return Err(ClientError::Validation(
                "task title must not be empty".into(),
            ));
        }
        let created = self.gateway.create_task(draft).await?;
        self.load().await?;
        Ok(created.id)
    }

    pub async fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> Result<(), ClientError> {
        self.gateway.update_task(id, patch).await?;
        self.load().await
    }

    /// Confirm-gated. A cancelled gate is a no-op with no network call.
    pub async fn delete_task(
        &mut self,
        id: &TaskId,
        confirm: Confirmation,
    ) -> Result<(), ClientError> {
        if !confirm.is_confirmed() {
            return Ok(());
        }
        self.gateway.delete_task(id).await?;
        self.load().await
    }

    /// Move the task at `from` to `to`, both positions in the currently
    /// displayed sequence, and give every displayed task a dense 0-based
    /// `order`. The cache is updated before the bulk write is issued
    /// (optimistic); a failed write is logged and left for the next full
    /// reload to repair — no retry, no rollback.
    pub async fn move_task(
        &mut self,
        from: usize,
        to: usize,
        now: DateTime<Utc>,
    ) -> Result<(), ClientError> {
        let visible: Vec<TaskId> = self
            .visible(now)
            .into_iter()
            .map(|task| task.id.clone())
            .collect();
        if from >= visible.len() || to >= visible.len() {
            return Err(ClientError::InvalidPosition(format!(
                "{from} -> {to} in a list of {}",
                visible.len()
            )));
        }
        let Some(plan) = order::plan_reorder(&visible, from, to) else {
            return Ok(()); // same slot: no cache mutation, no write
        };

        self.cache.apply_order(&plan, SyncState::PendingWrite);
        let ids: Vec<TaskId> = plan.iter().map(|a| a.id.clone()).collect();
        match self.gateway.reorder_tasks(plan).await {
            Ok(()) => self.cache.set_sync(&ids, SyncState::Synced),
            Err(error) => {
                warn!(
                    %error,
                    moved = ids.len(),
                    "reorder write failed; keeping optimistic order until next reload"
                );
                self.cache.set_sync(&ids, SyncState::WriteFailed);
            }
        }
        Ok(())
    }

    /// Abandon in-flight reloads; the cache accepts no further writes.
    /// Called when the view observing this board goes away.
    pub fn detach(&mut self) {
        self.cache.detach();
    }
}
