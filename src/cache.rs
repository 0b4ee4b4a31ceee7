//! In-memory task collection cache.
//!
//! The cache is the source of truth for the UI between reloads. A reload
//! always replaces the collection wholesale; there is no partial merge, so a
//! multi-field edit can never leave a half-applied record behind. The only
//! other writer is the ordering path in [`crate::board`], which is the sole
//! writer of `order` fields.
//!
//! Reloads race: two mutations issued in quick succession each trigger one,
//! and the responses can arrive out of order. Every reload therefore takes a
//! [`ReloadTicket`] up front, and only the ticket from the newest reload may
//! write back. A stale completion is discarded, and a detached cache (its
//! view has unmounted) accepts nothing at all.

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{SyncState, Task, TaskId};
use crate::ops::order::OrderAssignment;

/// Ticket for one in-flight reload, ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
}

/// What happened to a completed reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied,
    /// A newer reload already completed; this result was dropped.
    Stale,
    /// The cache was detached; no further writes are accepted.
    Detached,
}

/// Issues [`ReloadTicket`]s and admits completions in order. Shared by the
/// cache and the task detail session.
#[derive(Debug, Default)]
pub struct ReloadGuard {
    issued: u64,
    applied: u64,
    detached: bool,
}

impl ReloadGuard {
    pub fn begin(&mut self) -> ReloadTicket {
        self.issued += 1;
        ReloadTicket {
            generation: self.issued,
        }
    }

    /// Decide whether a completed reload may write back. Admitting a ticket
    /// also supersedes every older outstanding one.
    pub fn admit(&mut self, ticket: ReloadTicket) -> ReloadOutcome {
        if self.detached {
            return ReloadOutcome::Detached;
        }
        if ticket.generation <= self.applied {
            return ReloadOutcome::Stale;
        }
        self.applied = ticket.generation;
        ReloadOutcome::Applied
    }

    /// Permanently reject all future completions.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

/// Identity-keyed task collection, preserving store order.
#[derive(Debug, Default)]
pub struct TaskCache {
    tasks: IndexMap<TaskId, Task>,
    guard: ReloadGuard,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a reload. The ticket must be presented to [`complete_reload`]
    /// together with the fetched tasks.
    ///
    /// [`complete_reload`]: TaskCache::complete_reload
    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.guard.begin()
    }

    /// Finish a reload, replacing the collection wholesale if the ticket is
    /// still current.
    pub fn complete_reload(&mut self, ticket: ReloadTicket, tasks: Vec<Task>) -> ReloadOutcome {
        let outcome = self.guard.admit(ticket);
        match outcome {
            ReloadOutcome::Applied => {
                self.tasks = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
            }
            ReloadOutcome::Stale => {
                debug!(?ticket, "discarding stale reload");
            }
            ReloadOutcome::Detached => {
                debug!(?ticket, "discarding reload for detached cache");
            }
        }
        outcome
    }

    /// Abandon in-flight reloads and refuse all future writes. Called when
    /// the view observing this cache goes away.
    pub fn detach(&mut self) {
        self.guard.detach();
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ordering-path write: apply new sort keys and mark the affected tasks.
    /// Tasks not named in the plan are untouched.
    pub(crate) fn apply_order(&mut self, plan: &[OrderAssignment], sync: SyncState) {
        for assignment in plan {
            if let Some(task) = self.tasks.get_mut(&assignment.id) {
                task.order = assignment.order;
                task.sync = sync;
            }
        }
    }

    /// Ordering-path write: update reconciliation state only.
    pub(crate) fn set_sync<'a, I>(&mut self, ids: I, sync: SyncState)
    where
        I: IntoIterator<Item = &'a TaskId>,
    {
        for id in ids {
            if let Some(task) = self.tasks.get_mut(id) {
                task.sync = sync;
            }
        }
    }
}
