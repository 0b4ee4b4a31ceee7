//! taskdeck — the state and ordering core of a personal task-tracking client.
//!
//! Tasks live in a remote document store; this crate keeps a local cache of
//! them consistent with it while supporting manual drag-to-reorder, a pure
//! filter/sort pipeline, a tri-state subtask lifecycle, and a read/delete-only
//! audit history. Rendering and transport are deliberately outside: anything
//! that implements [`gateway::StoreGateway`] can back a session.
//!
//! The main entry points are [`board::TaskBoard`] (the task list),
//! [`detail::TaskDetail`] (a single task with its subtasks and history), and
//! [`projects::ProjectDirectory`].

pub mod board;
pub mod cache;
pub mod detail;
pub mod error;
pub mod gateway;
pub mod model;
pub mod ops;
pub mod projects;

pub use board::TaskBoard;
pub use detail::TaskDetail;
pub use error::ClientError;
pub use projects::ProjectDirectory;

/// Outcome of the user-facing prompt that gates destructive operations.
///
/// The prompt itself belongs to the UI layer; sessions only see the result.
/// A `Cancelled` gate turns the operation into a no-op: no cache mutation,
/// no network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}
