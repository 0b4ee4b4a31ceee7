use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::TaskId;

/// Identity of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(pub String);

impl HistoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HistoryId {
    fn from(s: &str) -> Self {
        HistoryId(s.to_string())
    }
}

/// Immutable audit record of a past action on a task.
///
/// Entries are appended by the store as a side effect of task and subtask
/// mutations; the client never constructs one, it only reads and deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: HistoryId,
    pub task: TaskId,
    /// Short label, e.g. `"Status changed"`.
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
