use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Priority, Status};

/// Identity of a subtask within its parent task's document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(pub String);

impl SubtaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubtaskId {
    fn from(s: &str) -> Self {
        SubtaskId(s.to_string())
    }
}

/// A child work item owned by exactly one task.
///
/// Two historical document shapes exist in the store: the current tri-state
/// `status` shape and a legacy boolean `isCompleted` shape. Deserialization
/// accepts both and converges on the tri-state model (`true` maps to Done,
/// `false` to Todo); serialization always emits the tri-state shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SubtaskWire")]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: SubtaskId,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subtask {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// Raw document shape: `status` (current) or `isCompleted` (legacy), never
/// both required.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubtaskWire {
    #[serde(rename = "_id")]
    id: SubtaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: Option<Status>,
    #[serde(default)]
    is_completed: Option<bool>,
    #[serde(default = "default_priority")]
    priority: Priority,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

impl From<SubtaskWire> for Subtask {
    fn from(wire: SubtaskWire) -> Self {
        let status = match (wire.status, wire.is_completed) {
            (Some(status), _) => status,
            (None, Some(true)) => Status::Done,
            (None, _) => Status::Todo,
        };
        Subtask {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            status,
            priority: wire.priority,
            due_date: wire.due_date,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tri_state_document_deserializes_as_is() {
        let doc = r#"{
            "_id": "s1",
            "title": "Draft outline",
            "description": "",
            "status": "In Progress",
            "priority": "High",
            "createdAt": "2026-08-10T08:00:00Z",
            "updatedAt": "2026-08-10T08:00:00Z"
        }"#;
        let sub: Subtask = serde_json::from_str(doc).unwrap();
        assert_eq!(sub.status, Status::InProgress);
        assert_eq!(sub.priority, Priority::High);
    }

    #[test]
    fn legacy_completed_document_migrates_to_done() {
        let doc = r#"{
            "_id": "s2",
            "title": "Ship it",
            "isCompleted": true,
            "priority": "Low",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        }"#;
        let sub: Subtask = serde_json::from_str(doc).unwrap();
        assert_eq!(sub.status, Status::Done);
        assert!(sub.is_done());
    }

    #[test]
    fn legacy_uncompleted_document_migrates_to_todo() {
        let doc = r#"{
            "_id": "s3",
            "title": "Not yet",
            "isCompleted": false,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        let sub: Subtask = serde_json::from_str(doc).unwrap();
        assert_eq!(sub.status, Status::Todo);
        // The legacy shape had no priority selector either; Medium is the
        // store's creation default.
        assert_eq!(sub.priority, Priority::Medium);
    }

    #[test]
    fn status_wins_when_both_shapes_are_present() {
        let doc = r#"{
            "_id": "s4",
            "title": "Mixed",
            "status": "Todo",
            "isCompleted": true,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        let sub: Subtask = serde_json::from_str(doc).unwrap();
        assert_eq!(sub.status, Status::Todo);
    }

    #[test]
    fn serialization_emits_only_the_tri_state_shape() {
        let doc = r#"{
            "_id": "s5",
            "title": "Legacy",
            "isCompleted": true,
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        let sub: Subtask = serde_json::from_str(doc).unwrap();
        let out = serde_json::to_string(&sub).unwrap();
        assert!(out.contains("\"status\":\"Done\""));
        assert!(!out.contains("isCompleted"));
    }
}
