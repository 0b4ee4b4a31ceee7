use serde::{Deserialize, Serialize};

/// Opaque project identity assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// A named, colored grouping referenced weakly by tasks.
///
/// Deleting a project unassigns the tasks that point at it; it never deletes
/// them. That rule is enforced by the store (spelled out in the gateway
/// contract), not by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Swatch token, e.g. `"#6366f1"`.
    pub color: String,
}
