//! GitLab project model.

use serde::{Deserialize, Serialize};

/// A GitLab project as returned by `GET /projects/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Global project ID, used in every other endpoint path.
    pub id: i64,

    pub name: String,

    /// Human-readable name including the group (e.g. `Group / Project`).
    pub name_with_namespace: String,

    /// URL path including the group (e.g. `group/project`).
    pub path_with_namespace: String,

    pub web_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<String>,
}
