//! Repository branch model.

use serde::{Deserialize, Serialize};

/// A repository branch as returned by `GET /projects/:id/repository/branches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub merged: bool,
    pub protected: bool,
    pub default: bool,
    pub commit: BranchCommit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

/// Tip commit embedded in a branch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCommit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: String,
}
