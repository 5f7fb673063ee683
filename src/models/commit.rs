//! Repository commit model.

use serde::{Deserialize, Serialize};

/// A commit (`GET /projects/:id/repository/commits`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub author_name: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}
