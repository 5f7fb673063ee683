//! Project label model.

use serde::{Deserialize, Serialize};

/// A project label (`GET /projects/:id/labels`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    #[serde(default)]
    pub open_issues_count: i64,
    #[serde(default)]
    pub open_merge_requests_count: i64,
}
