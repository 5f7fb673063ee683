//! Pipeline and job models.

use serde::{Deserialize, Serialize};

/// A CI pipeline (`GET /projects/:id/pipelines`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: i64,
    pub project_id: i64,
    pub status: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub web_url: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// A CI job (`GET /projects/:id/pipelines/:pipeline_id/jobs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub stage: String,
    pub status: String,
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub created_at: String,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    /// Wall-clock duration in seconds, present once the job ran.
    pub duration: Option<f64>,
    pub web_url: String,
    pub allow_failure: bool,
}
