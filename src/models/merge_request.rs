//! Merge request model.

use crate::models::User;
use serde::{Deserialize, Serialize};

/// State of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    Opened,
    Merged,
    Closed,
}

impl From<&str> for MergeRequestState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "merged" => Self::Merged,
            "closed" => Self::Closed,
            _ => Self::Opened,
        }
    }
}

impl std::fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Merged => write!(f, "merged"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A GitLab merge request.
///
/// Decoded from REST responses directly; GraphQL listing responses go through
/// the translation table in `services::graphql` first, which produces exactly
/// this field layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Global MR ID.
    pub id: i64,

    /// Project-scoped MR number (what `!42` refers to).
    pub iid: i64,

    #[serde(default)]
    pub project_id: i64,

    pub title: String,

    pub description: Option<String>,

    pub state: String,

    pub source_branch: String,

    pub target_branch: String,

    pub labels: Vec<String>,

    pub author: User,

    #[serde(default)]
    pub assignees: Vec<User>,

    #[serde(default)]
    pub reviewers: Vec<User>,

    /// Users who have approved, flattened from the approvals association.
    #[serde(default)]
    pub approved_by: Vec<User>,

    pub web_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_status: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl MergeRequest {
    /// Reference form used in messages and picker rows (`!12 Add the thing`).
    pub fn reference(&self) -> String {
        format!("!{} {}", self.iid, self.title)
    }
}

/// One file's diff inside an MR changes response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub new_file: bool,
    pub renamed_file: bool,
    pub deleted_file: bool,
    pub diff: String,
}

impl FileDiff {
    /// Single-letter change marker for change-list rows.
    pub fn marker(&self) -> char {
        if self.new_file {
            'A'
        } else if self.deleted_file {
            'D'
        } else if self.renamed_file {
            'R'
        } else {
            'M'
        }
    }

    /// Display path; renames show both sides.
    pub fn display_path(&self) -> String {
        if self.renamed_file {
            format!("{} -> {}", self.old_path, self.new_path)
        } else {
            self.new_path.clone()
        }
    }
}

/// A diff version of a merge request (`GET .../versions/:id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffVersion {
    pub id: i64,
    pub head_commit_sha: String,
    pub base_commit_sha: String,
    pub start_commit_sha: String,
    pub diffs: Vec<FileDiff>,
}

/// Approval summary for an MR (`GET .../approvals`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approvals {
    pub approved: bool,
    pub approvals_required: Option<i64>,
    pub approvals_left: Option<i64>,
    #[serde(default)]
    pub approved_by: Vec<ApprovedBy>,
}

/// User wrapper inside an approvals response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedBy {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_api_string() {
        assert_eq!(MergeRequestState::from("opened"), MergeRequestState::Opened);
        assert_eq!(MergeRequestState::from("merged"), MergeRequestState::Merged);
        assert_eq!(MergeRequestState::from("closed"), MergeRequestState::Closed);
        assert_eq!(MergeRequestState::from("MERGED"), MergeRequestState::Merged);
        assert_eq!(MergeRequestState::from("locked"), MergeRequestState::Opened);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(MergeRequestState::Merged.to_string(), "merged");
        assert_eq!(MergeRequestState::Closed.to_string(), "closed");
    }
}
