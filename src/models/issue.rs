//! GitLab issue model.

use crate::models::User;
use serde::{Deserialize, Serialize};

/// State of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Opened,
    Closed,
}

impl From<&str> for IssueState {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "closed" => Self::Closed,
            _ => Self::Opened,
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A GitLab issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Global issue ID.
    pub id: i64,

    /// Project-scoped issue number (what `#42` refers to).
    pub iid: i64,

    pub project_id: i64,

    pub title: String,

    /// Issue body (Markdown). Absent on some list responses.
    pub description: Option<String>,

    pub state: String,

    pub labels: Vec<String>,

    pub assignees: Vec<User>,

    pub author: User,

    pub web_url: String,

    pub created_at: String,

    pub updated_at: String,
}

impl Issue {
    /// Reference form used in messages and picker rows (`#12 Fix the thing`).
    pub fn reference(&self) -> String {
        format!("#{} {}", self.iid, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_api_string() {
        assert_eq!(IssueState::from("opened"), IssueState::Opened);
        assert_eq!(IssueState::from("closed"), IssueState::Closed);
        assert_eq!(IssueState::from("Closed"), IssueState::Closed);
        // unrecognized states count as open
        assert_eq!(IssueState::from("locked"), IssueState::Opened);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(IssueState::Opened.to_string(), "opened");
        assert_eq!(IssueState::Closed.to_string(), "closed");
    }
}
