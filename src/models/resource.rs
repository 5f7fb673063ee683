//! The tagged resource type shared by panels and actions.
//!
//! A node in a list panel carries one of these in its params so an action
//! invoked at the cursor can recover the originating resource without
//! re-probing field names.

use crate::models::{
    Branch, Commit, Discussion, Issue, Job, Label, Member, MergeRequest, Pipeline, Project, Wiki,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Enumerated resource kinds, used as the tag in node params and as the
/// "most recently touched" marker on an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Issue,
    Branch,
    MergeRequest,
    Wiki,
    Pipeline,
    Job,
    Discussion,
    Label,
    Member,
    Commit,
    Project,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Branch => "branch",
            Self::MergeRequest => "merge request",
            Self::Wiki => "wiki",
            Self::Pipeline => "pipeline",
            Self::Job => "job",
            Self::Discussion => "discussion",
            Self::Label => "label",
            Self::Member => "member",
            Self::Commit => "commit",
            Self::Project => "project",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote entity attached to a node, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Resource {
    Issue(Issue),
    Branch(Branch),
    MergeRequest(MergeRequest),
    Wiki(Wiki),
    Pipeline(Pipeline),
    Job(Job),
    Discussion(Discussion),
    Label(Label),
    Member(Member),
    Commit(Commit),
    Project(Project),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Issue(_) => ResourceKind::Issue,
            Self::Branch(_) => ResourceKind::Branch,
            Self::MergeRequest(_) => ResourceKind::MergeRequest,
            Self::Wiki(_) => ResourceKind::Wiki,
            Self::Pipeline(_) => ResourceKind::Pipeline,
            Self::Job(_) => ResourceKind::Job,
            Self::Discussion(_) => ResourceKind::Discussion,
            Self::Label(_) => ResourceKind::Label,
            Self::Member(_) => ResourceKind::Member,
            Self::Commit(_) => ResourceKind::Commit,
            Self::Project(_) => ResourceKind::Project,
        }
    }

    /// The inner data serialized to JSON, for column projection.
    pub fn to_value(&self) -> Value {
        let v = match self {
            Self::Issue(r) => serde_json::to_value(r),
            Self::Branch(r) => serde_json::to_value(r),
            Self::MergeRequest(r) => serde_json::to_value(r),
            Self::Wiki(r) => serde_json::to_value(r),
            Self::Pipeline(r) => serde_json::to_value(r),
            Self::Job(r) => serde_json::to_value(r),
            Self::Discussion(r) => serde_json::to_value(r),
            Self::Label(r) => serde_json::to_value(r),
            Self::Member(r) => serde_json::to_value(r),
            Self::Commit(r) => serde_json::to_value(r),
            Self::Project(r) => serde_json::to_value(r),
        };
        // Serializing plain data structs cannot fail
        v.unwrap_or(Value::Null)
    }

    /// Browsable URL of the resource, when the API provides one.
    pub fn web_url(&self) -> Option<&str> {
        match self {
            Self::Issue(r) => Some(&r.web_url),
            Self::Branch(r) => r.web_url.as_deref(),
            Self::MergeRequest(r) => Some(&r.web_url),
            Self::Wiki(_) => None,
            Self::Pipeline(r) => Some(&r.web_url),
            Self::Job(r) => Some(&r.web_url),
            Self::Discussion(_) => None,
            Self::Label(_) => None,
            Self::Member(_) => None,
            Self::Commit(r) => r.web_url.as_deref(),
            Self::Project(r) => Some(&r.web_url),
        }
    }

    pub fn as_issue(&self) -> Option<&Issue> {
        match self {
            Self::Issue(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_merge_request(&self) -> Option<&MergeRequest> {
        match self {
            Self::MergeRequest(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_wiki(&self) -> Option<&Wiki> {
        match self {
            Self::Wiki(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_pipeline(&self) -> Option<&Pipeline> {
        match self {
            Self::Pipeline(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_job(&self) -> Option<&Job> {
        match self {
            Self::Job(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_discussion(&self) -> Option<&Discussion> {
        match self {
            Self::Discussion(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn sample_issue() -> Issue {
        Issue {
            id: 100,
            iid: 3,
            project_id: 1,
            title: "Fix bug".into(),
            description: None,
            state: "opened".into(),
            labels: vec!["bug".into()],
            assignees: vec![User {
                id: 7,
                username: "ann".into(),
                name: "Ann".into(),
                avatar_url: None,
                web_url: None,
            }],
            author: User {
                id: 8,
                username: "bob".into(),
                name: "Bob".into(),
                avatar_url: None,
                web_url: None,
            },
            web_url: "https://gitlab.com/g/p/-/issues/3".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-02T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_kind_tag() {
        let res = Resource::Issue(sample_issue());
        assert_eq!(res.kind(), ResourceKind::Issue);
        assert_eq!(res.kind().to_string(), "issue");
    }

    #[test]
    fn test_to_value_projects_fields() {
        let res = Resource::Issue(sample_issue());
        let v = res.to_value();
        assert_eq!(v["iid"], 3);
        assert_eq!(v["assignees"][0]["name"], "Ann");
    }

    #[test]
    fn test_tagged_serialization() {
        let res = Resource::Issue(sample_issue());
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"kind\":\"issue\""));
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert!(back.as_issue().is_some());
    }
}
