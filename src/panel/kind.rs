//! Panel kinds and their column layouts.

use crate::models::ResourceKind;
use serde::{Deserialize, Serialize};

/// Which view a buffer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Project overview.
    Main,
    IssueList,
    IssuePreview,
    IssueEdit,
    BranchList,
    MergeRequestList,
    MergeRequestPreview,
    /// Changed files of a merge request.
    ChangeList,
    /// Unified diff of one changed file.
    ChangeDiff,
    WikiList,
    WikiPreview,
    WikiEdit,
    PipelineList,
    JobList,
    JobTrace,
    LabelList,
    MemberList,
    CommitList,
    DiscussionList,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::IssueList => "issue-list",
            Self::IssuePreview => "issue-preview",
            Self::IssueEdit => "issue-edit",
            Self::BranchList => "branch-list",
            Self::MergeRequestList => "mr-list",
            Self::MergeRequestPreview => "mr-preview",
            Self::ChangeList => "mr-change-list",
            Self::ChangeDiff => "mr-change-diff",
            Self::WikiList => "wiki-list",
            Self::WikiPreview => "wiki-preview",
            Self::WikiEdit => "wiki-edit",
            Self::PipelineList => "pipeline-list",
            Self::JobList => "job-list",
            Self::JobTrace => "job-trace",
            Self::LabelList => "label-list",
            Self::MemberList => "member-list",
            Self::CommitList => "commit-list",
            Self::DiscussionList => "discussion-list",
        }
    }

    /// Column layout for tabular panels.
    pub fn columns(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::IssueList => Some(&["iid", "title", "labels", "state", "assignees"]),
            Self::BranchList => Some(&["name", "protected", "merged", "default"]),
            Self::MergeRequestList => Some(&[
                "iid",
                "title",
                "labels",
                "state",
                "assignees",
                "reviewers",
            ]),
            Self::WikiList => Some(&["slug", "title", "format"]),
            Self::PipelineList => Some(&["id", "status", "ref", "created_at"]),
            Self::JobList => Some(&["id", "name", "stage", "status", "duration"]),
            Self::LabelList => Some(&["name", "color", "description"]),
            Self::MemberList => Some(&["username", "name", "access_level", "state"]),
            Self::CommitList => Some(&["short_id", "title", "author_name", "created_at"]),
            _ => None,
        }
    }

    /// Whether the panel is a paginated list (subject to `page/next` and
    /// `page/prev`).
    pub fn paginated(&self) -> bool {
        matches!(
            self,
            Self::IssueList
                | Self::BranchList
                | Self::MergeRequestList
                | Self::PipelineList
                | Self::CommitList
        )
    }

    /// Resource kind this panel addresses, used for "recently touched"
    /// tracking.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::IssueList | Self::IssuePreview | Self::IssueEdit => Some(ResourceKind::Issue),
            Self::BranchList => Some(ResourceKind::Branch),
            Self::MergeRequestList
            | Self::MergeRequestPreview
            | Self::ChangeList
            | Self::ChangeDiff => Some(ResourceKind::MergeRequest),
            Self::WikiList | Self::WikiPreview | Self::WikiEdit => Some(ResourceKind::Wiki),
            Self::PipelineList => Some(ResourceKind::Pipeline),
            Self::JobList | Self::JobTrace => Some(ResourceKind::Job),
            Self::LabelList => Some(ResourceKind::Label),
            Self::MemberList => Some(ResourceKind::Member),
            Self::CommitList => Some(ResourceKind::Commit),
            Self::DiscussionList => Some(ResourceKind::Discussion),
            Self::Main => None,
        }
    }

    /// The standalone list panel for a resource kind, where one exists.
    /// Jobs and discussions need a parent and have no standalone list.
    pub fn list_for(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Issue => Some(Self::IssueList),
            ResourceKind::Branch => Some(Self::BranchList),
            ResourceKind::MergeRequest => Some(Self::MergeRequestList),
            ResourceKind::Wiki => Some(Self::WikiList),
            ResourceKind::Pipeline => Some(Self::PipelineList),
            ResourceKind::Label => Some(Self::LabelList),
            ResourceKind::Member => Some(Self::MemberList),
            ResourceKind::Commit => Some(Self::CommitList),
            ResourceKind::Job | ResourceKind::Discussion | ResourceKind::Project => None,
        }
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
