//! Typed GitLab resource models.
//!
//! One file per resource kind, mirroring the REST API shapes. Everything
//! derives Serialize so panels can project rows out of any model, and
//! Deserialize so the client can decode responses straight into them.

pub mod branch;
pub mod commit;
pub mod discussion;
pub mod issue;
pub mod label;
pub mod member;
pub mod merge_request;
pub mod pipeline;
pub mod project;
pub mod resource;
pub mod user;
pub mod wiki;

// Re-exports for convenient access
pub use branch::{Branch, BranchCommit};
pub use commit::Commit;
pub use discussion::{Discussion, Note, NotePosition};
pub use issue::{Issue, IssueState};
pub use label::Label;
pub use member::Member;
pub use merge_request::{Approvals, DiffVersion, FileDiff, MergeRequest, MergeRequestState};
pub use pipeline::{Job, Pipeline};
pub use project::Project;
pub use resource::{Resource, ResourceKind};
pub use user::User;
pub use wiki::Wiki;
