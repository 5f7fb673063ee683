//! Panels: node production for every buffer kind.
//!
//! A panel is a pure function from (client, project, params) to a node
//! sequence. Re-rendering a buffer means running its panel's loader again
//! with the params stored in the registry record and re-registering.

pub mod kind;
pub mod node;
pub mod registry;
pub mod table;

pub use kind::PanelKind;
pub use node::{text_nodes, LinePos, Node, NodeParams};
pub use registry::{BufferRecord, BufferRegistry, PanelParams};

use crate::error::AppError;
use crate::models::{FileDiff, Project, Resource};
use crate::services::gitlab_client::{GitLabClient, ListQuery};
use crate::services::graphql;

/// Produce the node sequence for a panel.
///
/// Every fetch happens here; callers re-invoke this to refresh or paginate.
pub async fn load(
    client: &GitLabClient,
    project: &Project,
    kind: PanelKind,
    params: &PanelParams,
) -> Result<Vec<Node>, AppError> {
    let columns = kind.columns().unwrap_or(&[]);
    match kind {
        PanelKind::Main => {
            let user = client.current_user().await?;
            Ok(main_nodes(project, &user))
        }

        PanelKind::IssueList => {
            let query = ListQuery {
                state: params.state.clone(),
                ..ListQuery::page(params.page(), params.per_page())
            };
            let page = client.list_issues(project.id, &query).await?;
            let resources: Vec<Resource> = page.data.into_iter().map(Resource::Issue).collect();
            table::render(&resources, columns)
        }

        PanelKind::IssuePreview => {
            let iid = require_iid(params)?;
            let issue = client.get_issue(project.id, iid).await?;
            let mut nodes = vec![
                Node::with_params(
                    issue.reference(),
                    NodeParams::with_resource(Resource::Issue(issue.clone())),
                ),
                Node::text(format!("state: {}  author: @{}", issue.state, issue.author.username)),
                Node::text(String::new()),
            ];
            nodes.extend(text_nodes(issue.description.as_deref()));
            Ok(nodes)
        }

        PanelKind::IssueEdit => {
            let iid = require_iid(params)?;
            let issue = client.get_issue(project.id, iid).await?;
            Ok(text_nodes(issue.description.as_deref()))
        }

        PanelKind::BranchList => {
            let query = ListQuery::page(params.page(), params.per_page());
            let page = client.list_branches(project.id, &query).await?;
            let resources: Vec<Resource> = page.data.into_iter().map(Resource::Branch).collect();
            table::render(&resources, columns)
        }

        PanelKind::MergeRequestList => {
            // The GraphQL connection pages by cursor; emulate numbered pages
            // by over-fetching up to the requested page and slicing. The
            // server caps any connection at 100 entries, so pages past that
            // window are unreachable.
            let per_page = params.per_page();
            let first = params.page() * per_page;
            if first > 100 {
                return Err(AppError::invalid_input(
                    "merge request list cannot page past the first 100 entries",
                ));
            }
            let mrs = graphql::list_merge_requests(
                client,
                &project.path_with_namespace,
                params.state.as_deref(),
                first,
            )
            .await?;
            let offset = ((params.page() - 1) * per_page) as usize;
            let resources: Vec<Resource> = mrs
                .into_iter()
                .skip(offset)
                .take(per_page as usize)
                .map(Resource::MergeRequest)
                .collect();
            table::render(&resources, columns)
        }

        PanelKind::MergeRequestPreview => {
            let iid = require_iid(params)?;
            let mr = client.get_merge_request(project.id, iid).await?;
            let approvals = client.get_approvals(project.id, iid).await?;
            let approvers: Vec<String> = approvals
                .approved_by
                .iter()
                .map(|a| a.user.name.clone())
                .collect();
            let mut nodes = vec![
                Node::with_params(
                    mr.reference(),
                    NodeParams::with_resource(Resource::MergeRequest(mr.clone())),
                ),
                Node::text(format!(
                    "{} -> {}  ({})",
                    mr.source_branch, mr.target_branch, mr.state
                )),
                Node::text(format!(
                    "approvals: {} required, approved by [{}]",
                    approvals.approvals_required.unwrap_or(0),
                    approvers.join(", ")
                )),
                Node::text(String::new()),
            ];
            nodes.extend(text_nodes(mr.description.as_deref()));
            Ok(nodes)
        }

        PanelKind::ChangeList => {
            let iid = require_iid(params)?;
            let version = client.get_merge_request_changes(project.id, iid).await?;
            Ok(version
                .diffs
                .iter()
                .map(|file| {
                    let mut node_params = NodeParams::default();
                    node_params.file_path = Some(file.new_path.clone());
                    Node::with_params(
                        format!("{} {}", file.marker(), file.display_path()),
                        node_params,
                    )
                })
                .collect())
        }

        PanelKind::ChangeDiff => {
            let iid = require_iid(params)?;
            let path = params
                .file_path
                .as_deref()
                .ok_or_else(|| AppError::invalid_input("change-diff panel requires a file path"))?;
            let version = client.get_merge_request_changes(project.id, iid).await?;
            let file = version
                .diffs
                .iter()
                .find(|f| f.new_path == path)
                .ok_or_else(|| AppError::not_in_context("change"))?;
            Ok(diff_nodes(file))
        }

        PanelKind::WikiList => {
            let wikis = client.list_wikis(project.id).await?;
            let resources: Vec<Resource> = wikis.into_iter().map(Resource::Wiki).collect();
            table::render(&resources, columns)
        }

        PanelKind::WikiPreview => {
            let slug = require_slug(params)?;
            let wiki = client.get_wiki(project.id, slug).await?;
            let mut nodes = vec![
                Node::with_params(
                    wiki.title.clone(),
                    NodeParams::with_resource(Resource::Wiki(wiki.clone())),
                ),
                Node::text(String::new()),
            ];
            nodes.extend(text_nodes(wiki.content.as_deref()));
            Ok(nodes)
        }

        PanelKind::WikiEdit => {
            let slug = require_slug(params)?;
            let wiki = client.get_wiki(project.id, slug).await?;
            Ok(text_nodes(wiki.content.as_deref()))
        }

        PanelKind::PipelineList => {
            let query = ListQuery::page(params.page(), params.per_page());
            let page = client.list_pipelines(project.id, &query).await?;
            let resources: Vec<Resource> = page.data.into_iter().map(Resource::Pipeline).collect();
            table::render(&resources, columns)
        }

        PanelKind::JobList => {
            let pipeline_id = params
                .pipeline_id
                .ok_or_else(|| AppError::invalid_input("job-list panel requires a pipeline id"))?;
            let jobs = client.list_pipeline_jobs(project.id, pipeline_id).await?;
            let resources: Vec<Resource> = jobs.into_iter().map(Resource::Job).collect();
            table::render(&resources, columns)
        }

        PanelKind::JobTrace => {
            let job_id = params
                .job_id
                .ok_or_else(|| AppError::invalid_input("job-trace panel requires a job id"))?;
            let trace = client.get_job_trace(project.id, job_id).await?;
            Ok(text_nodes(Some(&trace)))
        }

        PanelKind::LabelList => {
            let labels = client.list_labels(project.id).await?;
            let resources: Vec<Resource> = labels.into_iter().map(Resource::Label).collect();
            table::render(&resources, columns)
        }

        PanelKind::MemberList => {
            let members = client.list_members(project.id).await?;
            let resources: Vec<Resource> = members.into_iter().map(Resource::Member).collect();
            table::render(&resources, columns)
        }

        PanelKind::CommitList => {
            let query = ListQuery::page(params.page(), params.per_page());
            let page = client.list_commits(project.id, &query).await?;
            let resources: Vec<Resource> = page.data.into_iter().map(Resource::Commit).collect();
            table::render(&resources, columns)
        }

        PanelKind::DiscussionList => {
            let iid = require_iid(params)?;
            let discussions = client.list_discussions(project.id, iid).await?;
            Ok(discussion_nodes(&discussions))
        }
    }
}

fn require_iid(params: &PanelParams) -> Result<i64, AppError> {
    params
        .iid
        .ok_or_else(|| AppError::invalid_input("panel requires an iid"))
}

fn require_slug(params: &PanelParams) -> Result<&str, AppError> {
    params
        .slug
        .as_deref()
        .ok_or_else(|| AppError::invalid_input("wiki panel requires a slug"))
}

fn main_nodes(project: &Project, user: &crate::models::User) -> Vec<Node> {
    let mut nodes = vec![
        Node::with_params(
            project.name_with_namespace.clone(),
            NodeParams::with_resource(Resource::Project(project.clone())),
        ),
        Node::text(project.web_url.clone()),
        Node::text(format!("signed in as @{}", user.username)),
    ];
    if let Some(branch) = &project.default_branch {
        nodes.push(Node::text(format!("default branch: {}", branch)));
    }
    if let Some(description) = &project.description {
        nodes.push(Node::text(String::new()));
        nodes.extend(text_nodes(Some(description)));
    }
    nodes
}

/// One node per note across all discussion threads; replies are indented.
fn discussion_nodes(discussions: &[crate::models::Discussion]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for discussion in discussions {
        for (i, note) in discussion.notes.iter().enumerate() {
            if note.system {
                continue;
            }
            let first_line = note.body.split('\n').next().unwrap_or("");
            let marker = match note.resolved {
                Some(true) => " [resolved]",
                _ => "",
            };
            let indent = if i == 0 { "" } else { "  " };
            let mut params = NodeParams::with_resource(Resource::Discussion(discussion.clone()));
            params.discussion_id = Some(discussion.id.clone());
            nodes.push(Node::with_params(
                format!("{}@{}: {}{}", indent, note.author.username, first_line, marker),
                params,
            ));
        }
    }
    nodes
}

/// Render a unified diff as nodes that remember their old/new line numbers,
/// so an inline-comment action at the cursor can build a position payload.
pub fn diff_nodes(file: &FileDiff) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut old_line = 0i64;
    let mut new_line = 0i64;
    let mut in_hunk = false;

    for line in file.diff.split('\n') {
        let mut params = NodeParams::default();
        params.file_path = Some(file.new_path.clone());

        if let Some((old_start, new_start)) = parse_hunk_header(line) {
            old_line = old_start;
            new_line = new_start;
            in_hunk = true;
        } else if in_hunk {
            let pos = if line.starts_with('+') {
                let pos = LinePos {
                    old_line: None,
                    new_line: Some(new_line),
                };
                new_line += 1;
                pos
            } else if line.starts_with('-') {
                let pos = LinePos {
                    old_line: Some(old_line),
                    new_line: None,
                };
                old_line += 1;
                pos
            } else {
                let pos = LinePos {
                    old_line: Some(old_line),
                    new_line: Some(new_line),
                };
                old_line += 1;
                new_line += 1;
                pos
            };
            params.line_pos = Some(pos);
        }

        nodes.push(Node::with_params(line.to_string(), params));
    }
    nodes
}

/// Parse `@@ -12,5 +13,6 @@ ...` into the two start lines.
fn parse_hunk_header(line: &str) -> Option<(i64, i64)> {
    if !line.starts_with("@@") {
        return None;
    }
    let mut parts = line.split_whitespace();
    parts.next(); // "@@"
    let old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;
    let old_start = old.split(',').next()?.parse().ok()?;
    let new_start = new.split(',').next()?.parse().ok()?;
    Some((old_start, new_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(diff: &str) -> FileDiff {
        FileDiff {
            old_path: "src/lib.rs".into(),
            new_path: "src/lib.rs".into(),
            new_file: false,
            renamed_file: false,
            deleted_file: false,
            diff: diff.to_string(),
        }
    }

    #[test]
    fn test_parse_hunk_header() {
        assert_eq!(parse_hunk_header("@@ -12,5 +13,6 @@ fn main()"), Some((12, 13)));
        assert_eq!(parse_hunk_header("@@ -1 +1 @@"), Some((1, 1)));
        assert_eq!(parse_hunk_header("+added line"), None);
    }

    #[test]
    fn test_diff_nodes_track_line_numbers() {
        let diff = "@@ -1,3 +1,3 @@\n context\n-removed\n+added\n trailing";
        let nodes = diff_nodes(&file(diff));
        assert_eq!(nodes.len(), 5);

        // header has no position
        assert!(nodes[0].params.line_pos.is_none());

        let ctx = nodes[1].params.line_pos.as_ref().unwrap();
        assert_eq!((ctx.old_line, ctx.new_line), (Some(1), Some(1)));

        let removed = nodes[2].params.line_pos.as_ref().unwrap();
        assert_eq!((removed.old_line, removed.new_line), (Some(2), None));

        let added = nodes[3].params.line_pos.as_ref().unwrap();
        assert_eq!((added.old_line, added.new_line), (None, Some(2)));

        let trailing = nodes[4].params.line_pos.as_ref().unwrap();
        assert_eq!((trailing.old_line, trailing.new_line), (Some(3), Some(3)));
    }

    #[test]
    fn test_discussion_nodes_skip_system_and_indent_replies() {
        use crate::models::{Discussion, Note, User};
        let user = |name: &str| User {
            id: 1,
            username: name.to_string(),
            name: name.to_string(),
            avatar_url: None,
            web_url: None,
        };
        let note = |body: &str, system: bool| Note {
            id: 1,
            body: body.to_string(),
            author: user("ann"),
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
            system,
            resolvable: true,
            resolved: None,
            position: None,
        };
        let discussions = vec![Discussion {
            id: "abc".into(),
            individual_note: false,
            notes: vec![
                note("first comment\nwith detail", false),
                note("a reply", false),
                note("changed the description", true),
            ],
        }];

        let nodes = discussion_nodes(&discussions);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].display, "@ann: first comment");
        assert_eq!(nodes[1].display, "  @ann: a reply");
        assert_eq!(nodes[0].params.discussion_id.as_deref(), Some("abc"));
    }
}
