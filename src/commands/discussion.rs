//! Discussion actions on merge requests.

use super::{
    choose, cursor_resource, instance_parts, merge_request, open_panel, prompt_required, rerender,
    ActionRequest,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{MergeRequest, Resource};
use crate::panel::{PanelKind, PanelParams};
use crate::services::gitlab_client::DiscussionPosition;
use crate::state::AppState;

/// The MR a discussion action targets: explicit iid, the surrounding MR
/// satellite buffer, the cursor node, the instance's active MR, then a picker.
async fn active_iid(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<i64, AppError> {
    if let Some(iid) = request.params.iid {
        return Ok(iid);
    }

    state.instances.ensure(&request.cwd).await?;
    if let Some(bufnr) = request.bufnr {
        if let Ok(record) = state.buffers.record(bufnr) {
            if let Some(iid) = record.params.iid {
                return Ok(iid);
            }
        }
    }
    if let Some(mr) = cursor_resource(state, request)
        .as_ref()
        .and_then(Resource::as_merge_request)
    {
        return Ok(mr.iid);
    }
    if let Some(iid) = state.instances.get(&request.cwd)?.active_mr {
        return Ok(iid);
    }

    let resolution = merge_request::resolve(state, request).await?;
    let mr = choose(editor, "merge request", resolution, MergeRequest::reference)?;
    Ok(mr.iid)
}

pub async fn list(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let iid = active_iid(state, editor, request).await?;
    state.instances.update_active_mr(&request.cwd, iid)?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::DiscussionList,
        PanelParams::for_iid(iid),
    )
    .await?;
    Ok(())
}

/// Start a discussion. On a diff line this opens an inline thread anchored to
/// that line's position; anywhere else it posts a plain comment.
pub async fn new(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let iid = active_iid(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let anchor = diff_anchor(state, request);
    let body = prompt_required(editor, "Comment: ")?;

    match anchor {
        Some((file_path, line_pos)) => {
            let version = client.get_merge_request_changes(project.id, iid).await?;
            let old_path = version
                .diffs
                .iter()
                .find(|f| f.new_path == file_path)
                .map(|f| f.old_path.clone())
                .unwrap_or_else(|| file_path.clone());
            let position = DiscussionPosition {
                base_sha: version.base_commit_sha,
                head_sha: version.head_commit_sha,
                start_sha: version.start_commit_sha,
                position_type: "text".into(),
                old_path,
                new_path: file_path,
                old_line: line_pos.old_line,
                new_line: line_pos.new_line,
            };
            client
                .add_inline_comment(project.id, iid, &body, &position)
                .await?;
        }
        None => {
            client.add_comment(project.id, iid, &body).await?;
        }
    }
    editor.show_message(&format!("Comment added to !{}", iid));
    Ok(())
}

pub async fn reply(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let (bufnr, discussion_id, iid) = cursor_discussion(state, request)?;
    let body = prompt_required(editor, "Reply: ")?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client
        .reply_to_discussion(project.id, iid, &discussion_id, &body)
        .await?;
    editor.show_message("Reply added");
    rerender(state, editor, &request.cwd, bufnr).await
}

pub async fn resolve(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let (bufnr, discussion_id, iid) = cursor_discussion(state, request)?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client
        .resolve_discussion(project.id, iid, &discussion_id, true)
        .await?;
    editor.show_message("Discussion resolved");
    rerender(state, editor, &request.cwd, bufnr).await
}

/// The diff line the cursor sits on, when the action runs in a change-diff
/// buffer and the line belongs to a hunk.
fn diff_anchor(state: &AppState, request: &ActionRequest) -> Option<(String, crate::panel::LinePos)> {
    let (bufnr, line) = (request.bufnr?, request.line?);
    let record = state.buffers.record(bufnr).ok()?;
    if record.kind != PanelKind::ChangeDiff {
        return None;
    }
    let node = state.buffers.current_node(bufnr, line).ok()?;
    let file_path = node.params.file_path.clone()?;
    let line_pos = node.params.line_pos.clone()?;
    Some((file_path, line_pos))
}

/// The discussion thread the cursor addresses in a discussion list.
fn cursor_discussion(
    state: &AppState,
    request: &ActionRequest,
) -> Result<(crate::editor::BufferId, String, i64), AppError> {
    let bufnr = request
        .bufnr
        .ok_or_else(|| AppError::not_in_context("discussion"))?;
    let line = request
        .line
        .ok_or_else(|| AppError::not_in_context("discussion"))?;

    let record = state.buffers.record(bufnr)?;
    let iid = record
        .params
        .iid
        .ok_or_else(|| AppError::not_in_context("discussion"))?;
    let node = state.buffers.current_node(bufnr, line)?;
    let discussion_id = node
        .params
        .discussion_id
        .clone()
        .or_else(|| {
            node.params
                .resource
                .as_ref()
                .and_then(Resource::as_discussion)
                .map(|d| d.id.clone())
        })
        .ok_or_else(|| AppError::not_in_context("discussion"))?;
    Ok((bufnr, discussion_id, iid))
}
