//! Merge request actions.

use super::{
    choose, confirm, cursor_resource, instance_parts, open_panel, prompt_required, rerender_kind,
    ActionRequest, Resolution,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{MergeRequest, MergeRequestState, Resource};
use crate::panel::{PanelKind, PanelParams};
use crate::services::gitlab_client::MergeRequestPayload;
use crate::services::graphql;
use crate::state::AppState;

/// Resolve the MR an action targets.
///
/// Explicit params win, then the cursor node, then the instance's active MR,
/// then a picker over open MRs.
pub(crate) async fn resolve(
    state: &mut AppState,
    request: &ActionRequest,
) -> Result<Resolution<MergeRequest>, AppError> {
    if let Some(mr) = request
        .params
        .resource
        .as_ref()
        .and_then(Resource::as_merge_request)
    {
        return Ok(Resolution::Resolved(mr.clone()));
    }

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    if let Some(iid) = request.params.iid {
        return Ok(Resolution::Resolved(
            client.get_merge_request(project.id, iid).await?,
        ));
    }
    if let Some(mr) = cursor_resource(state, request)
        .as_ref()
        .and_then(Resource::as_merge_request)
    {
        return Ok(Resolution::Resolved(mr.clone()));
    }
    if let Some(iid) = state.instances.get(&request.cwd)?.active_mr {
        return Ok(Resolution::Resolved(
            client.get_merge_request(project.id, iid).await?,
        ));
    }

    let mrs = graphql::list_merge_requests(
        &client,
        &project.path_with_namespace,
        Some("opened"),
        50,
    )
    .await?;
    Ok(Resolution::NeedsSelection(mrs))
}

async fn target(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<MergeRequest, AppError> {
    let resolution = resolve(state, request).await?;
    choose(editor, "merge request", resolution, MergeRequest::reference)
}

pub async fn list(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let params = PanelParams {
        state: Some("opened".into()),
        ..PanelParams::paged(1, 20)
    };
    open_panel(state, editor, &request.cwd, PanelKind::MergeRequestList, params).await?;
    Ok(())
}

pub async fn preview(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    state.instances.update_active_mr(&request.cwd, mr.iid)?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::MergeRequestPreview,
        PanelParams::for_iid(mr.iid),
    )
    .await?;
    Ok(())
}

/// Create an MR. The source branch comes from the cursor when the action runs
/// on a branch-list row, otherwise from a prompt; prompted names are checked
/// against the remote before the remaining prompts.
pub async fn new(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let source_branch = match cursor_resource(state, request).as_ref().and_then(Resource::as_branch) {
        Some(branch) => branch.name.clone(),
        None => {
            let name = prompt_required(editor, "Source branch: ")?;
            client.get_branch(project.id, &name).await?.name
        }
    };
    let default_target = project.default_branch.clone().unwrap_or_else(|| "main".into());
    let target_branch = editor
        .prompt(&format!("Target branch (default: {}): ", default_target))
        .filter(|t| !t.is_empty())
        .unwrap_or(default_target);
    let title = prompt_required(editor, "Title: ")?;

    let payload = MergeRequestPayload {
        title: Some(title),
        source_branch: Some(source_branch),
        target_branch: Some(target_branch),
        ..Default::default()
    };
    let mr = client.create_merge_request(project.id, &payload).await?;
    editor.show_message(&format!("Created merge request {}", mr.reference()));
    state.instances.update_active_mr(&request.cwd, mr.iid)?;
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn approve(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    confirm(editor, &format!("Approve {}? (y/N) ", mr.reference()))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.approve_merge_request(project.id, mr.iid).await?;
    editor.show_message(&format!("Approved !{}", mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn unapprove(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    client.unapprove_merge_request(project.id, mr.iid).await?;
    editor.show_message(&format!("Revoked approval on !{}", mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn merge(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    let mr_state = MergeRequestState::from(mr.state.as_str());
    if mr_state != MergeRequestState::Opened {
        return Err(AppError::invalid_input(format!(
            "{} is already {}",
            mr.reference(),
            mr_state
        )));
    }
    confirm(
        editor,
        &format!(
            "Merge {} into {}? (y/N) ",
            mr.reference(),
            mr.target_branch
        ),
    )?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.merge_merge_request(project.id, mr.iid).await?;
    editor.show_message(&format!("Merged !{}", mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn delete(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    confirm(editor, &format!("Delete {}? (y/N) ", mr.reference()))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.delete_merge_request(project.id, mr.iid).await?;
    editor.show_message(&format!("Deleted !{}", mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn assign(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let members = client.list_members(project.id).await?;
    let member = choose(
        editor,
        "member",
        Resolution::NeedsSelection(members),
        |m| format!("@{} ({})", m.username, m.name),
    )?;

    let payload = MergeRequestPayload {
        assignee_ids: Some(vec![member.id]),
        ..Default::default()
    };
    client.update_merge_request(project.id, mr.iid, &payload).await?;
    editor.show_message(&format!("Assigned @{} to !{}", member.username, mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

pub async fn label(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let labels = client.list_labels(project.id).await?;
    let label = choose(
        editor,
        "label",
        Resolution::NeedsSelection(labels),
        |l| l.name.clone(),
    )?;

    let payload = MergeRequestPayload {
        add_labels: Some(label.name.clone()),
        ..Default::default()
    };
    client.update_merge_request(project.id, mr.iid, &payload).await?;
    editor.show_message(&format!("Added ~{} to !{}", label.name, mr.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::MergeRequestList).await
}

/// Open the changed-files panel for an MR and make it the active MR.
pub async fn changes(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    state.instances.update_active_mr(&request.cwd, mr.iid)?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::ChangeList,
        PanelParams::for_iid(mr.iid),
    )
    .await?;
    Ok(())
}

/// Open the diff of the changed file under the cursor in a change list.
pub async fn diff(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let bufnr = request
        .bufnr
        .ok_or_else(|| AppError::invalid_input("mr/diff runs from a change list"))?;
    let line = request
        .line
        .ok_or_else(|| AppError::invalid_input("mr/diff runs from a change list"))?;

    let (iid, file_path) = {
        let record = state.buffers.record(bufnr)?;
        if record.kind != PanelKind::ChangeList {
            return Err(AppError::invalid_input("buffer is not a change list"));
        }
        let iid = record
            .params
            .iid
            .ok_or_else(|| AppError::internal("change list has no iid"))?;
        let node = state.buffers.current_node(bufnr, line)?;
        let file_path = node
            .params
            .file_path
            .clone()
            .ok_or_else(|| AppError::not_in_context("change"))?;
        (iid, file_path)
    };

    let params = PanelParams {
        iid: Some(iid),
        file_path: Some(file_path),
        ..Default::default()
    };
    open_panel(state, editor, &request.cwd, PanelKind::ChangeDiff, params).await?;
    Ok(())
}

pub async fn browse(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let mr = target(state, editor, request).await?;
    super::browse_resource(editor, &Resource::MergeRequest(mr))
}
