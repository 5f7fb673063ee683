//! Issue actions.

use super::{
    choose, confirm, cursor_resource, instance_parts, open_panel, prompt_required, rerender_kind,
    ActionRequest, Resolution,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{Issue, IssueState, Resource};
use crate::panel::{PanelKind, PanelParams};
use crate::services::gitlab_client::{IssuePayload, ListQuery};
use crate::state::AppState;

/// Resolve the issue an action targets.
///
/// Explicit params win, then the cursor node, then a picker over open issues.
async fn resolve(
    state: &mut AppState,
    request: &ActionRequest,
) -> Result<Resolution<Issue>, AppError> {
    if let Some(issue) = request.params.resource.as_ref().and_then(Resource::as_issue) {
        return Ok(Resolution::Resolved(issue.clone()));
    }

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    if let Some(iid) = request.params.iid {
        return Ok(Resolution::Resolved(client.get_issue(project.id, iid).await?));
    }
    if let Some(issue) = cursor_resource(state, request).as_ref().and_then(Resource::as_issue) {
        return Ok(Resolution::Resolved(issue.clone()));
    }

    let query = ListQuery {
        state: Some("opened".into()),
        ..ListQuery::page(1, 50)
    };
    let page = client.list_issues(project.id, &query).await?;
    Ok(Resolution::NeedsSelection(page.data))
}

async fn target(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<Issue, AppError> {
    let resolution = resolve(state, request).await?;
    choose(editor, "issue", resolution, Issue::reference)
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
    open_panel(state, editor, &request.cwd, PanelKind::IssueList, params).await?;
    Ok(())
}

pub async fn preview(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    if issue.description.is_none() {
        editor.show_message(&format!("Issue #{} has no description", issue.iid));
    }
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::IssuePreview,
        PanelParams::for_iid(issue.iid),
    )
    .await?;
    Ok(())
}

pub async fn new(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let title = prompt_required(editor, "Issue title: ")?;
    let description = editor.prompt("Description (optional): ").filter(|d| !d.is_empty());

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let payload = IssuePayload {
        title: Some(title),
        description,
        ..Default::default()
    };
    let issue = client.create_issue(project.id, &payload).await?;
    editor.show_message(&format!("Created issue {}", issue.reference()));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn edit(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::IssueEdit,
        PanelParams::for_iid(issue.iid),
    )
    .await?;
    editor.show_message("Edit the description, then run issue/submit_edit");
    Ok(())
}

/// Push the edit buffer's content back as the issue description.
pub async fn submit_edit(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let bufnr = request
        .bufnr
        .ok_or_else(|| AppError::invalid_input("issue/submit_edit runs from an edit buffer"))?;
    let iid = {
        let record = state.buffers.record(bufnr)?;
        if record.kind != PanelKind::IssueEdit {
            return Err(AppError::invalid_input("buffer is not an issue edit panel"));
        }
        record
            .params
            .iid
            .ok_or_else(|| AppError::internal("issue edit panel has no iid"))?
    };

    let description = editor.get_lines(bufnr).join("\n");
    let (client, project) = instance_parts(state, &request.cwd)?;
    let payload = IssuePayload {
        description: Some(description),
        ..Default::default()
    };
    client.update_issue(project.id, iid, &payload).await?;
    editor.show_message(&format!("Updated issue #{}", iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn delete(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    confirm(editor, &format!("Delete issue {}? (y/N) ", issue.reference()))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.delete_issue(project.id, issue.iid).await?;
    editor.show_message(&format!("Deleted issue #{}", issue.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

/// Close an open issue, reopen a closed one.
pub async fn toggle_state(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    let event = match IssueState::from(issue.state.as_str()) {
        IssueState::Opened => {
            confirm(editor, &format!("Close issue {}? (y/N) ", issue.reference()))?;
            "close"
        }
        IssueState::Closed => "reopen",
    };

    let (client, project) = instance_parts(state, &request.cwd)?;
    let payload = IssuePayload {
        state_event: Some(event.into()),
        ..Default::default()
    };
    let updated = client.update_issue(project.id, issue.iid, &payload).await?;
    editor.show_message(&format!("Issue #{} is now {}", updated.iid, updated.state));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn label(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let labels = client.list_labels(project.id).await?;
    let label = choose(
        editor,
        "label",
        Resolution::NeedsSelection(labels),
        |l| l.name.clone(),
    )?;

    let payload = IssuePayload {
        add_labels: Some(label.name.clone()),
        ..Default::default()
    };
    client.update_issue(project.id, issue.iid, &payload).await?;
    editor.show_message(&format!("Added ~{} to #{}", label.name, issue.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn unlabel(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    let name = choose(
        editor,
        "label",
        Resolution::NeedsSelection(issue.labels.clone()),
        |l: &String| l.clone(),
    )?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    let payload = IssuePayload {
        remove_labels: Some(name.clone()),
        ..Default::default()
    };
    client.update_issue(project.id, issue.iid, &payload).await?;
    editor.show_message(&format!("Removed ~{} from #{}", name, issue.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn assign(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let members = client.list_members(project.id).await?;
    let member = choose(
        editor,
        "member",
        Resolution::NeedsSelection(members),
        |m| format!("@{} ({})", m.username, m.name),
    )?;

    let payload = IssuePayload {
        assignee_ids: Some(vec![member.id]),
        ..Default::default()
    };
    client.update_issue(project.id, issue.iid, &payload).await?;
    editor.show_message(&format!("Assigned @{} to #{}", member.username, issue.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn unassign(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    let payload = IssuePayload {
        assignee_ids: Some(Vec::new()),
        ..Default::default()
    };
    client.update_issue(project.id, issue.iid, &payload).await?;
    editor.show_message(&format!("Cleared assignees on #{}", issue.iid));
    rerender_kind(state, editor, &request.cwd, PanelKind::IssueList).await
}

pub async fn browse(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let issue = target(state, editor, request).await?;
    super::browse_resource(editor, &Resource::Issue(issue))
}
