//! Branch actions.

use super::{
    choose, confirm, cursor_resource, instance_parts, open_panel, prompt_required, rerender_kind,
    ActionRequest, Resolution,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{Branch, Resource};
use crate::panel::{PanelKind, PanelParams};
use crate::services::gitlab_client::ListQuery;
use crate::state::AppState;

async fn resolve(
    state: &mut AppState,
    request: &ActionRequest,
) -> Result<Resolution<Branch>, AppError> {
    if let Some(branch) = request.params.resource.as_ref().and_then(Resource::as_branch) {
        return Ok(Resolution::Resolved(branch.clone()));
    }

    state.instances.ensure(&request.cwd).await?;
    if let Some(branch) = cursor_resource(state, request).as_ref().and_then(Resource::as_branch) {
        return Ok(Resolution::Resolved(branch.clone()));
    }

    let (client, project) = instance_parts(state, &request.cwd)?;
    let page = client
        .list_branches(project.id, &ListQuery::page(1, 100))
        .await?;
    Ok(Resolution::NeedsSelection(page.data))
}

async fn target(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<Branch, AppError> {
    let resolution = resolve(state, request).await?;
    choose(editor, "branch", resolution, |b| b.name.clone())
}

pub async fn list(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::BranchList,
        PanelParams::paged(1, 20),
    )
    .await?;
    Ok(())
}

pub async fn new(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let name = prompt_required(editor, "New branch name: ")?;

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let default_ref = project.default_branch.clone().unwrap_or_else(|| "main".into());
    let from_ref = editor
        .prompt(&format!("Create from ref (default: {}): ", default_ref))
        .filter(|r| !r.is_empty())
        .unwrap_or(default_ref);

    let branch = client.create_branch(project.id, &name, &from_ref).await?;
    editor.show_message(&format!("Created branch {} from {}", branch.name, from_ref));
    rerender_kind(state, editor, &request.cwd, PanelKind::BranchList).await
}

pub async fn delete(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let branch = target(state, editor, request).await?;
    if branch.protected {
        return Err(AppError::invalid_input(format!(
            "branch {} is protected",
            branch.name
        )));
    }
    confirm(editor, &format!("Delete branch {}? (y/N) ", branch.name))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.delete_branch(project.id, &branch.name).await?;
    editor.show_message(&format!("Deleted branch {}", branch.name));
    rerender_kind(state, editor, &request.cwd, PanelKind::BranchList).await
}

pub async fn browse(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let branch = target(state, editor, request).await?;
    let resource = Resource::Branch(branch.clone());
    match resource.web_url() {
        Some(url) => editor.open_url(url),
        None => {
            // Older servers omit web_url on branch responses.
            let (_, project) = instance_parts(state, &request.cwd)?;
            editor.open_url(&format!("{}/-/tree/{}", project.web_url, branch.name));
        }
    }
    Ok(())
}
