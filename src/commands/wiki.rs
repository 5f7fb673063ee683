//! Wiki page actions.

use super::{
    choose, confirm, cursor_resource, instance_parts, open_panel, prompt_required, rerender_kind,
    ActionRequest, Resolution,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{Resource, Wiki};
use crate::panel::{PanelKind, PanelParams};
use crate::state::AppState;

async fn resolve(
    state: &mut AppState,
    request: &ActionRequest,
) -> Result<Resolution<Wiki>, AppError> {
    if let Some(wiki) = request.params.resource.as_ref().and_then(Resource::as_wiki) {
        return Ok(Resolution::Resolved(wiki.clone()));
    }

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;

    if let Some(slug) = &request.params.slug {
        return Ok(Resolution::Resolved(client.get_wiki(project.id, slug).await?));
    }
    if let Some(wiki) = cursor_resource(state, request).as_ref().and_then(Resource::as_wiki) {
        return Ok(Resolution::Resolved(wiki.clone()));
    }

    let wikis = client.list_wikis(project.id).await?;
    Ok(Resolution::NeedsSelection(wikis))
}

async fn target(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<Wiki, AppError> {
    let resolution = resolve(state, request).await?;
    choose(editor, "wiki page", resolution, |w| w.title.clone())
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
        PanelKind::WikiList,
        PanelParams::default(),
    )
    .await?;
    Ok(())
}

fn slug_params(slug: &str) -> PanelParams {
    PanelParams {
        slug: Some(slug.to_string()),
        ..Default::default()
    }
}

pub async fn preview(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let wiki = target(state, editor, request).await?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::WikiPreview,
        slug_params(&wiki.slug),
    )
    .await?;
    Ok(())
}

pub async fn new(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let title = prompt_required(editor, "Page title: ")?;
    let content = editor.prompt("Content: ").unwrap_or_default();

    state.instances.ensure(&request.cwd).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let wiki = client.create_wiki(project.id, &title, &content).await?;
    editor.show_message(&format!("Created wiki page {}", wiki.slug));
    rerender_kind(state, editor, &request.cwd, PanelKind::WikiList).await
}

pub async fn edit(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let wiki = target(state, editor, request).await?;
    open_panel(
        state,
        editor,
        &request.cwd,
        PanelKind::WikiEdit,
        slug_params(&wiki.slug),
    )
    .await?;
    editor.show_message("Edit the page, then run wiki/submit_edit");
    Ok(())
}

/// Push the edit buffer's content back as the page content.
pub async fn submit_edit(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let bufnr = request
        .bufnr
        .ok_or_else(|| AppError::invalid_input("wiki/submit_edit runs from an edit buffer"))?;
    let slug = {
        let record = state.buffers.record(bufnr)?;
        if record.kind != PanelKind::WikiEdit {
            return Err(AppError::invalid_input("buffer is not a wiki edit panel"));
        }
        record
            .params
            .slug
            .clone()
            .ok_or_else(|| AppError::internal("wiki edit panel has no slug"))?
    };

    let content = editor.get_lines(bufnr).join("\n");
    let (client, project) = instance_parts(state, &request.cwd)?;
    client.update_wiki(project.id, &slug, &content).await?;
    editor.show_message(&format!("Updated wiki page {}", slug));
    rerender_kind(state, editor, &request.cwd, PanelKind::WikiList).await
}

pub async fn delete(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let wiki = target(state, editor, request).await?;
    confirm(editor, &format!("Delete wiki page {}? (y/N) ", wiki.title))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.delete_wiki(project.id, &wiki.slug).await?;
    editor.show_message(&format!("Deleted wiki page {}", wiki.slug));
    rerender_kind(state, editor, &request.cwd, PanelKind::WikiList).await
}

pub async fn browse(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let wiki = target(state, editor, request).await?;
    // Wiki responses carry no web_url; the page URL is derivable.
    let (_, project) = instance_parts(state, &request.cwd)?;
    editor.open_url(&format!("{}/-/wikis/{}", project.web_url, wiki.slug));
    Ok(())
}
