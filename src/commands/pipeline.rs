//! Pipeline and job actions.

use super::{
    choose, confirm, cursor_resource, instance_parts, open_panel, rerender, rerender_kind,
    ActionRequest, Resolution,
};
use crate::editor::Editor;
use crate::error::AppError;
use crate::models::{Job, Pipeline, Resource};
use crate::panel::{PanelKind, PanelParams};
use crate::services::gitlab_client::ListQuery;
use crate::state::AppState;

async fn resolve_pipeline(
    state: &mut AppState,
    request: &ActionRequest,
) -> Result<Resolution<Pipeline>, AppError> {
    if let Some(pipeline) = request.params.resource.as_ref().and_then(Resource::as_pipeline) {
        return Ok(Resolution::Resolved(pipeline.clone()));
    }

    state.instances.ensure(&request.cwd).await?;
    if let Some(pipeline) = cursor_resource(state, request).as_ref().and_then(Resource::as_pipeline) {
        return Ok(Resolution::Resolved(pipeline.clone()));
    }

    let (client, project) = instance_parts(state, &request.cwd)?;
    let page = client
        .list_pipelines(project.id, &ListQuery::page(1, 30))
        .await?;
    Ok(Resolution::NeedsSelection(page.data))
}

async fn target_pipeline(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<Pipeline, AppError> {
    let resolution = resolve_pipeline(state, request).await?;
    choose(editor, "pipeline", resolution, |p| {
        format!("#{} {} ({})", p.id, p.ref_name, p.status)
    })
}

/// Resolve the job an action targets: the cursor node, or a picker over the
/// jobs of the job-list buffer's pipeline.
async fn target_job(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<Job, AppError> {
    if let Some(job) = request.params.resource.as_ref().and_then(Resource::as_job) {
        return Ok(job.clone());
    }

    state.instances.ensure(&request.cwd).await?;
    if let Some(job) = cursor_resource(state, request).as_ref().and_then(Resource::as_job) {
        return Ok(job.clone());
    }

    let pipeline_id = request
        .bufnr
        .and_then(|bufnr| state.buffers.record(bufnr).ok())
        .and_then(|record| record.params.pipeline_id)
        .ok_or_else(|| AppError::not_in_context("job"))?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let jobs = client.list_pipeline_jobs(project.id, pipeline_id).await?;
    choose(
        editor,
        "job",
        Resolution::NeedsSelection(jobs),
        |j| format!("{} / {} ({})", j.stage, j.name, j.status),
    )
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
        PanelKind::PipelineList,
        PanelParams::paged(1, 20),
    )
    .await?;
    Ok(())
}

pub async fn jobs(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let pipeline = target_pipeline(state, editor, request).await?;
    let params = PanelParams {
        pipeline_id: Some(pipeline.id),
        ..Default::default()
    };
    open_panel(state, editor, &request.cwd, PanelKind::JobList, params).await?;
    Ok(())
}

pub async fn retry(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let pipeline = target_pipeline(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    client.retry_pipeline(project.id, pipeline.id).await?;
    editor.show_message(&format!("Retrying pipeline #{}", pipeline.id));
    rerender_kind(state, editor, &request.cwd, PanelKind::PipelineList).await
}

pub async fn cancel(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let pipeline = target_pipeline(state, editor, request).await?;
    confirm(editor, &format!("Cancel pipeline #{}? (y/N) ", pipeline.id))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.cancel_pipeline(project.id, pipeline.id).await?;
    editor.show_message(&format!("Cancelled pipeline #{}", pipeline.id));
    rerender_kind(state, editor, &request.cwd, PanelKind::PipelineList).await
}

pub async fn job_trace(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let job = target_job(state, editor, request).await?;
    let params = PanelParams {
        job_id: Some(job.id),
        ..Default::default()
    };
    open_panel(state, editor, &request.cwd, PanelKind::JobTrace, params).await?;
    Ok(())
}

pub async fn job_play(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let job = target_job(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let started = client.play_job(project.id, job.id).await?;
    editor.show_message(&format!("Started job {} ({})", started.name, started.status));
    refresh_job_list(state, editor, request).await
}

pub async fn job_retry(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let job = target_job(state, editor, request).await?;
    let (client, project) = instance_parts(state, &request.cwd)?;
    let retried = client.retry_job(project.id, job.id).await?;
    editor.show_message(&format!("Retrying job {} ({})", retried.name, retried.status));
    refresh_job_list(state, editor, request).await
}

pub async fn job_cancel(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let job = target_job(state, editor, request).await?;
    confirm(editor, &format!("Cancel job {}? (y/N) ", job.name))?;

    let (client, project) = instance_parts(state, &request.cwd)?;
    client.cancel_job(project.id, job.id).await?;
    editor.show_message(&format!("Cancelled job {}", job.name));
    refresh_job_list(state, editor, request).await
}

/// Redraw the job list the action ran in, if it ran in one.
async fn refresh_job_list(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    if let Some(bufnr) = request.bufnr {
        let is_job_list = state
            .buffers
            .record(bufnr)
            .map(|r| r.kind == PanelKind::JobList)
            .unwrap_or(false);
        if is_job_list {
            rerender(state, editor, &request.cwd, bufnr).await?;
        }
    }
    Ok(())
}
