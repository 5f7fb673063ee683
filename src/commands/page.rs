//! Pagination actions for list panels.

use super::{rerender, ActionRequest};
use crate::editor::{BufferId, Editor};
use crate::error::AppError;
use crate::state::AppState;

fn paginated_buffer(state: &AppState, request: &ActionRequest) -> Result<BufferId, AppError> {
    let bufnr = request
        .bufnr
        .ok_or_else(|| AppError::invalid_input("pagination runs from a list panel"))?;
    let record = state.buffers.record(bufnr)?;
    if !record.kind.paginated() {
        return Err(AppError::invalid_input(format!(
            "{} panel is not paginated",
            record.kind
        )));
    }
    Ok(bufnr)
}

/// Set a buffer's page and redraw it. A failed fetch puts the old page number
/// back so the record never points at a page that was not rendered.
async fn turn_to(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
    bufnr: BufferId,
    page: u32,
) -> Result<(), AppError> {
    let previous = {
        let record = state.buffers.record_mut(bufnr)?;
        let previous = record.params.page();
        record.params.page = Some(page);
        previous
    };

    if let Err(err) = rerender(state, editor, &request.cwd, bufnr).await {
        if let Ok(record) = state.buffers.record_mut(bufnr) {
            record.params.page = Some(previous);
        }
        return Err(err);
    }
    editor.show_message(&format!("Page {}", page));
    Ok(())
}

pub async fn next(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let bufnr = paginated_buffer(state, request)?;
    let page = state.buffers.record(bufnr)?.params.page();
    turn_to(state, editor, request, bufnr, page + 1).await
}

pub async fn prev(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    let bufnr = paginated_buffer(state, request)?;
    let page = state.buffers.record(bufnr)?.params.page();
    if page <= 1 {
        return Err(AppError::invalid_input("already on the first page"));
    }
    turn_to(state, editor, request, bufnr, page - 1).await
}
