//! The action dispatcher.
//!
//! Every user-facing operation is one named action. The host maps keystrokes
//! and autocmds to [`ActionRequest`]s and calls [`dispatch`], which is the
//! single error boundary: handler failures become one status-line message and
//! never corrupt registry or instance state.

pub mod branch;
pub mod discussion;
pub mod issue;
pub mod merge_request;
pub mod page;
pub mod pipeline;
pub mod wiki;

use crate::editor::{BufferId, Editor};
use crate::error::AppError;
use crate::models::{Project, Resource};
use crate::panel::{self, PanelKind, PanelParams};
use crate::services::gitlab_client::GitLabClient;
use crate::state::AppState;
use std::path::{Path, PathBuf};

/// What the host passes when a keybinding or autocmd fires.
#[derive(Debug, Clone, Default)]
pub struct ActionRequest {
    /// Dispatch key, e.g. `issue/delete`.
    pub name: String,

    /// Working directory the keystroke happened in.
    pub cwd: PathBuf,

    /// Buffer the keystroke happened in, when any.
    pub bufnr: Option<BufferId>,

    /// 1-based cursor line, when the action is cursor-addressed.
    pub line: Option<usize>,

    /// Explicit parameters, filled programmatically (picker re-entry,
    /// host-side menus).
    pub params: ActionParams,
}

impl ActionRequest {
    pub fn named(name: &str, cwd: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            cwd: cwd.into(),
            ..Default::default()
        }
    }

    pub fn at_cursor(mut self, bufnr: BufferId, line: usize) -> Self {
        self.bufnr = Some(bufnr);
        self.line = Some(line);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.params.resource = Some(resource);
        self
    }
}

/// Explicit action parameters. Explicit params win over the cursor node.
#[derive(Debug, Clone, Default)]
pub struct ActionParams {
    pub resource: Option<Resource>,
    pub iid: Option<i64>,
    pub slug: Option<String>,
}

/// Either the action's target is known, or a picker has to supply it.
///
/// The two states make picker termination structural: `NeedsSelection`
/// is consumed exactly once, by [`choose`], which executes with the chosen
/// candidate instead of re-entering resolution.
pub enum Resolution<T> {
    Resolved(T),
    NeedsSelection(Vec<T>),
}

/// Collapse a resolution into a target, running the picker when needed.
///
/// An empty candidate list tells the user and aborts; a dismissed picker
/// aborts silently.
pub(crate) fn choose<T>(
    editor: &mut dyn Editor,
    kind: &str,
    resolution: Resolution<T>,
    label: impl Fn(&T) -> String,
) -> Result<T, AppError> {
    match resolution {
        Resolution::Resolved(target) => Ok(target),
        Resolution::NeedsSelection(candidates) => {
            if candidates.is_empty() {
                editor.show_message(&format!("No {}s found", kind));
                return Err(AppError::UserAborted);
            }
            let items: Vec<String> = candidates.iter().map(&label).collect();
            let index = editor
                .select(&format!("Select {}", kind), &items)
                .ok_or(AppError::UserAborted)?;
            candidates
                .into_iter()
                .nth(index)
                .ok_or_else(|| AppError::internal("picker returned an out-of-range index"))
        }
    }
}

/// Destructive-action gate: literal `y` proceeds, anything else aborts
/// silently.
pub(crate) fn confirm(editor: &mut dyn Editor, question: &str) -> Result<(), AppError> {
    match editor.prompt(question) {
        Some(answer) if answer == "y" => Ok(()),
        _ => Err(AppError::UserAborted),
    }
}

/// Prompt for one line of input; empty input aborts silently.
pub(crate) fn prompt_required(editor: &mut dyn Editor, message: &str) -> Result<String, AppError> {
    match editor.prompt(message) {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::UserAborted),
    }
}

/// Open a resource's page in the browser. Resources the API gives no URL for
/// fail with an input error; their handlers derive a URL themselves instead
/// of entering here.
pub(crate) fn browse_resource(
    editor: &mut dyn Editor,
    resource: &Resource,
) -> Result<(), AppError> {
    let url = resource.web_url().ok_or_else(|| {
        AppError::invalid_input(format!("{} has no browsable URL", resource.kind()))
    })?;
    editor.open_url(url);
    Ok(())
}

/// Clone the client/project pair out of the instance so handlers can await
/// without holding a borrow on the store.
pub(crate) fn instance_parts(
    state: &AppState,
    cwd: &Path,
) -> Result<(GitLabClient, Project), AppError> {
    let instance = state.instances.get(cwd)?;
    Ok((instance.client.clone(), instance.project.clone()))
}

/// Open a new panel buffer: load nodes, create the buffer, register it.
pub(crate) async fn open_panel(
    state: &mut AppState,
    editor: &mut dyn Editor,
    cwd: &Path,
    kind: PanelKind,
    params: PanelParams,
) -> Result<BufferId, AppError> {
    state.instances.ensure(cwd).await?;
    let (client, project) = instance_parts(state, cwd)?;
    let nodes = panel::load(&client, &project, kind, &params).await?;

    let bufnr = editor.create_buffer(&format!("gitlab://{}/{}", project.path_with_namespace, kind));
    state.buffers.register(editor, bufnr, kind, nodes, params);
    state.instances.attach_buffer(cwd, bufnr)?;
    if let Some(resource_kind) = kind.resource_kind() {
        state.instances.touch_recent(cwd, resource_kind)?;
    }
    Ok(bufnr)
}

/// Reopen the list panel of the instance's most recently touched resource
/// kind.
async fn recent_list(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    state.instances.ensure(&request.cwd).await?;
    let kind = state
        .instances
        .get(&request.cwd)?
        .recent_kind
        .and_then(PanelKind::list_for);
    match kind {
        Some(kind) => {
            let params = if kind.paginated() {
                PanelParams::paged(1, 20)
            } else {
                PanelParams::default()
            };
            open_panel(state, editor, &request.cwd, kind, params).await?;
            Ok(())
        }
        None => {
            editor.show_message("No recently viewed list");
            Ok(())
        }
    }
}

/// Re-fetch and redraw one registered buffer using its stored params.
pub(crate) async fn rerender(
    state: &mut AppState,
    editor: &mut dyn Editor,
    cwd: &Path,
    bufnr: BufferId,
) -> Result<(), AppError> {
    let (kind, params) = {
        let record = state.buffers.record(bufnr)?;
        (record.kind, record.params.clone())
    };
    let (client, project) = instance_parts(state, cwd)?;
    let nodes = panel::load(&client, &project, kind, &params).await?;
    state.buffers.register(editor, bufnr, kind, nodes, params);
    Ok(())
}

/// Re-render every buffer of the given kind under this instance, e.g. the
/// issue list after a delete. Buffers that fail to refresh are skipped.
pub(crate) async fn rerender_kind(
    state: &mut AppState,
    editor: &mut dyn Editor,
    cwd: &Path,
    kind: PanelKind,
) -> Result<(), AppError> {
    let bufnrs: Vec<BufferId> = {
        let instance = state.instances.get(cwd)?;
        instance
            .bufnrs
            .iter()
            .copied()
            .filter(|b| {
                state
                    .buffers
                    .record(*b)
                    .map(|r| r.kind == kind)
                    .unwrap_or(false)
            })
            .collect()
    };
    for bufnr in bufnrs {
        if let Err(err) = rerender(state, editor, cwd, bufnr).await {
            log::warn!("refresh of buffer {} failed: {}", bufnr, err);
        }
    }
    Ok(())
}

/// The resource attached to the node under the cursor, if the request
/// addresses a registered buffer line.
pub(crate) fn cursor_resource(state: &AppState, request: &ActionRequest) -> Option<Resource> {
    let (bufnr, line) = (request.bufnr?, request.line?);
    let node = state.buffers.current_node(bufnr, line).ok()?;
    node.params.resource.clone()
}

/// Dispatch one action. This is the error boundary: failures surface as one
/// error line, user aborts return silently, and the editor keeps running.
pub async fn dispatch(state: &mut AppState, editor: &mut dyn Editor, request: ActionRequest) {
    log::debug!("dispatch {}", request.name);
    match dispatch_inner(state, editor, &request).await {
        Ok(()) => {}
        Err(err) if err.is_silent() => {}
        Err(err) => {
            log::warn!("action {} failed: {}", request.name, err);
            editor.show_error(&err.to_string());
        }
    }
}

async fn dispatch_inner(
    state: &mut AppState,
    editor: &mut dyn Editor,
    request: &ActionRequest,
) -> Result<(), AppError> {
    match request.name.as_str() {
        "main/open" => {
            open_panel(
                state,
                editor,
                &request.cwd,
                PanelKind::Main,
                PanelParams::default(),
            )
            .await?;
            Ok(())
        }

        "issue/list" => issue::list(state, editor, request).await,
        "issue/preview" => issue::preview(state, editor, request).await,
        "issue/new" => issue::new(state, editor, request).await,
        "issue/edit" => issue::edit(state, editor, request).await,
        "issue/submit_edit" => issue::submit_edit(state, editor, request).await,
        "issue/delete" => issue::delete(state, editor, request).await,
        "issue/toggle_state" => issue::toggle_state(state, editor, request).await,
        "issue/label" => issue::label(state, editor, request).await,
        "issue/unlabel" => issue::unlabel(state, editor, request).await,
        "issue/assign" => issue::assign(state, editor, request).await,
        "issue/unassign" => issue::unassign(state, editor, request).await,
        "issue/browse" => issue::browse(state, editor, request).await,

        "branch/list" => branch::list(state, editor, request).await,
        "branch/new" => branch::new(state, editor, request).await,
        "branch/delete" => branch::delete(state, editor, request).await,
        "branch/browse" => branch::browse(state, editor, request).await,

        "mr/list" => merge_request::list(state, editor, request).await,
        "mr/preview" => merge_request::preview(state, editor, request).await,
        "mr/new" => merge_request::new(state, editor, request).await,
        "mr/approve" => merge_request::approve(state, editor, request).await,
        "mr/unapprove" => merge_request::unapprove(state, editor, request).await,
        "mr/merge" => merge_request::merge(state, editor, request).await,
        "mr/delete" => merge_request::delete(state, editor, request).await,
        "mr/assign" => merge_request::assign(state, editor, request).await,
        "mr/label" => merge_request::label(state, editor, request).await,
        "mr/changes" => merge_request::changes(state, editor, request).await,
        "mr/diff" => merge_request::diff(state, editor, request).await,
        "mr/browse" => merge_request::browse(state, editor, request).await,

        "wiki/list" => wiki::list(state, editor, request).await,
        "wiki/preview" => wiki::preview(state, editor, request).await,
        "wiki/new" => wiki::new(state, editor, request).await,
        "wiki/edit" => wiki::edit(state, editor, request).await,
        "wiki/submit_edit" => wiki::submit_edit(state, editor, request).await,
        "wiki/delete" => wiki::delete(state, editor, request).await,
        "wiki/browse" => wiki::browse(state, editor, request).await,

        "pipeline/list" => pipeline::list(state, editor, request).await,
        "pipeline/jobs" => pipeline::jobs(state, editor, request).await,
        "pipeline/retry" => pipeline::retry(state, editor, request).await,
        "pipeline/cancel" => pipeline::cancel(state, editor, request).await,
        "job/trace" => pipeline::job_trace(state, editor, request).await,
        "job/play" => pipeline::job_play(state, editor, request).await,
        "job/retry" => pipeline::job_retry(state, editor, request).await,
        "job/cancel" => pipeline::job_cancel(state, editor, request).await,

        "discussion/list" => discussion::list(state, editor, request).await,
        "discussion/new" => discussion::new(state, editor, request).await,
        "discussion/reply" => discussion::reply(state, editor, request).await,
        "discussion/resolve" => discussion::resolve(state, editor, request).await,

        "list/recent" => recent_list(state, editor, request).await,

        "page/next" => page::next(state, editor, request).await,
        "page/prev" => page::prev(state, editor, request).await,

        "buffer/close" => {
            let bufnr = request
                .bufnr
                .ok_or_else(|| AppError::invalid_input("buffer/close requires a buffer"))?;
            state.buffers.evict(bufnr);
            state.instances.detach_buffer(bufnr);
            Ok(())
        }

        other => Err(AppError::invalid_input(format!("unknown action: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Editor stub with scripted prompt and menu answers.
    #[derive(Default)]
    struct ScriptedEditor {
        prompts: VecDeque<Option<String>>,
        selections: VecDeque<Option<usize>>,
        messages: Vec<String>,
        errors: Vec<String>,
    }

    impl Editor for ScriptedEditor {
        fn create_buffer(&mut self, _name: &str) -> BufferId {
            1
        }

        fn set_lines(&mut self, _bufnr: BufferId, _start: usize, _end: usize, _lines: &[String]) {}

        fn line_count(&self, _bufnr: BufferId) -> usize {
            0
        }

        fn get_lines(&self, _bufnr: BufferId) -> Vec<String> {
            Vec::new()
        }

        fn prompt(&mut self, _message: &str) -> Option<String> {
            self.prompts.pop_front().unwrap_or(None)
        }

        fn select(&mut self, _title: &str, _items: &[String]) -> Option<usize> {
            self.selections.pop_front().unwrap_or(None)
        }

        fn show_message(&mut self, text: &str) {
            self.messages.push(text.to_string());
        }

        fn show_error(&mut self, text: &str) {
            self.errors.push(text.to_string());
        }

        fn open_url(&mut self, _url: &str) {}
    }

    #[test]
    fn test_choose_passes_resolved_through() {
        let mut editor = ScriptedEditor::default();
        let picked = choose(&mut editor, "thing", Resolution::Resolved(7), |n: &i32| {
            n.to_string()
        })
        .unwrap();
        assert_eq!(picked, 7);
    }

    #[test]
    fn test_choose_runs_picker() {
        let mut editor = ScriptedEditor::default();
        editor.selections.push_back(Some(1));
        let picked = choose(
            &mut editor,
            "thing",
            Resolution::NeedsSelection(vec!["a", "b", "c"]),
            |s: &&str| s.to_string(),
        )
        .unwrap();
        assert_eq!(picked, "b");
    }

    #[test]
    fn test_choose_dismissed_picker_aborts_silently() {
        let mut editor = ScriptedEditor::default();
        editor.selections.push_back(None);
        let err = choose(
            &mut editor,
            "thing",
            Resolution::NeedsSelection(vec![1, 2]),
            |n: &i32| n.to_string(),
        )
        .unwrap_err();
        assert!(err.is_silent());
        assert!(editor.errors.is_empty());
    }

    #[test]
    fn test_choose_empty_candidates_tells_user() {
        let mut editor = ScriptedEditor::default();
        let err = choose(
            &mut editor,
            "issue",
            Resolution::NeedsSelection(Vec::<i32>::new()),
            |n| n.to_string(),
        )
        .unwrap_err();
        assert!(err.is_silent());
        assert_eq!(editor.messages, vec!["No issues found"]);
    }

    #[test]
    fn test_confirm_requires_literal_y() {
        for (answer, ok) in [
            (Some("y".to_string()), true),
            (Some("yes".to_string()), false),
            (Some("n".to_string()), false),
            (None, false),
        ] {
            let mut editor = ScriptedEditor::default();
            editor.prompts.push_back(answer);
            assert_eq!(confirm(&mut editor, "Sure? (y/N) ").is_ok(), ok);
        }
    }

    #[test]
    fn test_prompt_required_rejects_blank_input() {
        let mut editor = ScriptedEditor::default();
        editor.prompts.push_back(Some("  ".to_string()));
        assert!(prompt_required(&mut editor, "Title: ").unwrap_err().is_silent());

        let mut editor = ScriptedEditor::default();
        editor.prompts.push_back(Some("a title".to_string()));
        assert_eq!(prompt_required(&mut editor, "Title: ").unwrap(), "a title");
    }
}
