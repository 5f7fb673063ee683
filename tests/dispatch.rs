//! Dispatcher behavior that does not depend on a live GitLab server.

mod common;

use common::{register_panel, sample_branch, sample_issue, sample_mr, seeded_state, MockEditor};
use gitlab_panels::models::{Resource, ResourceKind};
use gitlab_panels::panel::{Node, NodeParams, PanelKind, PanelParams};
use gitlab_panels::{dispatch, ActionRequest, AppState, Editor};
use std::path::Path;

fn cwd() -> &'static Path {
    Path::new("/work/panel")
}

fn issue_list_nodes() -> Vec<Node> {
    (1..=3)
        .map(|iid| {
            Node::with_params(
                format!("  {} | issue {}", iid, iid),
                NodeParams::with_resource(Resource::Issue(sample_issue(iid, "row"))),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_unknown_action_surfaces_one_error() {
    let mut state = AppState::new();
    let mut editor = MockEditor::new();

    dispatch(&mut state, &mut editor, ActionRequest::named("issue/frobnicate", cwd())).await;

    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("issue/frobnicate"));
}

#[tokio::test]
async fn test_action_outside_a_git_repo_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new();
    let mut editor = MockEditor::new();

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("issue/list", dir.path()),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert!(state.instances.is_empty());
}

#[tokio::test]
async fn test_buffer_close_evicts_record_and_detaches() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    assert!(state.buffers.contains(bufnr));

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("buffer/close", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert!(!state.buffers.contains(bufnr));
    assert!(state.instances.get(cwd()).unwrap().bufnrs.is_empty());
    assert!(editor.errors.is_empty());
}

#[tokio::test]
async fn test_prev_on_first_page_mutates_nothing() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    let lines_before = editor.get_lines(bufnr);

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("page/prev", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert_eq!(state.buffers.record(bufnr).unwrap().params.page(), 1);
    assert_eq!(editor.get_lines(bufnr), lines_before);
}

#[tokio::test]
async fn test_next_page_rolls_back_when_fetch_fails() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    let lines_before = editor.get_lines(bufnr);

    // The seeded client cannot connect, so the page-2 fetch fails and the
    // record must come back to page 1.
    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("page/next", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert_eq!(state.buffers.record(bufnr).unwrap().params.page(), 1);
    assert_eq!(editor.get_lines(bufnr), lines_before);
}

#[tokio::test]
async fn test_pagination_rejected_on_non_list_panel() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssuePreview,
        vec![Node::text("#1 row")],
        PanelParams::for_iid(1),
    );

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("page/next", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("not paginated"));
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    let lines_before = editor.get_lines(bufnr);
    editor.answer_prompt("n");

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("issue/delete", cwd()).at_cursor(bufnr, 2),
    )
    .await;

    // A sent request would have failed against the unroutable client and
    // surfaced an error; a declined confirmation stays completely silent.
    assert!(editor.errors.is_empty());
    assert!(editor.messages.is_empty());
    assert_eq!(editor.get_lines(bufnr), lines_before);
}

#[tokio::test]
async fn test_confirmed_delete_reaches_the_network() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    editor.answer_prompt("y");

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("issue/delete", cwd()).at_cursor(bufnr, 2),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
}

#[tokio::test]
async fn test_browse_opens_the_cursor_resource_url() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("issue/browse", cwd()).at_cursor(bufnr, 3),
    )
    .await;

    assert!(editor.errors.is_empty());
    assert_eq!(
        editor.opened_urls,
        vec!["https://gitlab.example.com/group/panel/-/issues/3"]
    );
}

#[tokio::test]
async fn test_explicit_resource_beats_cursor_node() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );

    let request = ActionRequest::named("issue/browse", cwd())
        .at_cursor(bufnr, 1)
        .with_resource(Resource::Issue(sample_issue(99, "explicit")));
    dispatch(&mut state, &mut editor, request).await;

    assert_eq!(
        editor.opened_urls,
        vec!["https://gitlab.example.com/group/panel/-/issues/99"]
    );
}

#[tokio::test]
async fn test_merge_of_a_merged_mr_is_rejected_before_confirmation() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    editor.answer_prompt("y");

    let request = ActionRequest::named("mr/merge", cwd())
        .with_resource(Resource::MergeRequest(sample_mr(7, "done", "merged")));
    dispatch(&mut state, &mut editor, request).await;

    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("already merged"));
    // the confirmation prompt never ran
    assert_eq!(editor.prompts.len(), 1);
}

#[tokio::test]
async fn test_declined_close_of_an_open_issue_sends_nothing() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    editor.answer_prompt("n");

    let request = ActionRequest::named("issue/toggle_state", cwd())
        .with_resource(Resource::Issue(sample_issue(3, "open one")));
    dispatch(&mut state, &mut editor, request).await;

    assert!(editor.errors.is_empty());
    assert!(editor.messages.is_empty());
}

#[tokio::test]
async fn test_reopening_a_closed_issue_skips_confirmation() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();

    let mut issue = sample_issue(4, "closed one");
    issue.state = "closed".into();
    let request =
        ActionRequest::named("issue/toggle_state", cwd()).with_resource(Resource::Issue(issue));
    dispatch(&mut state, &mut editor, request).await;

    // no prompt was scripted, so reaching the network proves no
    // confirmation was asked for
    assert_eq!(editor.errors.len(), 1);
}

#[tokio::test]
async fn test_branch_browse_derives_url_when_api_omits_it() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();

    let request = ActionRequest::named("branch/browse", cwd())
        .with_resource(Resource::Branch(sample_branch("feature-x", None)));
    dispatch(&mut state, &mut editor, request).await;

    assert!(editor.errors.is_empty());
    assert_eq!(
        editor.opened_urls,
        vec!["https://gitlab.example.com/group/panel/-/tree/feature-x"]
    );
}

#[tokio::test]
async fn test_recent_list_without_history_reports_nothing_to_open() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();

    dispatch(&mut state, &mut editor, ActionRequest::named("list/recent", cwd())).await;

    assert!(editor.errors.is_empty());
    assert_eq!(editor.messages, vec!["No recently viewed list"]);
}

#[tokio::test]
async fn test_recent_list_reopens_the_last_touched_kind() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    state
        .instances
        .touch_recent(cwd(), ResourceKind::Label)
        .unwrap();

    dispatch(&mut state, &mut editor, ActionRequest::named("list/recent", cwd())).await;

    // the label-list loader hits the unroutable client, so the routing to a
    // real list panel is what surfaces the error
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.messages.is_empty());
}

#[tokio::test]
async fn test_mr_list_cannot_page_past_the_connection_cap() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::MergeRequestList,
        Vec::new(),
        PanelParams::paged(5, 20),
    );

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("page/next", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("100"));
    assert_eq!(state.buffers.record(bufnr).unwrap().params.page(), 5);
}

#[tokio::test]
async fn test_mr_new_checks_the_prompted_source_branch() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    editor.answer_prompt("feature-x");

    dispatch(&mut state, &mut editor, ActionRequest::named("mr/new", cwd())).await;

    // the branch lookup fails against the unroutable client before the
    // target and title prompts run
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.prompts.is_empty());
}

#[tokio::test]
async fn test_main_panel_fetches_the_signed_in_user() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();

    dispatch(&mut state, &mut editor, ActionRequest::named("main/open", cwd())).await;

    assert_eq!(editor.errors.len(), 1);
}

#[tokio::test]
async fn test_reply_outside_discussion_panel_is_rejected() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );
    editor.answer_prompt("looks good");

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("discussion/reply", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
}

#[tokio::test]
async fn test_diff_requires_a_change_list_buffer() {
    let mut state = seeded_state(cwd());
    let mut editor = MockEditor::new();
    let bufnr = register_panel(
        &mut state,
        &mut editor,
        cwd(),
        PanelKind::IssueList,
        issue_list_nodes(),
        PanelParams::paged(1, 20),
    );

    dispatch(
        &mut state,
        &mut editor,
        ActionRequest::named("mr/diff", cwd()).at_cursor(bufnr, 1),
    )
    .await;

    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("change list"));
}
