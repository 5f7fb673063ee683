//! Shared fixtures for integration tests: a scripted in-memory editor and a
//! pre-seeded application state.
//!
//! The seeded instance's client points at an unroutable local port, so any
//! action that reaches the network fails fast with a connection error. Tests
//! that assert "no request was made" do so by asserting no error surfaced.

use gitlab_panels::editor::{BufferId, Editor};
use gitlab_panels::models::{Branch, BranchCommit, Issue, MergeRequest, Project, User};
use gitlab_panels::panel::{Node, PanelKind, PanelParams};
use gitlab_panels::services::gitlab_client::{GitLabClient, GitLabClientConfig};
use gitlab_panels::AppState;
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// In-memory editor with scripted prompt and menu answers.
#[derive(Default)]
pub struct MockEditor {
    pub buffers: HashMap<BufferId, Vec<String>>,
    next: BufferId,
    pub prompts: VecDeque<Option<String>>,
    pub selections: VecDeque<Option<usize>>,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub opened_urls: Vec<String>,
}

impl MockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_prompt(&mut self, answer: &str) {
        self.prompts.push_back(Some(answer.to_string()));
    }
}

impl Editor for MockEditor {
    fn create_buffer(&mut self, _name: &str) -> BufferId {
        self.next += 1;
        self.buffers.insert(self.next, Vec::new());
        self.next
    }

    fn set_lines(&mut self, bufnr: BufferId, start: usize, end: usize, lines: &[String]) {
        let buf = self.buffers.entry(bufnr).or_default();
        let end = end.min(buf.len());
        let start = start.min(end);
        buf.splice(start..end, lines.iter().cloned());
    }

    fn line_count(&self, bufnr: BufferId) -> usize {
        self.buffers.get(&bufnr).map_or(0, |b| b.len())
    }

    fn get_lines(&self, bufnr: BufferId) -> Vec<String> {
        self.buffers.get(&bufnr).cloned().unwrap_or_default()
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

    fn open_url(&mut self, url: &str) {
        self.opened_urls.push(url.to_string());
    }
}

pub fn sample_project() -> Project {
    Project {
        id: 42,
        name: "panel".into(),
        name_with_namespace: "group / panel".into(),
        path_with_namespace: "group/panel".into(),
        web_url: "https://gitlab.example.com/group/panel".into(),
        description: Some("fixture project".into()),
        default_branch: Some("main".into()),
        created_at: None,
        last_activity_at: None,
    }
}

pub fn sample_user(username: &str) -> User {
    User {
        id: 1,
        username: username.to_string(),
        name: username.to_string(),
        avatar_url: None,
        web_url: None,
    }
}

pub fn sample_issue(iid: i64, title: &str) -> Issue {
    Issue {
        id: iid + 1000,
        iid,
        project_id: 42,
        title: title.to_string(),
        description: Some("body".into()),
        state: "opened".into(),
        labels: vec!["bug".into()],
        assignees: Vec::new(),
        author: sample_user("ann"),
        web_url: format!("https://gitlab.example.com/group/panel/-/issues/{}", iid),
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-01-02T00:00:00Z".into(),
    }
}

pub fn sample_mr(iid: i64, title: &str, state: &str) -> MergeRequest {
    MergeRequest {
        id: iid + 2000,
        iid,
        project_id: 42,
        title: title.to_string(),
        description: None,
        state: state.to_string(),
        source_branch: "feature".into(),
        target_branch: "main".into(),
        labels: Vec::new(),
        author: sample_user("ann"),
        assignees: Vec::new(),
        reviewers: Vec::new(),
        approved_by: Vec::new(),
        web_url: format!(
            "https://gitlab.example.com/group/panel/-/merge_requests/{}",
            iid
        ),
        merge_status: None,
        created_at: "2024-01-01T00:00:00Z".into(),
        updated_at: "2024-01-02T00:00:00Z".into(),
    }
}

pub fn sample_branch(name: &str, web_url: Option<&str>) -> Branch {
    Branch {
        name: name.to_string(),
        merged: false,
        protected: false,
        default: false,
        commit: BranchCommit {
            id: "deadbeefcafe".into(),
            short_id: "deadbeef".into(),
            title: "tip commit".into(),
            author_name: "Ann".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
        },
        web_url: web_url.map(str::to_string),
    }
}

/// State with one instance bound to `cwd`. The client cannot reach anything.
pub fn seeded_state(cwd: &Path) -> AppState {
    let client = GitLabClient::new(GitLabClientConfig {
        base_url: "http://127.0.0.1:9".into(),
        token: "glpat-test".into(),
        ..Default::default()
    })
    .expect("client construction is offline");

    let mut state = AppState::new();
    state.instances.add(
        cwd.to_path_buf(),
        "http://127.0.0.1:9".into(),
        client,
        sample_project(),
    );
    state
}

/// Register a panel buffer directly, bypassing the network loaders.
pub fn register_panel(
    state: &mut AppState,
    editor: &mut MockEditor,
    cwd: &Path,
    kind: PanelKind,
    nodes: Vec<Node>,
    params: PanelParams,
) -> BufferId {
    let bufnr = editor.create_buffer(&format!("gitlab://{}", kind));
    state.buffers.register(editor, bufnr, kind, nodes, params);
    state
        .instances
        .attach_buffer(cwd, bufnr)
        .expect("instance is seeded");
    bufnr
}
