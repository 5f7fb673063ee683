//! Per-working-directory project instances.
//!
//! An instance binds a directory to its GitLab base URL, token, resolved
//! project and open panel buffers. Instances are created lazily on first use
//! and live for the editor session; they are never destroyed explicitly.

use crate::editor::BufferId;
use crate::error::AppError;
use crate::models::{Project, ResourceKind};
use crate::services::git_remote;
use crate::services::gitlab_client::{GitLabClient, GitLabClientConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub type InstanceId = u64;

/// One working directory's binding to a GitLab project.
#[derive(Debug)]
pub struct Instance {
    pub id: InstanceId,
    pub cwd: PathBuf,
    /// GitLab base URL.
    pub url: String,
    /// Resolved project for the directory's git remote.
    pub project: Project,
    /// Authenticated client; owns the token.
    pub client: GitLabClient,
    /// Panel buffers opened under this instance.
    pub bufnrs: Vec<BufferId>,
    /// Merge request satellite buffers (diffs, discussions) default to.
    pub active_mr: Option<i64>,
    /// Most recently listed resource kind; `list/recent` reopens it.
    pub recent_kind: Option<ResourceKind>,
}

/// Registry of instances, keyed by working directory.
#[derive(Debug, Default)]
pub struct InstanceStore {
    next_id: InstanceId,
    instances: HashMap<PathBuf, Instance>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance built from already-resolved parts. Hosts with
    /// their own discovery (and tests) enter here; `ensure` does too.
    pub fn add(&mut self, cwd: PathBuf, url: String, client: GitLabClient, project: Project) {
        self.next_id += 1;
        let instance = Instance {
            id: self.next_id,
            cwd: cwd.clone(),
            url,
            project,
            client,
            bufnrs: Vec::new(),
            active_mr: None,
            recent_kind: None,
        };
        self.instances.insert(cwd, instance);
    }

    /// Get the instance for a directory, creating it on first use.
    ///
    /// Creation resolves the remote and token from git config and the
    /// environment, then fetches the project from the API. A directory with
    /// no git remote or no token fails without inserting anything.
    pub async fn ensure(&mut self, cwd: &Path) -> Result<&mut Instance, AppError> {
        if !self.instances.contains_key(cwd) {
            let remote = git_remote::resolve_remote(cwd)?;
            let token = git_remote::resolve_token(cwd)?;
            let client = GitLabClient::new(GitLabClientConfig {
                base_url: remote.url.clone(),
                token,
                ..Default::default()
            })?;
            let project = client.get_project(&remote.project_path).await?;
            self.add(cwd.to_path_buf(), remote.url, client, project);
        }
        // just inserted or already present
        Ok(self.instances.get_mut(cwd).unwrap())
    }

    pub fn get(&self, cwd: &Path) -> Result<&Instance, AppError> {
        self.instances
            .get(cwd)
            .ok_or_else(|| AppError::instance_not_found(cwd))
    }

    pub fn get_mut(&mut self, cwd: &Path) -> Result<&mut Instance, AppError> {
        self.instances
            .get_mut(cwd)
            .ok_or_else(|| AppError::instance_not_found(cwd))
    }

    /// Remember the merge request later satellite-buffer actions target.
    pub fn update_active_mr(&mut self, cwd: &Path, iid: i64) -> Result<(), AppError> {
        self.get_mut(cwd)?.active_mr = Some(iid);
        Ok(())
    }

    /// Remember the last-touched resource kind.
    pub fn touch_recent(&mut self, cwd: &Path, kind: ResourceKind) -> Result<(), AppError> {
        self.get_mut(cwd)?.recent_kind = Some(kind);
        Ok(())
    }

    /// Record that a panel buffer belongs to this instance.
    pub fn attach_buffer(&mut self, cwd: &Path, bufnr: BufferId) -> Result<(), AppError> {
        let instance = self.get_mut(cwd)?;
        if !instance.bufnrs.contains(&bufnr) {
            instance.bufnrs.push(bufnr);
        }
        Ok(())
    }

    /// Forget a closed buffer wherever it was attached.
    pub fn detach_buffer(&mut self, bufnr: BufferId) {
        for instance in self.instances.values_mut() {
            instance.bufnrs.retain(|b| *b != bufnr);
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
