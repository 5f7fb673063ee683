//! Working-directory GitLab configuration.
//!
//! Resolves which GitLab instance and project a directory belongs to by
//! reading its git remote and the `gitlab.url` / `gitlab.token` git-config
//! keys, falling back to `GITLAB_URL` / `GITLAB_TOKEN` environment variables.

use crate::error::AppError;
use std::path::Path;
use std::process::Command;

/// Base URL used when neither git config nor the environment names one.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Remote configuration resolved for a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// GitLab base URL.
    pub url: String,

    /// Project path with namespace (`group/project`), not yet URL-encoded.
    pub project_path: String,
}

/// Run git in `cwd` and return trimmed stdout, or None on any failure.
fn git_output(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(cwd)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn git_config(cwd: &Path, key: &str) -> Option<String> {
    git_output(cwd, &["config", "--get", key])
}

/// Extract the `group/project` path from a git remote URL.
///
/// Understands the three remote forms in common use:
/// scp-like (`git@host:group/project.git`), ssh URLs
/// (`ssh://git@host[:port]/group/project.git`) and http(s) URLs.
pub fn parse_project_path(remote: &str) -> Option<String> {
    let remote = remote.trim();

    let path = if let Some(rest) = remote
        .strip_prefix("ssh://")
        .or_else(|| remote.strip_prefix("http://"))
        .or_else(|| remote.strip_prefix("https://"))
    {
        // authority is everything up to the first slash
        let (_, path) = rest.split_once('/')?;
        path
    } else if remote.contains('@') && remote.contains(':') {
        // scp-like: git@host:group/project.git
        let (_, path) = remote.split_once(':')?;
        path
    } else {
        return None;
    };

    let path = path.trim_matches('/').trim_end_matches(".git").to_string();
    if path.is_empty() || !path.contains('/') {
        None
    } else {
        Some(path)
    }
}

/// Resolve the remote configuration for a working directory.
///
/// The project path always comes from `remote.origin.url`; a directory with
/// no origin remote is a hard failure. The base URL resolution order is
/// git config `gitlab.url`, then `GITLAB_URL`, then [`DEFAULT_GITLAB_URL`].
pub fn resolve_remote(cwd: &Path) -> Result<RemoteConfig, AppError> {
    let remote = git_config(cwd, "remote.origin.url")
        .ok_or_else(|| AppError::git_remote_unresolved(cwd))?;
    let project_path =
        parse_project_path(&remote).ok_or_else(|| AppError::git_remote_unresolved(cwd))?;

    let url = git_config(cwd, "gitlab.url")
        .or_else(|| std::env::var("GITLAB_URL").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());

    Ok(RemoteConfig {
        url: url.trim_end_matches('/').to_string(),
        project_path,
    })
}

/// Resolve the access token: git config `gitlab.token`, then `GITLAB_TOKEN`.
/// The token has no default; its absence is fatal.
pub fn resolve_token(cwd: &Path) -> Result<String, AppError> {
    git_config(cwd, "gitlab.token")
        .or_else(|| std::env::var("GITLAB_TOKEN").ok().filter(|v| !v.is_empty()))
        .ok_or(AppError::TokenMissing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scp_like_remote() {
        assert_eq!(
            parse_project_path("git@gitlab.com:group/project.git"),
            Some("group/project".to_string())
        );
    }

    #[test]
    fn test_parse_https_remote() {
        assert_eq!(
            parse_project_path("https://gitlab.example.com/group/sub/project.git"),
            Some("group/sub/project".to_string())
        );
    }

    #[test]
    fn test_parse_ssh_url_with_port() {
        assert_eq!(
            parse_project_path("ssh://git@gitlab.example.com:2222/group/project.git"),
            Some("group/project".to_string())
        );
    }

    #[test]
    fn test_parse_remote_without_namespace_rejected() {
        assert_eq!(parse_project_path("https://gitlab.com/project.git"), None);
        assert_eq!(parse_project_path("not a remote"), None);
    }

    #[test]
    fn test_resolve_remote_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_remote(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::GitRemoteUnresolved { .. }));
    }
}
