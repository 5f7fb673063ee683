//! Application error types.
//!
//! Every layer below the action dispatcher returns these; the dispatcher is
//! the single boundary that converts them into user-visible messages.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Application-level errors.
///
/// All variants serialize to a structured JSON object so a plugin host can
/// forward them over its RPC channel unchanged.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// GitLab API returned a non-success status code.
    #[error("GitLab API error: {message}")]
    RequestFailed {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Response body decoded, but did not match the expected shape.
    #[error("Unexpected response shape: {message}")]
    ResponseShape { message: String },

    /// Network request failed before a status code was available.
    #[error("Network error: {message}")]
    Network { message: String },

    /// An action needed a resource that was neither in its params nor under
    /// the cursor, and no picker fallback existed.
    #[error("No {kind} found at cursor or in parameters")]
    ResourceNotFoundInContext { kind: String },

    /// No project instance exists for the working directory.
    #[error("No GitLab instance for {cwd}")]
    InstanceNotFound { cwd: String },

    /// A buffer identifier has no registry record.
    #[error("Buffer {bufnr} is not a GitLab panel")]
    BufferNotRegistered { bufnr: u64 },

    /// Cursor line is outside the registered node range.
    #[error("No node at line {line} of buffer {bufnr}")]
    NoNodeAtLine { bufnr: u64, line: usize },

    /// A tabular column referenced a field that cannot be flattened to text.
    #[error("Column {column:?} holds an unflattenable value")]
    UnsupportedColumn { column: String },

    /// The working directory has no usable git remote.
    #[error("No git remote resolvable in {cwd}")]
    GitRemoteUnresolved { cwd: String },

    /// No token in git config or environment.
    #[error("No GitLab token configured (set gitlab.token or GITLAB_TOKEN)")]
    TokenMissing,

    /// The user declined a confirmation or dismissed a picker. Surfaced as a
    /// silent return, never as an error message.
    #[error("aborted by user")]
    UserAborted,

    /// Invalid input provided.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a request failure with status code and endpoint context.
    pub fn request_failed(
        message: impl Into<String>,
        status_code: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self::RequestFailed {
            message: message.into(),
            status_code: Some(status_code),
            endpoint: Some(endpoint.into()),
        }
    }

    /// Create a response shape error.
    pub fn response_shape(message: impl Into<String>) -> Self {
        Self::ResponseShape {
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a missing-context error for a resource kind.
    pub fn not_in_context(kind: impl Into<String>) -> Self {
        Self::ResourceNotFoundInContext { kind: kind.into() }
    }

    pub fn instance_not_found(cwd: &Path) -> Self {
        Self::InstanceNotFound {
            cwd: cwd.display().to_string(),
        }
    }

    pub fn git_remote_unresolved(cwd: &Path) -> Self {
        Self::GitRemoteUnresolved {
            cwd: cwd.display().to_string(),
        }
    }

    pub fn unsupported_column(column: impl Into<String>) -> Self {
        Self::UnsupportedColumn {
            column: column.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the dispatch boundary should swallow this error silently.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::UserAborted)
    }
}

// Conversions from common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network("Failed to connect to server")
        } else if err.is_decode() {
            Self::response_shape(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::response_shape(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_serialization() {
        let err = AppError::request_failed("Not Found", 404, "/projects/1/issues/9");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"RequestFailed\""));
        assert!(json.contains("\"status_code\":404"));
        assert!(json.contains("/projects/1/issues/9"));
    }

    #[test]
    fn test_optional_fields_not_serialized() {
        let err = AppError::RequestFailed {
            message: "boom".into(),
            status_code: None,
            endpoint: None,
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("status_code"));
        assert!(!json.contains("endpoint"));
    }

    #[test]
    fn test_user_aborted_is_silent() {
        assert!(AppError::UserAborted.is_silent());
        assert!(!AppError::TokenMissing.is_silent());
    }

    #[test]
    fn test_display_impl() {
        let err = AppError::NoNodeAtLine { bufnr: 3, line: 12 };
        assert_eq!(format!("{}", err), "No node at line 12 of buffer 3");
    }
}
