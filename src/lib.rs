//! Panel engine for browsing and operating on a GitLab project from inside
//! a text editor.
//!
//! The host editor supplies buffers, prompts and keybindings through the
//! [`editor::Editor`] trait; this crate supplies everything behind them:
//! resolving the project from the git remote, talking to the GitLab API,
//! rendering resources as panel buffers, and dispatching named actions
//! against the node under the cursor.

pub mod commands;
pub mod editor;
pub mod error;
pub mod instance;
pub mod models;
pub mod panel;
pub mod services;
pub mod state;

pub use commands::{dispatch, ActionParams, ActionRequest};
pub use editor::{BufferId, Editor};
pub use error::AppError;
pub use state::AppState;
