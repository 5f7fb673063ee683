//! Discussion and note models.

use crate::models::User;
use serde::{Deserialize, Serialize};

/// A discussion thread on a merge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    /// Opaque discussion ID (a SHA-like string, not a number).
    pub id: String,

    #[serde(default)]
    pub individual_note: bool,

    pub notes: Vec<Note>,
}

impl Discussion {
    /// The note that opened the thread, if the server sent any notes at all.
    pub fn head_note(&self) -> Option<&Note> {
        self.notes.first()
    }
}

/// A single note inside a discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub body: String,
    pub author: User,
    pub created_at: String,
    pub updated_at: String,
    /// True for server-generated notes (state changes etc.).
    pub system: bool,
    pub resolvable: bool,
    pub resolved: Option<bool>,
    pub position: Option<NotePosition>,
}

/// Diff position of an inline note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePosition {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub old_line: Option<i64>,
    pub new_line: Option<i64>,
    pub position_type: String,
}
