//! Wiki page model.

use serde::{Deserialize, Serialize};

/// A wiki page. The list endpoint omits `content` unless asked for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wiki {
    /// URL slug, the page's identity in every wiki endpoint.
    pub slug: String,

    pub title: String,

    /// Markup format (`markdown`, `rdoc`, `asciidoc`, `org`).
    pub format: String,

    pub content: Option<String>,
}
