//! The node model: one renderable line plus its source resource.

use crate::models::Resource;

/// Diff line position carried by nodes in a change-diff panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePos {
    pub old_line: Option<i64>,
    pub new_line: Option<i64>,
}

/// Structured payload attached to a node.
///
/// List rows carry their originating resource; diff and discussion panels
/// add the extras their actions need.
#[derive(Debug, Clone, Default)]
pub struct NodeParams {
    pub resource: Option<Resource>,
    pub discussion_id: Option<String>,
    pub file_path: Option<String>,
    pub line_pos: Option<LinePos>,
}

impl NodeParams {
    pub fn with_resource(resource: Resource) -> Self {
        Self {
            resource: Some(resource),
            ..Default::default()
        }
    }
}

/// One buffer line. `display` never contains a newline; one node is one line.
#[derive(Debug, Clone)]
pub struct Node {
    pub display: String,
    pub params: NodeParams,
}

impl Node {
    /// A plain text node with no payload.
    pub fn text(display: impl Into<String>) -> Self {
        Self::with_params(display, NodeParams::default())
    }

    pub fn with_params(display: impl Into<String>, params: NodeParams) -> Self {
        let display = display.into();
        debug_assert!(
            !display.contains('\n'),
            "node display must be a single line"
        );
        Self { display, params }
    }
}

/// Split a free-text field into one node per line.
///
/// A `None` field yields zero nodes; the caller decides how to tell the user
/// there is no content.
pub fn text_nodes(content: Option<&str>) -> Vec<Node> {
    match content {
        None => Vec::new(),
        Some(text) => text.split('\n').map(Node::text).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_nodes_split() {
        let nodes = text_nodes(Some("first\nsecond\n\nfourth"));
        let lines: Vec<&str> = nodes.iter().map(|n| n.display.as_str()).collect();
        assert_eq!(lines, vec!["first", "second", "", "fourth"]);
    }

    #[test]
    fn test_text_nodes_absent_field() {
        assert!(text_nodes(None).is_empty());
    }

    #[test]
    fn test_single_line_nodes() {
        for node in text_nodes(Some("a\nb")) {
            assert!(!node.display.contains('\n'));
        }
    }
}
