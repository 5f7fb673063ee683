//! The buffer registry: buffer number -> panel record.
//!
//! The registry and the visible buffer text are updated together in
//! [`BufferRegistry::register`]; line `L` of a registered buffer always
//! corresponds to `nodes[L - 1]`.

use crate::error::AppError;
use crate::panel::kind::PanelKind;
use crate::panel::node::Node;
use crate::editor::{BufferId, Editor};
use std::collections::HashMap;

/// Panel-specific state stored alongside a buffer's nodes.
///
/// Only the fields a given panel kind uses are set; the rest stay `None`.
#[derive(Debug, Clone, Default)]
pub struct PanelParams {
    /// Current page of a paginated list.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// State filter for issue/MR lists.
    pub state: Option<String>,
    /// Target issue or MR number for preview/edit/discussion panels.
    pub iid: Option<i64>,
    /// Target wiki slug for wiki panels.
    pub slug: Option<String>,
    pub pipeline_id: Option<i64>,
    pub job_id: Option<i64>,
    /// Changed file addressed by a change-diff panel.
    pub file_path: Option<String>,
}

impl PanelParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(20)
    }

    pub fn paged(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    pub fn for_iid(iid: i64) -> Self {
        Self {
            iid: Some(iid),
            ..Default::default()
        }
    }
}

/// What a registered buffer currently shows.
#[derive(Debug)]
pub struct BufferRecord {
    pub kind: PanelKind,
    pub nodes: Vec<Node>,
    pub params: PanelParams,
}

/// Mapping from live editor buffers to their panel records.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    records: HashMap<BufferId, BufferRecord>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) a record and write its lines into the buffer.
    ///
    /// Excess trailing lines from a previous, longer rendering are deleted so
    /// the buffer length always equals the node count.
    pub fn register(
        &mut self,
        editor: &mut dyn Editor,
        bufnr: BufferId,
        kind: PanelKind,
        nodes: Vec<Node>,
        params: PanelParams,
    ) {
        let old_count = editor.line_count(bufnr);
        let lines: Vec<String> = nodes.iter().map(|n| n.display.clone()).collect();
        editor.set_lines(bufnr, 0, lines.len(), &lines);
        if old_count > lines.len() {
            editor.set_lines(bufnr, lines.len(), old_count, &[]);
        }

        self.records.insert(
            bufnr,
            BufferRecord {
                kind,
                nodes,
                params,
            },
        );
    }

    /// The node the cursor addresses: line `L` maps to `nodes[L - 1]`.
    pub fn current_node(&self, bufnr: BufferId, line: usize) -> Result<&Node, AppError> {
        let record = self.record(bufnr)?;
        if line == 0 || line > record.nodes.len() {
            return Err(AppError::NoNodeAtLine { bufnr, line });
        }
        Ok(&record.nodes[line - 1])
    }

    pub fn record(&self, bufnr: BufferId) -> Result<&BufferRecord, AppError> {
        self.records
            .get(&bufnr)
            .ok_or(AppError::BufferNotRegistered { bufnr })
    }

    pub fn record_mut(&mut self, bufnr: BufferId) -> Result<&mut BufferRecord, AppError> {
        self.records
            .get_mut(&bufnr)
            .ok_or(AppError::BufferNotRegistered { bufnr })
    }

    /// Drop the record for a closed buffer. Unknown buffers are a no-op.
    pub fn evict(&mut self, bufnr: BufferId) {
        self.records.remove(&bufnr);
    }

    pub fn contains(&self, bufnr: BufferId) -> bool {
        self.records.contains_key(&bufnr)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
