//! Process-wide application state.
//!
//! Handlers never read ambient globals; the host owns one `AppState` and
//! passes it into every dispatch, which keeps them unit-testable.

use crate::instance::InstanceStore;
use crate::panel::BufferRegistry;

/// All mutable state of the panel engine.
#[derive(Debug, Default)]
pub struct AppState {
    pub instances: InstanceStore,
    pub buffers: BufferRegistry,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
