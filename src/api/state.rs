//! Application state for the API server

use crate::Exporter;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone). Nothing in here is mutated
/// after startup; per-export state lives inside [`Exporter::export`].
#[derive(Clone)]
pub struct AppState {
    /// Export orchestrator
    pub exporter: Arc<Exporter>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(exporter: Arc<Exporter>) -> Self {
        Self { exporter }
    }
}
