use std::sync::Arc;

use crate::generation::pipeline::ContentOrchestrator;
use crate::history::store::HistoryStore;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request mutable data: every generation run is independent.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: ContentOrchestrator,
    pub users: Arc<dyn UserStore>,
    /// Fire-and-forget sink for prompts and outputs.
    pub history: Arc<dyn HistoryStore>,
}
