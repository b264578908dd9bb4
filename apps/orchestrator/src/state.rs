// [apps/orchestrator/src/state.rs]
//! Axum-shared application state: a thin, cheaply-cloneable handle around
//! the orchestrator core.

use std::sync::Arc;

use crate::orchestrator::Orchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}
