// [apps/orchestrator/src/handlers/models.rs]
//! `ListModels`, `ModelExists`, `EnsureLoaded` (§6).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use aegis_domain_models::prelude::ModelDescriptor;

use crate::handlers::inference::ErrorWire;
use crate::state::AppState;

pub async fn list_models(State(state): State<AppState>) -> Json<Vec<ModelDescriptor>> {
    Json(state.orchestrator.list_models())
}

#[derive(Debug, Serialize)]
pub struct ModelExistsResponse {
    pub exists: bool,
}

pub async fn model_exists(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Json<ModelExistsResponse> {
    Json(ModelExistsResponse { exists: state.orchestrator.model_exists(&model_id) })
}

#[derive(Debug, Serialize)]
pub struct EnsureLoadedResponse {
    pub port: u16,
}

pub async fn ensure_loaded(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<EnsureLoadedResponse>, ErrorWire> {
    let port = state.orchestrator.ensure_loaded(&model_id).await?;
    Ok(Json(EnsureLoadedResponse { port }))
}
