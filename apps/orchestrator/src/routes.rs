// [apps/orchestrator/src/routes.rs]
//! HTTP topology: nests the inference, model, status, and audit surfaces
//! under a single CORS-guarded router.

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{audit, inference, models, status};
use crate::middleware::degradation_guard;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let inference_routes = Router::new()
        .route("/completions", post(inference::submit))
        .route("/completions/stream", post(inference::submit_stream))
        .layer(middleware::from_fn_with_state(state.clone(), degradation_guard));

    let model_routes = Router::new()
        .route("/", get(models::list_models))
        .route("/:model_id/exists", get(models::model_exists))
        .route("/:model_id/load", post(models::ensure_loaded));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/v1",
            Router::new()
                .merge(inference_routes)
                .nest("/models", model_routes)
                .route("/status", get(status::status))
                .route("/cache/stats", get(status::cache_stats))
                .route("/audit", get(audit::query)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
