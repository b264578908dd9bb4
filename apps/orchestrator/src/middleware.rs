// [apps/orchestrator/src/middleware.rs]
//! Request-scoped guards that sit in front of the inference routes.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

/// Rejects admission outright once the degradation ladder has reached
/// Emergency, before the request ever reaches the queue (§4.2's
/// `reject_new` policy flag, enforced here as a fast HTTP-level short
/// circuit rather than a queue round trip).
pub async fn degradation_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let level = state.orchestrator.current_degradation_level();
    if level.policy().reject_new {
        warn!(target: "orchestrator", ?level, "rejecting admission: system in emergency posture");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "kind": "DEGRADED",
                "message": "system is in emergency posture and is rejecting new work",
                "retryable": true,
            })),
        )
            .into_response();
    }
    next.run(req).await
}
