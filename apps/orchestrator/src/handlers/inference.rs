// [apps/orchestrator/src/handlers/inference.rs]
//! `Submit` and `SubmitStream` (§6): the two inference entry points.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use aegis_domain_models::prelude::{AppError, ErrorKind, Priority};
use aegis_infra_backend_client::Usage;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompletionBody {
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub text: String,
    pub usage: Usage,
}

fn parse_priority(raw: Option<&str>) -> Priority {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Normal,
    }
}

fn params_vec(params: HashMap<String, String>) -> Vec<(String, String)> {
    params.into_iter().collect()
}

impl IntoResponse for ErrorWire {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ErrorKind::NotFound => axum::http::StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => axum::http::StatusCode::BAD_REQUEST,
            ErrorKind::ResourceExhausted => axum::http::StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Degraded => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Unhealthy => axum::http::StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Timeout => axum::http::StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Canceled => axum::http::StatusCode::BAD_REQUEST,
            ErrorKind::IntegrityFailure => axum::http::StatusCode::CONFLICT,
            ErrorKind::Internal => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorWire {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<AppError> for ErrorWire {
    fn from(err: AppError) -> Self {
        let err = err.redacted();
        Self { kind: err.kind, message: err.message, retryable: err.retryable }
    }
}

pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<CompletionBody>,
) -> Result<Json<CompletionResponse>, ErrorWire> {
    let priority = parse_priority(body.priority.as_deref());
    let (text, usage) = state
        .orchestrator
        .submit(&body.model, &body.prompt, params_vec(body.params), priority)
        .await?;
    Ok(Json(CompletionResponse { text, usage }))
}

pub async fn submit_stream(
    State(state): State<AppState>,
    Json(body): Json<CompletionBody>,
) -> Result<Sse<impl futures_util::Stream<Item = Result<Event, Infallible>>>, ErrorWire> {
    let priority = parse_priority(body.priority.as_deref());
    let rx = state
        .orchestrator
        .submit_stream(&body.model, &body.prompt, params_vec(body.params), priority)
        .await?;

    let events = ReceiverStream::new(rx).map(|item| match item {
        Ok(delta) => Ok(Event::default().data(delta)),
        Err(err) => Ok(Event::default().event("error").data(err.redacted().message)),
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
