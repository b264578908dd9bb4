// [apps/orchestrator/src/handlers/audit.rs]
//! Audit log query surface (§6, §9 Supplemented Features pagination).

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aegis_core_audit::AuditQuery;
use aegis_domain_models::audit::{AuditEvent, AuditKind, Severity};

use crate::handlers::inference::ErrorWire;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQueryParams {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub kind: Option<String>,
    pub min_severity: Option<String>,
    pub user: Option<String>,
    pub source: Option<String>,
    pub success: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

fn parse_severity(raw: &str) -> Option<Severity> {
    match raw.to_ascii_lowercase().as_str() {
        "info" => Some(Severity::Info),
        "warning" => Some(Severity::Warning),
        "critical" => Some(Severity::Critical),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct AuditPageView {
    pub events: Vec<AuditEvent>,
    pub total_matched: usize,
}

pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<AuditPageView>, ErrorWire> {
    let query = AuditQuery {
        since: params.since,
        until: params.until,
        kinds: params.kind.map(|k| vec![AuditKind::from(k.as_str())]).unwrap_or_default(),
        min_severity: params.min_severity.as_deref().and_then(parse_severity),
        user: params.user,
        source: params.source,
        success: params.success,
        limit: params.limit.unwrap_or(100),
        offset: params.offset.unwrap_or(0),
    };

    let page = state.orchestrator.audit_query(&query)?;
    Ok(Json(AuditPageView { events: page.events, total_matched: page.total_matched }))
}
