// [apps/orchestrator/src/handlers/status.rs]
//! `Status` and the cache statistics surface (§6).

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::orchestrator::OrchestratorStatus;
use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<OrchestratorStatus> {
    Json(state.orchestrator.status().await)
}

/// `{enabled, entries, max_entries, ttl_seconds, hits, misses, hit_rate}` (§6).
#[derive(Debug, Serialize)]
pub struct CacheStatsView {
    pub enabled: bool,
    pub entries: usize,
    pub max_entries: usize,
    pub ttl_seconds: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsView> {
    let stats = state.orchestrator.cache_stats();
    let total = stats.hits + stats.misses;
    let hit_rate = if total == 0 { 0.0 } else { stats.hits as f64 / total as f64 };
    Json(CacheStatsView {
        enabled: true,
        entries: stats.entries,
        max_entries: state.orchestrator.cache_capacity(),
        ttl_seconds: state.orchestrator.cache_ttl_seconds(),
        hits: stats.hits,
        misses: stats.misses,
        hit_rate,
    })
}
