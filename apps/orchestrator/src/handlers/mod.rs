// [apps/orchestrator/src/handlers/mod.rs]
//! HTTP adapters over the orchestrator core (§6's external interface).
//! Each handler is a thin translation from JSON to an `Orchestrator` call
//! and back; no business logic lives here.

pub mod audit;
pub mod inference;
pub mod models;
pub mod status;
