// [apps/orchestrator/src/bootstrap.rs]
//! Startup model discovery (§4.8 "On startup: scan models directory;
//! hash-verify known models"). Walks the configured models directory for
//! `.gguf` files, builds a descriptor per model, and quick-checks each
//! one against the known-hash database without paying for a full SHA-256
//! unless nothing is on record yet for that filename.

use std::collections::HashMap;

use aegis_core_integrity::HashDatabase;
use aegis_domain_models::prelude::ModelDescriptor;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;

/// Scans `config.models_dir` for `.gguf` files and returns one descriptor
/// per file found, keyed by file stem. Unreadable directories yield an
/// empty registry rather than aborting startup — the orchestrator still
/// comes up, just with nothing to serve until models are added.
pub fn discover_models(config: &OrchestratorConfig) -> HashMap<String, ModelDescriptor> {
    let hash_db = HashDatabase::load(config.hash_store_path());
    let mut models = HashMap::new();

    let entries = match std::fs::read_dir(&config.models_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(target: "bootstrap", dir = %config.models_dir.display(), error = %e, "models directory unreadable; starting with an empty registry");
            return models;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("gguf") {
            continue;
        }

        let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else { continue };
        let size_bytes = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(target: "bootstrap", file = %path.display(), error = %e, "failed to stat model file, skipping");
                continue;
            }
        };

        let mut descriptor = ModelDescriptor::new(id.clone(), path.to_string_lossy().to_string(), size_bytes);
        descriptor.sha256 = hash_db.expected_hash(&path);

        match aegis_core_integrity::quick_check(&path, &hash_db) {
            Ok(true) => info!(target: "bootstrap", model = %id, "quick size check passed"),
            Ok(false) => warn!(target: "bootstrap", model = %id, "size mismatch against known hash database"),
            Err(e) => warn!(target: "bootstrap", model = %id, error = %e, "quick check failed"),
        }

        models.insert(id, descriptor);
    }

    info!(target: "bootstrap", count = models.len(), dir = %config.models_dir.display(), "model registry built");
    models
}
