// [libs/domain/models/src/model.rs]
use serde::{Deserialize, Serialize};

/// Model descriptor (§3 Data Model). Created at registry scan; mutated only
/// by integrity updates (the `sha256` field); destroyed when the backing
/// file is removed from the models directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub path: String,
    pub size_bytes: u64,
    pub quantization: String,
    pub context_window: u32,
    pub sha256: Option<String>,
    pub projector_path: Option<String>,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            size_bytes,
            quantization: "unknown".to_string(),
            context_window: 4096,
            sha256: None,
            projector_path: None,
        }
    }
}
