// [libs/infra/backend-client/src/errors.rs]
//! APARATO: BACKEND CLIENT ERRORS
//! RESPONSABILIDAD: CATALOGACIÓN DE FALLOS DE ENLACE LOOPBACK

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("NETWORK_UNREACHABLE: failed to reach backend on loopback: {0}")]
    NetworkFault(#[from] reqwest::Error),

    #[error("ENVELOPE_CORRUPTION: failed to decode completion response: {0}")]
    DecodingFault(#[from] serde_json::Error),

    #[error("BACKEND_REJECTION: server returned status {0}")]
    ServerRejection(String),

    #[error("STREAM_FAULT: completion stream ended without a terminal chunk")]
    IncompleteStream,
}
