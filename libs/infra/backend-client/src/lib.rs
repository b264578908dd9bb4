// [libs/infra/backend-client/src/lib.rs]
/*!
 * =================================================================
 * APARATO: BACKEND CLIENT LIBRARY BARREL
 * CLASIFICACIÓN: INFRASTRUCTURE LIB (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN PÚBLICA DEL ENLACE LOOPBACK AL BACKEND
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod request;

pub use client::BackendClient;
pub use errors::ClientError;
pub use request::{CompletionRequest, CompletionResult, Usage};
