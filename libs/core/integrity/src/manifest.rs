// [libs/core/integrity/src/manifest.rs]
//! Signed manifest import (§4.1 `VerifySignedManifest`, §6 signed manifest
//! format). The signed message is the canonical JSON of
//! `{version, created_at, publisher, models}` — the `signature` and
//! `public_key` fields ride alongside but are excluded from what gets signed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::hash_db::KnownHash;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("signature field is not valid base64: {0}")]
    InvalidSignatureEncoding(String),
    #[error("public key field is not valid base64: {0}")]
    InvalidPublicKeyEncoding(String),
    #[error("embedded public key is malformed")]
    MalformedPublicKey,
    #[error("embedded signature is malformed")]
    MalformedSignature,
    #[error("signature verification failed")]
    SignatureInvalid,
    #[error("manifest is unsigned and the caller did not opt in to unsigned import")]
    UnsignedNotAllowed,
    #[error("publisher key is not in the trusted set")]
    UntrustedPublisher,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestModelEntry {
    pub filename: String,
    pub sha256: String,
    pub size: u64,
    #[serde(default)]
    pub source: Option<String>,
}

/// The part of the manifest that gets signed (§6: "The signed message is
/// the canonical JSON of `{version, created_at, publisher, models}`").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedPayload {
    pub version: String,
    pub created_at: String,
    pub publisher: String,
    pub models: Vec<ManifestModelEntry>,
}

/// Full on-disk manifest, signed payload plus envelope fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedManifest {
    #[serde(flatten)]
    pub payload: SignedPayload,
    #[serde(default)]
    pub description: Option<String>,
    pub signature: String,
    pub public_key: String,
}

/// Canonical JSON for signing/verification: serde_json's default map
/// ordering is insertion order, so we rely on `SignedPayload`'s field order
/// being fixed at compile time rather than re-sorting keys at runtime.
fn canonical_payload_bytes(payload: &SignedPayload) -> Result<Vec<u8>, ManifestError> {
    Ok(serde_json::to_vec(payload)?)
}

/// Verify a signed manifest's Ed25519 signature, optionally checking the
/// publisher's key against a trusted set. Returns the models on success so
/// the caller can merge them into the hash database — nothing is ever
/// partially imported on failure.
///
/// `require_signature = false` allows the degenerate "trust whatever's on
/// disk" path used only in tests; production import always sets it `true`.
pub fn verify_signed_manifest(
    manifest_json: &str,
    require_signature: bool,
    trusted_publisher_keys: &HashSet<String>,
) -> Result<Vec<ManifestModelEntry>, ManifestError> {
    let manifest: SignedManifest = serde_json::from_str(manifest_json)?;

    if manifest.signature.is_empty() {
        if require_signature {
            return Err(ManifestError::UnsignedNotAllowed);
        }
        return Ok(manifest.payload.models);
    }

    if !trusted_publisher_keys.is_empty() && !trusted_publisher_keys.contains(&manifest.public_key)
    {
        return Err(ManifestError::UntrustedPublisher);
    }

    let public_key_bytes = BASE64
        .decode(&manifest.public_key)
        .map_err(|e| ManifestError::InvalidPublicKeyEncoding(e.to_string()))?;
    let public_key_array: [u8; 32] =
        public_key_bytes.try_into().map_err(|_| ManifestError::MalformedPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(&public_key_array).map_err(|_| ManifestError::MalformedPublicKey)?;

    let signature_bytes = BASE64
        .decode(&manifest.signature)
        .map_err(|e| ManifestError::InvalidSignatureEncoding(e.to_string()))?;
    let signature_array: [u8; 64] =
        signature_bytes.try_into().map_err(|_| ManifestError::MalformedSignature)?;
    let signature = Signature::from_bytes(&signature_array);

    let signed_bytes = canonical_payload_bytes(&manifest.payload)?;
    verifying_key
        .verify(&signed_bytes, &signature)
        .map_err(|_| ManifestError::SignatureInvalid)?;

    Ok(manifest.payload.models)
}

pub fn to_known_hashes(models: Vec<ManifestModelEntry>) -> Vec<KnownHash> {
    models
        .into_iter()
        .map(|m| KnownHash { filename: m.filename, size_bytes: m.size, sha256_hex: m.sha256 })
        .collect()
}
