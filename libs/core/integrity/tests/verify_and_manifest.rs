// [libs/core/integrity/tests/verify_and_manifest.rs]
use aegis_core_integrity::{hash_db::KnownHash, quick_check, verify_file, verify_signed_manifest, HashDatabase};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use std::collections::HashSet;
use std::io::Write;

fn write_temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn verify_file_reports_valid_for_untampered_known_hash() {
    let file = write_temp_file(b"hello world");
    let filename = file.path().file_name().unwrap().to_string_lossy().to_string();

    let mut db = HashDatabase::in_memory();
    let expected_hash = {
        use sha2::{Digest, Sha256};
        hex::encode(Sha256::digest(b"hello world"))
    };
    db.add_hash(KnownHash { filename, size_bytes: 11, sha256_hex: expected_hash.clone() });

    let result = verify_file(file.path(), &db).unwrap();
    assert!(result.known);
    assert!(result.valid);
    assert_eq!(result.hash_hex, expected_hash);
}

#[test]
fn verify_file_reports_invalid_after_tamper() {
    let file = write_temp_file(b"hello world");
    let filename = file.path().file_name().unwrap().to_string_lossy().to_string();

    let mut db = HashDatabase::in_memory();
    db.add_hash(KnownHash {
        filename,
        size_bytes: 11,
        sha256_hex: "0000000000000000000000000000000000000000000000000000000000000000"
            .chars()
            .take(64)
            .collect(),
    });

    let result = verify_file(file.path(), &db).unwrap();
    assert!(result.known);
    assert!(!result.valid);
}

#[test]
fn quick_check_cannot_detect_same_size_tamper() {
    // Property 12: QuickCheck alone is not a tamper-detection mechanism.
    let file = write_temp_file(b"AAAAAAAAAAA"); // 11 bytes, same length as "hello world"
    let filename = file.path().file_name().unwrap().to_string_lossy().to_string();

    let mut db = HashDatabase::in_memory();
    db.add_hash(KnownHash { filename, size_bytes: 11, sha256_hex: "deadbeef".to_string() });

    assert!(quick_check(file.path(), &db).unwrap());
}

#[test]
fn signed_manifest_round_trip_succeeds_and_tamper_fails() {
    let mut csprng = OsRng;
    let signing_key = SigningKey::generate(&mut csprng);
    let verifying_key = signing_key.verifying_key();

    let payload = serde_json::json!({
        "version": "1",
        "created_at": "2026-01-01T00:00:00Z",
        "publisher": "acme",
        "models": [
            {"filename": "a.gguf", "sha256": "aa", "size": 1},
            {"filename": "b.gguf", "sha256": "bb", "size": 2}
        ]
    });
    let signed_bytes = serde_json::to_vec(&payload).unwrap();
    let signature = signing_key.sign(&signed_bytes);

    let manifest_json = serde_json::json!({
        "version": "1",
        "created_at": "2026-01-01T00:00:00Z",
        "publisher": "acme",
        "models": payload["models"],
        "signature": base64::Engine::encode(&base64::engine::general_purpose::STANDARD, signature.to_bytes()),
        "public_key": base64::Engine::encode(&base64::engine::general_purpose::STANDARD, verifying_key.to_bytes()),
    });

    let models = verify_signed_manifest(
        &manifest_json.to_string(),
        true,
        &HashSet::new(),
    )
    .expect("valid signature must verify");
    assert_eq!(models.len(), 2);

    let mut tampered = manifest_json.clone();
    tampered["models"][0]["sha256"] = serde_json::Value::String("tampered".to_string());
    let err = verify_signed_manifest(&tampered.to_string(), true, &HashSet::new());
    assert!(err.is_err());
}
