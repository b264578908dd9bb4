// [libs/core/audit/tests/chain.rs]
use aegis_core_audit::{query_dir, verify_file, AuditConfig, AuditDraft, AuditLogger, AuditQuery};
use aegis_domain_models::audit::{AuditKind, Severity, GENESIS_HASH};
use std::io::Write;

fn logger_in_temp_dir() -> (tempfile::TempDir, AuditLogger) {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::init(dir.path(), AuditConfig::default()).unwrap();
    (dir, logger)
}

#[test]
fn first_event_chains_from_genesis() {
    let (_dir, logger) = logger_in_temp_dir();
    let event = logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    assert_eq!(event.prev_hash, GENESIS_HASH);
    assert!(event.hash.is_some());
}

#[test]
fn successive_events_chain_by_hash() {
    let (_dir, logger) = logger_in_temp_dir();
    let first = logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    let second = logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    assert_eq!(second.prev_hash, first.hash.unwrap());
}

#[test]
fn reopening_the_logger_resumes_the_chain_from_the_last_hash() {
    let dir = tempfile::tempdir().unwrap();
    let last_hash = {
        let logger = AuditLogger::init(dir.path(), AuditConfig::default()).unwrap();
        logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap().hash.unwrap()
    };

    let logger = AuditLogger::init(dir.path(), AuditConfig::default()).unwrap();
    let next = logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    assert_eq!(next.prev_hash, last_hash);
}

#[test]
fn verify_file_detects_no_violations_on_an_untampered_chain() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::init(dir.path(), AuditConfig::default()).unwrap();
    for _ in 0..5 {
        logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    }

    let key_path = dir.path().join(".audit_hmac_key");
    let key_hex = std::fs::read_to_string(key_path).unwrap();
    let key = hex::decode(key_hex.trim()).unwrap();

    let log_path = dir.path().join("audit-0000000001.jsonl");
    let violations = verify_file(&log_path, &key).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn verify_file_reports_the_offending_id_after_tampering() {
    let dir = tempfile::tempdir().unwrap();
    let logger = AuditLogger::init(dir.path(), AuditConfig::default()).unwrap();
    logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();
    let tampered_event = logger.append(AuditDraft::new(AuditKind::query(), "submit")).unwrap();

    let key_path = dir.path().join(".audit_hmac_key");
    let key_hex = std::fs::read_to_string(key_path).unwrap();
    let key = hex::decode(key_hex.trim()).unwrap();

    let log_path = dir.path().join("audit-0000000001.jsonl");
    let contents = std::fs::read_to_string(&log_path).unwrap();
    let tampered_contents = contents.replace("\"submit\"", "\"submit-tampered\"");
    let mut file = std::fs::OpenOptions::new().write(true).truncate(true).open(&log_path).unwrap();
    file.write_all(tampered_contents.as_bytes()).unwrap();

    let violations = verify_file(&log_path, &key).unwrap();
    assert!(!violations.is_empty());
    assert!(violations.iter().any(|v| v.event_id == tampered_event.id));
}

#[test]
fn query_filters_by_success_and_respects_limit() {
    let (_dir, logger) = logger_in_temp_dir();
    for i in 0..3 {
        logger.append(AuditDraft::new(AuditKind::query(), format!("ok-{i}"))).unwrap();
    }
    logger.append(AuditDraft::new(AuditKind::query(), "bad").failed("boom")).unwrap();

    let mut query = AuditQuery::new();
    query.success = Some(false);
    let page = query_dir(logger.dir(), &query).unwrap();
    assert_eq!(page.total_matched, 1);
    assert_eq!(page.events[0].severity, Severity::Warning);

    let mut all_query = AuditQuery::new();
    all_query.limit = 2;
    let page = query_dir(logger.dir(), &all_query).unwrap();
    assert_eq!(page.total_matched, 4);
    assert_eq!(page.events.len(), 2);
}
