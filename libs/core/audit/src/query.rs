// [libs/core/audit/src/query.rs]
//! Audit query filters and pagination (§4.7, §9 Supplemented Features).

use aegis_domain_models::audit::{AuditEvent, AuditKind, Severity};
use aegis_domain_models::error::AppError;
use chrono::{DateTime, Utc};
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub kinds: Vec<AuditKind>,
    pub min_severity: Option<Severity>,
    pub user: Option<String>,
    pub source: Option<String>,
    pub success: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self { limit: 100, ..Default::default() }
    }

    fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(since) = self.since {
            match DateTime::parse_from_rfc3339(&event.timestamp) {
                Ok(ts) if ts.with_timezone(&Utc) < since => return false,
                Err(_) => return false,
                _ => {}
            }
        }
        if let Some(until) = self.until {
            match DateTime::parse_from_rfc3339(&event.timestamp) {
                Ok(ts) if ts.with_timezone(&Utc) > until => return false,
                Err(_) => return false,
                _ => {}
            }
        }
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind) {
            return false;
        }
        if let Some(min) = self.min_severity {
            if event.severity < min {
                return false;
            }
        }
        if let Some(user) = &self.user {
            if event.user.as_deref() != Some(user.as_str()) {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if event.source.as_deref() != Some(source.as_str()) {
                return false;
            }
        }
        if let Some(success) = self.success {
            if event.success != success {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    pub total_matched: usize,
}

/// Reads every rotated log file in `dir` in chronological (filename) order,
/// applies the filter, then slices by `offset`/`limit`.
pub fn query_dir(dir: &Path, query: &AuditQuery) -> Result<AuditPage, AppError> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| AppError::internal(format!("failed to read audit dir: {e}")))?
        .flatten()
        .filter(|entry| {
            entry.file_name().to_string_lossy().starts_with("audit-")
                && entry.file_name().to_string_lossy().ends_with(".jsonl")
        })
        .map(|entry| entry.path())
        .collect();
    files.sort();

    let mut matched = Vec::new();
    for path in files {
        let file = std::fs::File::open(&path).map_err(|e| AppError::internal(format!("failed to open {path:?}: {e}")))?;
        let reader = std::io::BufReader::new(file);
        for line in reader.lines() {
            let line = line.map_err(|e| AppError::internal(format!("failed to read {path:?}: {e}")))?;
            if line.trim().is_empty() {
                continue;
            }
            let event: AuditEvent = serde_json::from_str(&line)
                .map_err(|e| AppError::internal(format!("failed to parse audit event in {path:?}: {e}")))?;
            if query.matches(&event) {
                matched.push(event);
            }
        }
    }

    let total_matched = matched.len();
    let page = matched.into_iter().skip(query.offset).take(query.limit.max(1)).collect();

    Ok(AuditPage { events: page, total_matched })
}
