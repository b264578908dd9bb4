// [libs/core/audit/src/logger.rs]
//! Append-only JSONL audit logger with HMAC hash chaining and size-based
//! rotation (§4.7).

use aegis_domain_models::audit::{AuditEvent, AuditKind, Severity, GENESIS_HASH};
use aegis_domain_models::error::AppError;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::hash::compute_hash;
use crate::key::load_or_create_key;

#[derive(Debug, Clone, Copy)]
pub struct AuditConfig {
    pub max_file_size_bytes: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { max_file_size_bytes: 50 * 1024 * 1024 }
    }
}

/// A new event to submit, before the logger assigns id/timestamp/prev_hash.
pub struct AuditDraft {
    pub kind: AuditKind,
    pub severity: Severity,
    pub action: String,
    pub user: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub details: BTreeMap<String, serde_json::Value>,
    pub success: bool,
    pub error: Option<String>,
}

impl AuditDraft {
    pub fn new(kind: impl Into<AuditKind>, action: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            severity: Severity::Info,
            action: action.into(),
            user: None,
            source: None,
            target: None,
            details: BTreeMap::new(),
            success: true,
            error: None,
        }
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self.severity = Severity::Warning;
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

struct ChainState {
    last_hash: String,
    counter: u64,
}

pub struct AuditLogger {
    dir: PathBuf,
    key: [u8; 32],
    host_id: String,
    config: AuditConfig,
    state: Mutex<ChainState>,
    epoch_counter: AtomicU64,
}

fn host_identifier() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/proc/sys/kernel/hostname").ok().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "host".to_string())
}

fn log_file_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("audit-{index:010}.jsonl"))
}

fn most_recent_log_file(dir: &Path) -> Option<(u64, PathBuf)> {
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let stripped = name.strip_prefix("audit-")?.strip_suffix(".jsonl")?;
            let index: u64 = stripped.parse().ok()?;
            Some((index, entry.path()))
        })
        .max_by_key(|(index, _)| *index)
}

fn last_hash_of_file(path: &Path) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let reader = std::io::BufReader::new(file);
    let last_line = reader.lines().map_while(Result::ok).filter(|l| !l.trim().is_empty()).last()?;
    let event: AuditEvent = serde_json::from_str(&last_line).ok()?;
    event.hash
}

impl AuditLogger {
    /// Creates `dir` (mode 0700), loads or creates the per-host HMAC key,
    /// and recovers the chain's last hash from the most recently modified
    /// log file (falling back to `GENESIS` on any failure to read it).
    pub fn init(dir: impl Into<PathBuf>, config: AuditConfig) -> Result<Self, AppError> {
        let dir = dir.into();
        create_private_dir(&dir)?;

        let key_path = dir.join(".audit_hmac_key");
        let key = load_or_create_key(&key_path)?;

        let (last_index, last_hash) = match most_recent_log_file(&dir) {
            Some((index, path)) => {
                let hash = last_hash_of_file(&path).unwrap_or_else(|| GENESIS_HASH.to_string());
                (index, hash)
            }
            None => (0, GENESIS_HASH.to_string()),
        };

        Ok(Self {
            dir,
            key,
            host_id: host_identifier(),
            config,
            state: Mutex::new(ChainState { last_hash, counter: 0 }),
            epoch_counter: AtomicU64::new(last_index),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Finalizes and appends one event synchronously: fills id/timestamp,
    /// computes the HMAC, writes the line, and `fsync`s before returning.
    /// Call via `spawn_blocking` from async code — this method does its own
    /// blocking I/O.
    pub fn append(&self, draft: AuditDraft) -> Result<AuditEvent, AppError> {
        let mut state = self.state.lock().expect("audit logger mutex poisoned");

        state.counter += 1;
        let unix_secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        let id = format!("{}-{}-{}", self.host_id, unix_secs, state.counter);
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);

        let mut event = AuditEvent {
            id,
            timestamp,
            kind: draft.kind,
            severity: draft.severity,
            action: draft.action,
            user: draft.user,
            source: draft.source,
            target: draft.target,
            details: draft.details,
            success: draft.success,
            error: draft.error,
            prev_hash: state.last_hash.clone(),
            hash: None,
        };

        let hash = compute_hash(&self.key, &event)?;
        event.hash = Some(hash.clone());

        self.write_line(&event)?;

        state.last_hash = hash;
        Ok(event)
    }

    fn current_file_index(&self) -> u64 {
        self.epoch_counter.load(Ordering::Relaxed).max(1)
    }

    fn write_line(&self, event: &AuditEvent) -> Result<(), AppError> {
        let mut index = self.current_file_index();
        let mut path = log_file_path(&self.dir, index);

        if path.exists() {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if size >= self.config.max_file_size_bytes {
                index += 1;
                self.epoch_counter.store(index, Ordering::Relaxed);
                path = log_file_path(&self.dir, index);
            }
        } else {
            self.epoch_counter.store(index, Ordering::Relaxed);
        }

        let line = serde_json::to_string(event)
            .map_err(|e| AppError::internal(format!("failed to serialize audit event: {e}")))?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| AppError::internal(format!("failed to open audit log file: {e}")))?;
        writeln!(file, "{line}").map_err(|e| AppError::internal(format!("failed to write audit event: {e}")))?;
        file.sync_all().map_err(|e| AppError::internal(format!("failed to fsync audit log: {e}")))?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::create_dir_all(dir).map_err(|e| AppError::internal(format!("failed to create audit dir: {e}")))?;
    std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| AppError::internal(format!("failed to set audit dir permissions: {e}")))?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<(), AppError> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::internal(format!("failed to create audit dir: {e}")))
}
