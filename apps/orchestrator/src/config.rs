// [apps/orchestrator/src/config.rs]
//! Environment-variable driven configuration, read the way the teacher reads
//! `PORT`/`DATABASE_URL`: `env::var(..).unwrap_or_else(..)` chains, no config
//! file crate. `.env` is loaded once via `dotenvy` in `main.rs` before any of
//! these are read.

use std::path::PathBuf;
use std::time::Duration;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub models_dir: PathBuf,
    pub data_dir: PathBuf,
    pub bind_port: u16,
    pub backend_port_range: (u16, u16),
    pub backend_command: String,

    pub queue_max_concurrent: usize,
    pub queue_max_size: usize,
    pub queue_memory_threshold_mb: u64,
    pub queue_timeout: Duration,

    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub cache_cleanup_interval: Duration,

    pub degradation_tick_interval: Duration,
    pub degradation_recovery_delay: Duration,

    pub power_poll_interval: Duration,

    pub audit_max_file_size_bytes: u64,
}

impl OrchestratorConfig {
    /// Builds config from the process environment. Defaults follow the
    /// platform's user-data convention (`~/.local/share/aegis` on Unix) per
    /// §6 "Environment overrides".
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env_or("AEGIS_DATA_DIR", &default_data_dir()));
        let models_dir = PathBuf::from(env_or(
            "AEGIS_MODELS_DIR",
            &data_dir.join("models").to_string_lossy(),
        ));

        let port_low: u16 = env_parse("AEGIS_BACKEND_PORT_MIN", 42382);
        let port_high: u16 = env_parse("AEGIS_BACKEND_PORT_MAX", 42391);

        Self {
            models_dir,
            data_dir,
            bind_port: env_parse("AEGIS_BIND_PORT", 8080),
            backend_port_range: (port_low, port_high),
            backend_command: env_or("AEGIS_BACKEND_COMMAND", "llama-server"),

            queue_max_concurrent: env_parse("AEGIS_QUEUE_MAX_CONCURRENT", 10),
            queue_max_size: env_parse("AEGIS_QUEUE_MAX_SIZE", 256),
            queue_memory_threshold_mb: env_parse("AEGIS_QUEUE_MEMORY_THRESHOLD_MB", 512),
            queue_timeout: Duration::from_secs(env_parse("AEGIS_QUEUE_TIMEOUT_SECS", 120)),

            cache_capacity: env_parse("AEGIS_CACHE_CAPACITY", 1000),
            cache_ttl: Duration::from_secs(env_parse("AEGIS_CACHE_TTL_SECS", 3600)),
            cache_cleanup_interval: Duration::from_secs(env_parse("AEGIS_CACHE_CLEANUP_SECS", 15 * 60)),

            degradation_tick_interval: Duration::from_secs(env_parse("AEGIS_DEGRADATION_TICK_SECS", 5)),
            degradation_recovery_delay: Duration::from_secs(env_parse("AEGIS_DEGRADATION_RECOVERY_SECS", 30)),

            power_poll_interval: Duration::from_secs(env_parse("AEGIS_POWER_POLL_SECS", 30)),

            audit_max_file_size_bytes: env_parse("AEGIS_AUDIT_MAX_FILE_SIZE_BYTES", 50 * 1024 * 1024),
        }
    }

    pub fn audit_dir(&self) -> PathBuf {
        self.data_dir.join("audit")
    }

    pub fn hash_store_path(&self) -> PathBuf {
        self.data_dir.join("known_hashes.json")
    }
}

#[cfg(unix)]
fn default_data_dir() -> String {
    std::env::var("HOME")
        .map(|home| format!("{home}/.local/share/aegis"))
        .unwrap_or_else(|_| "/tmp/aegis".to_string())
}

#[cfg(not(unix))]
fn default_data_dir() -> String {
    "./aegis-data".to_string()
}
