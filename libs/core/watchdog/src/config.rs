// [libs/core/watchdog/src/config.rs]
//! Per-process watchdog configuration (§4.4). Defaults bias toward
//! edge-device safety: long timeouts, capped restarts.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub port: u16,
    pub health_path: Option<String>,
    pub health_timeout: Duration,
    pub check_interval: Duration,
    pub restart_delay: Duration,
    pub max_restarts_per_window: u32,
    pub restart_window: Duration,
    pub graceful_timeout: Duration,
}

impl ProcessConfig {
    pub fn new(name: impl Into<String>, command: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            port,
            health_path: Some("/health".to_string()),
            health_timeout: Duration::from_secs(5),
            check_interval: Duration::from_secs(10),
            restart_delay: Duration::from_secs(5),
            max_restarts_per_window: 5,
            restart_window: Duration::from_secs(5 * 60),
            graceful_timeout: Duration::from_secs(15),
        }
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn health_url(&self) -> Option<String> {
        self.health_path.as_ref().map(|path| format!("http://127.0.0.1:{}{}", self.port, path))
    }
}
