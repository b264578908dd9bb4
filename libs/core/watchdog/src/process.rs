// [libs/core/watchdog/src/process.rs]
//! Per-process supervisor: the Watchdog state machine (§4.4).
//!
//! ```text
//! Stopped ──start──▶ Starting ──health_ok──▶ Running
//!    ▲                                           │
//!    │                                           ▼
//!    └──stopped◀── (any) ──kill/wait── Unhealthy or Failed
//!                       │
//!                       └─ restart_budget_exhausted ──▶ Failed (terminal)
//! ```

use aegis_domain_models::backend::{BackendState, BackendStatus};
use aegis_domain_models::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use tokio::process::{Child, Command};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use crate::config::ProcessConfig;
use crate::restart_budget::RestartBudget;

/// Invoked off the supervisor's critical path on every state transition.
pub type TransitionCallback = Arc<dyn Fn(&str, BackendState) + Send + Sync>;

struct MutableState {
    state: BackendState,
    child: Option<Child>,
    budget: RestartBudget,
    last_health_at: Option<String>,
    last_error: Option<String>,
}

pub struct Supervised {
    config: ProcessConfig,
    http: reqwest::Client,
    inner: AsyncMutex<MutableState>,
    on_transition: Option<TransitionCallback>,
}

impl Supervised {
    pub fn new(config: ProcessConfig, on_transition: Option<TransitionCallback>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            inner: AsyncMutex::new(MutableState {
                state: BackendState::Stopped,
                child: None,
                budget: RestartBudget::new(),
                last_health_at: None,
                last_error: None,
            }),
            on_transition,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub async fn status(&self) -> BackendStatus {
        let inner = self.inner.lock().await;
        BackendStatus {
            model_id: self.config.name.clone(),
            port: self.config.port,
            state: inner.state,
            last_health_at: inner.last_health_at.clone(),
            restart_count: inner.budget.restart_count(),
            last_error: inner.last_error.clone(),
        }
    }

    fn emit_transition(&self, state: BackendState) {
        if let Some(callback) = self.on_transition.clone() {
            let name = self.config.name.clone();
            tokio::spawn(async move {
                callback(&name, state);
            });
        }
    }

    async fn set_state(&self, inner: &mut MutableState, state: BackendState) {
        if inner.state != state {
            tracing::info!(target: "watchdog", backend = %self.config.name, ?state, "backend state transition");
            inner.state = state;
            self.emit_transition(state);
        }
    }

    /// Spawns the child, records a restart timestamp, and transitions to
    /// `Starting`. A no-op if the backend is already running.
    pub async fn start(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, BackendState::Starting | BackendState::Running) {
            return Ok(());
        }

        let child = Command::new(&self.config.command)
            .args(&self.config.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::internal(format!("failed to spawn backend {}: {e}", self.config.name)))?;

        inner.child = Some(child);
        inner.budget.record_restart(Instant::now());
        inner.last_error = None;
        self.set_state(&mut inner, BackendState::Starting).await;
        Ok(())
    }

    /// One liveness + health cycle (§4.4 step 3). Transitions to Running,
    /// Unhealthy, or — if the restart budget is exhausted — Failed.
    async fn check_once(&self) {
        let mut inner = self.inner.lock().await;

        if matches!(inner.state, BackendState::Stopped | BackendState::Failed) {
            return;
        }

        let exited = match inner.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => true,
        };

        let healthy = if exited {
            false
        } else {
            self.probe_health().await
        };

        if healthy {
            inner.last_health_at = Some(chrono::Utc::now().to_rfc3339());
            self.set_state(&mut inner, BackendState::Running).await;
            return;
        }

        if exited {
            inner.last_error = Some(format!("{} exited unexpectedly", self.config.name));
        } else {
            inner.last_error = Some(format!("{} failed its health check", self.config.name));
        }

        let now = Instant::now();
        if inner.budget.is_over_budget(self.config.max_restarts_per_window, self.config.restart_window, now) {
            self.set_state(&mut inner, BackendState::Failed).await;
            return;
        }

        self.set_state(&mut inner, BackendState::Unhealthy).await;
        drop(inner);

        tokio::time::sleep(self.config.restart_delay).await;
        let _ = self.start().await;
    }

    async fn probe_health(&self) -> bool {
        let Some(url) = self.config.health_url() else {
            return true; // no health URL configured: liveness alone is sufficient
        };

        match tokio::time::timeout(self.config.health_timeout, self.http.get(&url).send()).await {
            Ok(Ok(response)) => response.status().is_success(),
            _ => false,
        }
    }

    /// Graceful-then-forceful stop (§4.4 step 5).
    pub async fn stop(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        let Some(mut child) = inner.child.take() else {
            self.set_state(&mut inner, BackendState::Stopped).await;
            return Ok(());
        };

        #[cfg(unix)]
        {
            if let Some(pid) = child.id() {
                unsafe {
                    libc::kill(pid as i32, libc::SIGTERM);
                }
            }
        }

        let waited = tokio::time::timeout(self.config.graceful_timeout, child.wait()).await;
        if waited.is_err() {
            let _ = child.kill().await;
            let _ = child.wait().await;
        }

        self.set_state(&mut inner, BackendState::Stopped).await;
        Ok(())
    }

    /// External manual restart after `Failed` (§4.4 invariant: terminal
    /// until an external `Restart` call).
    pub async fn restart(&self) -> Result<(), AppError> {
        self.stop().await?;
        self.start().await
    }
}

/// Spawns the background tick loop driving `check_once` at `check_interval`.
pub fn spawn_supervisor_loop(process: Arc<Supervised>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(process.config.check_interval);
        loop {
            ticker.tick().await;
            process.check_once().await;
        }
    })
}

