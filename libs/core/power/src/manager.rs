// [libs/core/power/src/manager.rs]
//! Power Manager (C4): polls the host power posture on a fixed interval and
//! publishes changes, mirroring the Degradation Manager's ticker/watch shape.

use aegis_domain_models::power::PowerSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::policy::{self, PowerPolicyConfig};
use crate::probe::PowerSource;

#[derive(Debug, Clone, Copy)]
pub struct PowerConfig {
    pub poll_interval: Duration,
    pub policy: PowerPolicyConfig,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(30), policy: PowerPolicyConfig::default() }
    }
}

pub struct PowerManager {
    config: PowerConfig,
    snapshot_tx: watch::Sender<PowerSnapshot>,
}

pub struct PowerHandle {
    pub snapshots: watch::Receiver<PowerSnapshot>,
    join: JoinHandle<()>,
}

impl PowerHandle {
    pub fn abort(&self) {
        self.join.abort();
    }
}

impl PowerManager {
    pub fn new(config: PowerConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(PowerSnapshot::unknown());
        Self { config, snapshot_tx }
    }

    pub fn current(&self) -> PowerSnapshot {
        *self.snapshot_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PowerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn should_shutdown(&self) -> bool {
        policy::should_shutdown(&self.current(), &self.config.policy)
    }

    pub fn max_concurrent(&self) -> usize {
        policy::max_concurrent(&self.current())
    }

    pub fn max_context(&self) -> u32 {
        policy::max_context(&self.current())
    }

    pub fn should_enable_embeddings(&self) -> bool {
        policy::should_enable_embeddings(&self.current())
    }

    pub fn start(self: Arc<Self>, source: Arc<dyn PowerSource>) -> PowerHandle {
        let snapshots = self.snapshot_tx.subscribe();
        let manager = Arc::clone(&self);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.config.poll_interval);
            loop {
                ticker.tick().await;
                let snapshot = source.read();
                if snapshot != manager.current() {
                    tracing::info!(target: "power_manager", ?snapshot, "power posture changed");
                    let _ = manager.snapshot_tx.send(snapshot);
                }
            }
        });

        PowerHandle { snapshots, join }
    }
}
