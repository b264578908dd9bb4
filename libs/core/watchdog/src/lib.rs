// [libs/core/watchdog/src/lib.rs]
//! Watchdog (C7): supervises external inference backend processes —
//! spawn, liveness/health probing, bounded restart, graceful shutdown.

pub mod config;
pub mod port_pool;
pub mod process;
pub mod restart_budget;

pub use config::ProcessConfig;
pub use port_pool::{PoolExhausted, PortPool, DEFAULT_PORT_RANGE};
pub use process::{spawn_supervisor_loop, Supervised, TransitionCallback};
pub use restart_budget::RestartBudget;
