// [libs/core/power/src/lib.rs]
//! Power Manager (C4): polls host battery/AC posture and exposes policy caps
//! the Orchestrator combines with the Degradation Manager's via minimum.

pub mod manager;
pub mod policy;
pub mod probe;

pub use manager::{PowerConfig, PowerHandle, PowerManager};
pub use policy::PowerPolicyConfig;
pub use probe::{PowerSource, SysfsPowerSource};
