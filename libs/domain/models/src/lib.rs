// [libs/domain/models/src/lib.rs]
//! Shared DTOs, error taxonomy, and domain enums for the Aegis local
//! inference orchestrator (§3 Data Model of the design).

pub mod audit;
pub mod backend;
pub mod error;
pub mod level;
pub mod model;
pub mod power;
pub mod priority;
pub mod snapshot;

pub mod prelude {
    pub use crate::audit::{AuditEvent, AuditKind, Severity, GENESIS_HASH};
    pub use crate::backend::{BackendStatus, BackendState};
    pub use crate::error::{AppError, AppResult, ErrorKind};
    pub use crate::level::{DegradationLevel, LevelPolicy};
    pub use crate::model::ModelDescriptor;
    pub use crate::power::{BatteryLevel, PowerSnapshot, PowerState};
    pub use crate::priority::Priority;
    pub use crate::snapshot::{DegradationSnapshot, GpuReading, ResourceSnapshot};
}
