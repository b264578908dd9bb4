// [libs/core/queue/src/admission.rs]
//! Live signals the admission check consults (§4.5: "reject if Emergency,
//! or if queue is full, or if estimated free memory < threshold").

use aegis_domain_models::level::DegradationLevel;

pub trait AdmissionContext: Send + Sync {
    fn current_level(&self) -> DegradationLevel;
    fn available_memory_mb(&self) -> u64;
}

/// Always reports Normal / unconstrained memory — used in tests and before
/// the Degradation/Resource managers are wired up.
pub struct AlwaysAdmit;

impl AdmissionContext for AlwaysAdmit {
    fn current_level(&self) -> DegradationLevel {
        DegradationLevel::Normal
    }
    fn available_memory_mb(&self) -> u64 {
        u64::MAX
    }
}
