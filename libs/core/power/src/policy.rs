// [libs/core/power/src/policy.rs]
//! Derived policy caps from a power snapshot (§4.6). The Orchestrator
//! combines these with the Degradation Manager's caps by taking the minimum
//! of each, so "unconstrained" here is the type's max value, never a
//! sentinel the caller has to special-case.

use aegis_domain_models::power::{BatteryLevel, PowerSnapshot, PowerState};

#[derive(Debug, Clone, Copy)]
pub struct PowerPolicyConfig {
    /// Below this battery percent, on battery and not charging, shutdown is
    /// recommended.
    pub critical_shutdown_percent: u8,
}

impl Default for PowerPolicyConfig {
    fn default() -> Self {
        Self { critical_shutdown_percent: 5 }
    }
}

pub fn should_shutdown(snapshot: &PowerSnapshot, config: &PowerPolicyConfig) -> bool {
    snapshot.state == PowerState::Battery
        && !snapshot.charging
        && snapshot.battery_percent < config.critical_shutdown_percent
}

pub fn max_concurrent(snapshot: &PowerSnapshot) -> usize {
    if snapshot.state != PowerState::Battery {
        return usize::MAX;
    }
    match snapshot.level {
        BatteryLevel::Full | BatteryLevel::Good => usize::MAX,
        BatteryLevel::Low => 4,
        BatteryLevel::Critical => 1,
    }
}

pub fn max_context(snapshot: &PowerSnapshot) -> u32 {
    if snapshot.state != PowerState::Battery {
        return u32::MAX;
    }
    match snapshot.level {
        BatteryLevel::Full | BatteryLevel::Good => u32::MAX,
        BatteryLevel::Low => 4096,
        BatteryLevel::Critical => 1024,
    }
}

pub fn should_enable_embeddings(snapshot: &PowerSnapshot) -> bool {
    !(snapshot.state == PowerState::Battery
        && matches!(snapshot.level, BatteryLevel::Low | BatteryLevel::Critical))
}
