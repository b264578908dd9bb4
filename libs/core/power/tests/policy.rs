// [libs/core/power/tests/policy.rs]
use aegis_core_power::policy::{self, PowerPolicyConfig};
use aegis_domain_models::power::{BatteryLevel, PowerSnapshot, PowerState};

fn snapshot(state: PowerState, battery_percent: u8, charging: bool) -> PowerSnapshot {
    PowerSnapshot {
        state,
        battery_percent,
        charging,
        estimated_minutes_remaining: None,
        temperature_celsius: None,
        level: BatteryLevel::from_percent(battery_percent),
    }
}

#[test]
fn should_shutdown_only_on_battery_discharging_below_critical() {
    let config = PowerPolicyConfig { critical_shutdown_percent: 5 };

    assert!(policy::should_shutdown(&snapshot(PowerState::Battery, 3, false), &config));
    assert!(!policy::should_shutdown(&snapshot(PowerState::Battery, 3, true), &config), "charging must not trigger shutdown");
    assert!(!policy::should_shutdown(&snapshot(PowerState::Battery, 50, false), &config), "above threshold must not trigger shutdown");
    assert!(!policy::should_shutdown(&snapshot(PowerState::Ac, 3, false), &config), "on AC must never trigger shutdown");
}

#[test]
fn max_concurrent_is_unconstrained_on_ac() {
    let snap = snapshot(PowerState::Ac, 20, false);
    assert_eq!(policy::max_concurrent(&snap), usize::MAX);
    assert_eq!(policy::max_context(&snap), u32::MAX);
}

#[test]
fn max_concurrent_tightens_as_battery_drains() {
    let critical = snapshot(PowerState::Battery, 5, false);
    let low = snapshot(PowerState::Battery, 20, false);
    let good = snapshot(PowerState::Battery, 60, false);

    assert!(policy::max_concurrent(&critical) < policy::max_concurrent(&low));
    assert!(policy::max_concurrent(&low) < policy::max_concurrent(&good));
}

#[test]
fn embeddings_disabled_under_low_or_critical_battery() {
    assert!(!policy::should_enable_embeddings(&snapshot(PowerState::Battery, 5, false)));
    assert!(!policy::should_enable_embeddings(&snapshot(PowerState::Battery, 20, false)));
    assert!(policy::should_enable_embeddings(&snapshot(PowerState::Battery, 60, false)));
    assert!(policy::should_enable_embeddings(&snapshot(PowerState::Ac, 5, false)));
}
