// [libs/core/degradation/tests/hysteresis.rs]
use aegis_core_degradation::TransitionState;
use aegis_domain_models::level::DegradationLevel;
use std::time::{Duration, Instant};

#[test]
fn upgrades_apply_immediately() {
    let t0 = Instant::now();
    let mut state = TransitionState::new(t0);
    let recovery_delay = Duration::from_secs(30);

    let changed = state.observe(DegradationLevel::Reduced, recovery_delay, t0);
    assert_eq!(changed, Some(DegradationLevel::Reduced));
    assert_eq!(state.current(), DegradationLevel::Reduced);
}

#[test]
fn downgrade_before_recovery_delay_is_suppressed() {
    let t0 = Instant::now();
    let mut state = TransitionState::new(t0);
    let recovery_delay = Duration::from_secs(30);

    state.observe(DegradationLevel::Minimal, recovery_delay, t0);
    assert_eq!(state.current(), DegradationLevel::Minimal);

    // Oscillate back toward Normal well before the recovery delay elapses.
    let too_soon = t0 + Duration::from_secs(5);
    let changed = state.observe(DegradationLevel::Normal, recovery_delay, too_soon);
    assert_eq!(changed, None, "downgrade must be suppressed inside the recovery window");
    assert_eq!(state.current(), DegradationLevel::Minimal);
}

#[test]
fn downgrade_after_recovery_delay_applies() {
    let t0 = Instant::now();
    let mut state = TransitionState::new(t0);
    let recovery_delay = Duration::from_secs(30);

    state.observe(DegradationLevel::Minimal, recovery_delay, t0);

    let late_enough = t0 + Duration::from_secs(31);
    let changed = state.observe(DegradationLevel::Normal, recovery_delay, late_enough);
    assert_eq!(changed, Some(DegradationLevel::Normal));
    assert_eq!(state.current(), DegradationLevel::Normal);
}

#[test]
fn rapid_oscillation_across_boundary_never_recovers_early() {
    // Property 11: oscillate memory across the 70% boundary faster than
    // RecoveryDelay — the observed sequence must not recover to Normal
    // until at least RecoveryDelay has elapsed since the last change.
    let t0 = Instant::now();
    let mut state = TransitionState::new(t0);
    let recovery_delay = Duration::from_secs(30);

    // Bounce between Reduced and Normal every 3s, far faster than the 30s
    // recovery delay. The immediate-upgrade rule fires once at i=0; every
    // subsequent Normal attempt is a downgrade and must be suppressed.
    for i in 0..10u64 {
        let now = t0 + Duration::from_secs(i * 3);
        let target = if i % 2 == 0 { DegradationLevel::Reduced } else { DegradationLevel::Normal };
        state.observe(target, recovery_delay, now);
        assert_ne!(state.current(), DegradationLevel::Normal, "recovered to Normal before the recovery delay elapsed (i={i})");
    }

    // Once the delay has genuinely elapsed since the last real transition,
    // a downgrade request is finally honored.
    let late_enough = t0 + Duration::from_secs(27 + 31);
    let changed = state.observe(DegradationLevel::Normal, recovery_delay, late_enough);
    assert_eq!(changed, Some(DegradationLevel::Normal));
}
