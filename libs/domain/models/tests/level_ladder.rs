// [libs/domain/models/tests/level_ladder.rs]
use aegis_domain_models::prelude::*;

#[test]
fn classifies_normal_below_all_triggers() {
    assert_eq!(DegradationLevel::classify(10.0, 0), DegradationLevel::Normal);
}

#[test]
fn classifies_reduced_at_seventy_percent() {
    assert_eq!(DegradationLevel::classify(70.0, 0), DegradationLevel::Reduced);
    assert_eq!(DegradationLevel::classify(0.0, 10), DegradationLevel::Reduced);
}

#[test]
fn classifies_emergency_at_ninety_five_percent() {
    assert_eq!(DegradationLevel::classify(96.0, 0), DegradationLevel::Emergency);
    assert_eq!(DegradationLevel::classify(0.0, 50), DegradationLevel::Emergency);
}

#[test]
fn emergency_rejects_new_work() {
    assert!(DegradationLevel::Emergency.policy().reject_new);
    assert!(!DegradationLevel::Minimal.policy().reject_new);
}

#[test]
fn priority_orders_high_before_low() {
    let mut ps = vec![Priority::Low, Priority::High, Priority::Normal];
    ps.sort();
    assert_eq!(ps, vec![Priority::High, Priority::Normal, Priority::Low]);
}

#[test]
fn battery_bucket_thresholds() {
    assert_eq!(BatteryLevel::from_percent(5), BatteryLevel::Critical);
    assert_eq!(BatteryLevel::from_percent(20), BatteryLevel::Low);
    assert_eq!(BatteryLevel::from_percent(50), BatteryLevel::Good);
    assert_eq!(BatteryLevel::from_percent(95), BatteryLevel::Full);
}
