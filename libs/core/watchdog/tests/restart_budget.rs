// [libs/core/watchdog/tests/restart_budget.rs]
use aegis_core_watchdog::RestartBudget;
use std::time::{Duration, Instant};

#[test]
fn restarts_outside_the_window_do_not_count_toward_budget() {
    let mut budget = RestartBudget::new();
    let t0 = Instant::now();
    let window = Duration::from_secs(60);

    budget.record_restart(t0);
    let later = t0 + Duration::from_secs(120);
    assert_eq!(budget.restarts_in_window(window, later), 0);
}

#[test]
fn timestamp_list_monotonically_grows_even_past_budget_exhaustion() {
    let mut budget = RestartBudget::new();
    let t0 = Instant::now();
    for i in 0..10 {
        budget.record_restart(t0 + Duration::from_secs(i));
    }
    assert_eq!(budget.restart_count(), 10);
}

#[test]
fn is_over_budget_once_max_restarts_reached_within_window() {
    let mut budget = RestartBudget::new();
    let t0 = Instant::now();
    let window = Duration::from_secs(300);

    for i in 0..5 {
        budget.record_restart(t0 + Duration::from_secs(i));
    }

    let now = t0 + Duration::from_secs(5);
    assert!(budget.is_over_budget(5, window, now));
    assert!(!budget.is_over_budget(6, window, now));
}
