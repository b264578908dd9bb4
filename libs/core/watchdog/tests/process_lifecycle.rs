// [libs/core/watchdog/tests/process_lifecycle.rs]
use aegis_core_watchdog::{ProcessConfig, Supervised};
use aegis_domain_models::backend::BackendState;
use std::time::Duration;

fn sleep_config(name: &str) -> ProcessConfig {
    let mut config = ProcessConfig::new(name, "/bin/sleep", 0);
    config.health_path = None; // no HTTP health endpoint: liveness alone governs
    config.args = vec!["5".to_string()];
    config.graceful_timeout = Duration::from_millis(500);
    config
}

#[tokio::test]
async fn start_transitions_to_starting_and_stop_to_stopped() {
    let supervised = Supervised::new(sleep_config("sleeper"), None);

    supervised.start().await.expect("spawn should succeed");
    let status = supervised.status().await;
    assert_eq!(status.state, BackendState::Starting);

    supervised.stop().await.expect("stop should succeed");
    let status = supervised.status().await;
    assert_eq!(status.state, BackendState::Stopped);
}

#[tokio::test]
async fn status_reports_restart_count_after_start() {
    let supervised = Supervised::new(sleep_config("sleeper2"), None);
    supervised.start().await.unwrap();
    let status = supervised.status().await;
    assert_eq!(status.restart_count, 1);
    supervised.stop().await.unwrap();
}
