mod common;

use common::{
    base_url, collaborator, fast_policy, free_port, http_listener_script, in_process, manager,
    out_of_process,
};

use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::{eq, ge};
use portal_supervisor::ShutdownCoordinator;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// =========================================================================
// Restart triggering
// =========================================================================

#[tokio::test]
async fn given_failing_unit_when_cycles_run_then_restart_count_saturates_at_ceiling() {
    // Given
    let server = collaborator(500).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());
    manager.start("writing").await.unwrap();

    // When
    for _ in 0..6 {
        manager.run_monitor_cycle().await;
    }

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(3));
    assert_that!(snapshot.state.started, eq(true));
    assert!(snapshot.state.last_restart.is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn given_out_of_process_unit_answering_500_when_cycle_then_process_respawned() {
    // Given
    let port = free_port();
    let script = http_listener_script(port, 500);
    let manager = manager(
        vec![out_of_process("alpha", port, &["python3", "-c", script.as_str()])],
        fast_policy(),
    );
    manager.start("alpha").await.unwrap();
    let first_pid = manager.registry().snapshot("alpha").await.unwrap().pid;

    // When
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("alpha").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(1));
    assert_that!(snapshot.state.spawn_count, eq(2));
    assert_that!(snapshot.state.started, eq(true));
    assert_that!(snapshot.state.auto_restart_disabled, eq(false));
    assert_that!(snapshot.state.health_check_failures, eq(0));
    assert!(snapshot.pid.is_some());
    assert_ne!(snapshot.pid, first_pid);

    manager.shutdown().await;
}

#[tokio::test]
async fn given_saturated_unit_when_stats_reset_then_restarts_resume() {
    // Given
    let server = collaborator(500).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());
    manager.start("writing").await.unwrap();
    for _ in 0..4 {
        manager.run_monitor_cycle().await;
    }

    // When
    manager.reset_service_stats("writing").await.unwrap();
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(1));
}

#[tokio::test]
async fn given_recent_restart_when_cycle_inside_cooldown_then_restart_suppressed() {
    // Given
    let server = collaborator(500).await;
    let mut policy = fast_policy();
    policy.restart.cooldown = Duration::from_millis(300);
    let manager = manager(vec![in_process("writing", &base_url(&server))], policy);
    manager.start("writing").await.unwrap();

    // When
    manager.run_monitor_cycle().await;
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(1));
    assert_that!(snapshot.state.health_check_failures, ge(1));
}

#[tokio::test]
async fn given_cooldown_elapsed_when_cycle_then_restart_permitted() {
    // Given
    let server = collaborator(500).await;
    let mut policy = fast_policy();
    policy.restart.cooldown = Duration::from_millis(200);
    let manager = manager(vec![in_process("writing", &base_url(&server))], policy);
    manager.start("writing").await.unwrap();
    manager.run_monitor_cycle().await;
    manager.run_monitor_cycle().await;

    // When
    tokio::time::sleep(Duration::from_millis(300)).await;
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(2));
}

#[tokio::test]
async fn given_stopped_unit_when_cycles_run_then_never_restarted() {
    // Given
    let server = collaborator(500).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());
    manager.start("writing").await.unwrap();
    manager.stop("writing").await.unwrap();

    // When
    for _ in 0..3 {
        manager.run_monitor_cycle().await;
    }

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.restart_count, eq(0));
    assert_that!(snapshot.state.started, eq(false));
    assert_that!(snapshot.state.health_check_failures, eq(0));
    assert!(snapshot.state.last_health_check.is_some());
}

#[tokio::test]
async fn given_never_started_unit_when_cycle_then_failures_stay_zero() {
    // Given
    let server = collaborator(500).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());

    // When
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.health_check_failures, eq(0));
    assert_that!(snapshot.state.restart_count, eq(0));
    assert_that!(snapshot.state.started, eq(false));
}

// =========================================================================
// Failure counter
// =========================================================================

#[tokio::test]
async fn given_one_failure_when_next_probe_succeeds_then_counter_resets() {
    // Given
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let mut policy = fast_policy();
    policy.restart.max_health_check_failures = 3;
    let manager = manager(vec![in_process("writing", &base_url(&server))], policy);
    manager.start("writing").await.unwrap();

    // When
    manager.run_monitor_cycle().await;
    let after_failure = manager
        .registry()
        .snapshot("writing")
        .await
        .unwrap()
        .state.health_check_failures;
    manager.run_monitor_cycle().await;

    // Then
    assert_that!(after_failure, eq(1));
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.health_check_failures, eq(0));
    assert_that!(snapshot.state.restart_count, eq(0));
}

#[tokio::test]
async fn given_client_errors_when_cycle_then_unit_counts_as_alive() {
    // Given
    let server = collaborator(404).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());
    manager.start("writing").await.unwrap();

    // When
    manager.run_monitor_cycle().await;

    // Then
    let snapshot = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(snapshot.state.health_check_failures, eq(0));
    assert_that!(snapshot.state.restart_count, eq(0));
}

#[tokio::test]
async fn given_one_bad_unit_when_cycle_then_other_units_still_checked() {
    // Given
    let bad = collaborator(500).await;
    let good = collaborator(200).await;
    let mut policy = fast_policy();
    policy.restart.max_health_check_failures = 5;
    let manager = manager(
        vec![
            in_process("censor", &base_url(&bad)),
            in_process("writing", &base_url(&good)),
        ],
        policy,
    );
    manager.start("censor").await.unwrap();
    manager.start("writing").await.unwrap();

    // When
    manager.run_monitor_cycle().await;

    // Then
    let censor = manager.registry().snapshot("censor").await.unwrap();
    let writing = manager.registry().snapshot("writing").await.unwrap();
    assert_that!(censor.state.health_check_failures, eq(1));
    assert_that!(writing.state.health_check_failures, eq(0));
    assert!(writing.state.last_health_check.is_some());
}

// =========================================================================
// Monitor task
// =========================================================================

#[tokio::test]
async fn given_spawned_monitor_when_intervals_pass_then_restarts_happen_in_background() {
    // Given
    let server = collaborator(500).await;
    let manager = manager(vec![in_process("writing", &base_url(&server))], fast_policy());
    manager.start("writing").await.unwrap();
    let coordinator = ShutdownCoordinator::new();

    // When
    manager.spawn_monitor(&coordinator).await;
    tokio::time::sleep(Duration::from_millis(600)).await;
    let status = manager.monitoring_status().await;
    manager.shutdown().await;

    // Then
    assert_that!(status.monitoring_active, eq(true));
    assert_that!(status.services["writing"].state.restart_count, eq(3));
    assert_that!(manager.monitoring_status().await.monitoring_active, eq(false));
}

#[tokio::test]
async fn given_disabled_monitor_when_spawn_requested_then_not_active() {
    // Given
    let mut policy = fast_policy();
    policy.monitor_enabled = false;
    let manager = manager(vec![in_process("writing", "http://127.0.0.1:1/")], policy);

    // When
    manager.spawn_monitor(&ShutdownCoordinator::new()).await;

    // Then
    assert_that!(manager.monitoring_status().await.monitoring_active, eq(false));
}

#[tokio::test]
async fn given_external_shutdown_signal_when_triggered_then_monitor_task_ends() {
    // Given
    let manager = manager(vec![in_process("writing", "http://127.0.0.1:1/")], fast_policy());
    let coordinator = ShutdownCoordinator::new();
    manager.spawn_monitor(&coordinator).await;

    // When
    coordinator.shutdown();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Then
    assert_that!(manager.monitoring_status().await.monitoring_active, eq(false));
}

#[tokio::test]
async fn given_monitoring_status_when_read_then_policy_reported() {
    // Given
    let manager = manager(vec![in_process("writing", "http://127.0.0.1:1/")], fast_policy());

    // When
    let status = manager.monitoring_status().await;

    // Then
    assert_that!(status.max_restart_attempts, eq(3));
    assert_that!(status.max_health_check_failures, eq(1));
    assert_that!(status.services.len(), eq(1));
    assert_that!(status.monitoring_active, eq(false));
}
