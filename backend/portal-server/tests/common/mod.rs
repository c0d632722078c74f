#![allow(dead_code)]

//! Test infrastructure for portal-server API tests

use portal_server::AppState;
use portal_supervisor::{
    ProcessSpec, RestartPolicy, ServiceManager, SupervisorPolicy, UnitDescriptor, UnitKind,
};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Policy with every wait shortened; the background monitor stays off.
pub fn fast_policy() -> SupervisorPolicy {
    SupervisorPolicy {
        monitor_enabled: false,
        monitor_interval: Duration::from_millis(50),
        monitor_join_timeout: Duration::from_secs(2),
        liveness_timeout: Duration::from_secs(1),
        status_timeout: Duration::from_secs(2),
        health_timeout: Duration::from_secs(2),
        startup_timeout: Duration::from_secs(10),
        readiness_poll: Duration::from_millis(50),
        port_check_timeout: Duration::from_millis(200),
        stop_grace: Duration::from_secs(5),
        launch_settle: Duration::ZERO,
        restart: RestartPolicy {
            max_restart_attempts: 3,
            cooldown: Duration::ZERO,
            max_health_check_failures: 1,
            pause: Duration::ZERO,
        },
        ..SupervisorPolicy::default()
    }
}

pub fn in_process(name: &str, check_url: &str) -> UnitDescriptor {
    UnitDescriptor::new(
        name,
        name.to_uppercase(),
        UnitKind::InProcess {
            route: format!("/{name}"),
        },
        check_url,
    )
}

pub fn out_of_process(name: &str, port: u16, command: &[&str]) -> UnitDescriptor {
    UnitDescriptor::new(
        name,
        name.to_uppercase(),
        UnitKind::OutOfProcess(ProcessSpec {
            port,
            command: command.iter().map(|s| s.to_string()).collect(),
            working_dir: None,
            env: Default::default(),
        }),
        format!("http://127.0.0.1:{port}/"),
    )
}

/// A second portal-server, run as an out-of-process unit on `port`.
///
/// It gets its own config dir, no units of its own and no monitor.
pub fn child_portal(name: &str, port: u16, config_dir: &Path) -> UnitDescriptor {
    let env = BTreeMap::from([
        (
            "PORTAL_CONFIG_DIR".to_string(),
            config_dir.display().to_string(),
        ),
        ("PORTAL_SERVER_HOST".to_string(), "127.0.0.1".to_string()),
        ("PORTAL_SERVER_PORT".to_string(), port.to_string()),
        ("PORTAL_MONITOR_ENABLED".to_string(), "false".to_string()),
        ("PORTAL_LOG_LEVEL".to_string(), "warn".to_string()),
        ("PORTAL_LOG_COLORED".to_string(), "false".to_string()),
    ]);

    UnitDescriptor::new(
        name,
        name.to_uppercase(),
        UnitKind::OutOfProcess(ProcessSpec {
            port,
            command: vec![env!("CARGO_BIN_EXE_portal-server").to_string()],
            working_dir: Some(config_dir.to_path_buf()),
            env,
        }),
        format!("http://127.0.0.1:{port}/live"),
    )
}

pub fn create_test_app_state(units: Vec<UnitDescriptor>) -> AppState {
    let manager = ServiceManager::new(units, fast_policy()).unwrap();
    AppState::new(Arc::new(manager))
}

/// A port nothing listens on.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Mock collaborator answering every GET with `code`.
pub async fn collaborator(code: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(code))
        .mount(&server)
        .await;
    server
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

/// Send one request through the router and decode the JSON body.
pub async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    (status, json)
}
