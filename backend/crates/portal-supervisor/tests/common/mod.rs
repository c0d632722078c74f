#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use portal_supervisor::{
    ProcessSpec, RestartPolicy, ServiceManager, SupervisorPolicy, UnitDescriptor, UnitKind,
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Policy with every wait shortened so tests finish in well under a second.
pub fn fast_policy() -> SupervisorPolicy {
    SupervisorPolicy {
        monitor_interval: Duration::from_millis(50),
        monitor_join_timeout: Duration::from_secs(2),
        liveness_timeout: Duration::from_secs(1),
        status_timeout: Duration::from_secs(1),
        health_timeout: Duration::from_secs(2),
        startup_timeout: Duration::from_secs(5),
        readiness_poll: Duration::from_millis(50),
        port_check_timeout: Duration::from_millis(200),
        stop_grace: Duration::from_secs(2),
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

pub fn manager(units: Vec<UnitDescriptor>, policy: SupervisorPolicy) -> Arc<ServiceManager> {
    Arc::new(ServiceManager::new(units, policy).unwrap())
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

/// Python one-liner serving `code` for every GET on `127.0.0.1:port`.
pub fn http_listener_script(port: u16, code: u16) -> String {
    format!(
        "import http.server\n\
         class H(http.server.BaseHTTPRequestHandler):\n    \
             def do_GET(self):\n        \
                 self.send_response({code})\n        \
                 self.end_headers()\n    \
             def log_message(self, *args):\n        \
                 pass\n\
         http.server.HTTPServer((\"127.0.0.1\", {port}), H).serve_forever()\n"
    )
}

/// argv of a wrapper shell that backgrounds the listener and waits on it.
pub fn wrapped_listener(port: u16, code: u16) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("python3 -c '{}' & wait", http_listener_script(port, code)),
    ]
}

pub async fn wait_for_port(port: u16, open: bool) -> bool {
    for _ in 0..100 {
        if portal_supervisor::is_port_open(port, Duration::from_millis(100)).await == open {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
