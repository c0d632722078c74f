//! Single bounded HTTP probes against unit check URLs.

use crate::{HealthStatus, SupervisorErrorResult};

use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

/// Redirect hops the prober follows before giving up.
const MAX_REDIRECTS: usize = 10;

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub status: HealthStatus,
    pub response_time_ms: u64,
    /// HTTP status code, when a response arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

/// HTTP prober. Cheap to clone; clones share one connection pool.
///
/// No retries: every call is exactly one GET.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new() -> SupervisorErrorResult<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .pool_max_idle_per_host(1)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` once and classify the outcome.
    pub async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        let start = Instant::now();
        let result = self.client.get(url).timeout(timeout).send().await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let code = resp.status().as_u16();
                let status = HealthStatus::from_http_status(code);
                ProbeOutcome {
                    status,
                    response_time_ms,
                    http_status: Some(code),
                    error_detail: (status != HealthStatus::Healthy).then(|| format!("HTTP {code}")),
                }
            }
            Err(e) => {
                let status = if e.is_timeout() {
                    HealthStatus::Timeout
                } else if e.is_connect() {
                    HealthStatus::Down
                } else {
                    HealthStatus::Error
                };
                debug!("Probe {url} failed ({status:?}): {e}");
                ProbeOutcome {
                    status,
                    response_time_ms,
                    http_status: None,
                    error_detail: Some(e.to_string()),
                }
            }
        }
    }

    /// Lightweight liveness check: any response below 500 counts as alive.
    pub async fn is_alive(&self, url: &str, timeout: Duration) -> bool {
        match self.client.get(url).timeout(timeout).send().await {
            Ok(resp) => resp.status().as_u16() < 500,
            Err(e) => {
                debug!("Liveness check {url} failed: {e}");
                false
            }
        }
    }
}
