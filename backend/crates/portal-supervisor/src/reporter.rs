//! Concurrent fan-out of health probes across every unit.

use crate::{
    HealthStatus, OverallStatus, ProbeOutcome, Prober, Registry, SupervisorErrorResult,
    UnitSnapshot,
};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error};
use serde::Serialize;
use tokio::sync::Semaphore;

const NOTE_SERVING_NOT_STARTED: &str = "serving but not started";
const NOTE_NOT_STARTED: &str = "not started";

/// Health of one unit as reported by `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct UnitHealth {
    pub name: String,
    pub display_name: String,
    pub status: HealthStatus,
    pub url: String,
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthSummary {
    pub total: usize,
    pub healthy: usize,
    pub degraded: usize,
    pub unhealthy: usize,
    pub down: usize,
    pub timeout: usize,
    pub error: usize,
    pub stopped: usize,
}

impl HealthSummary {
    fn count(&mut self, status: HealthStatus) {
        self.total += 1;
        match status {
            HealthStatus::Healthy => self.healthy += 1,
            HealthStatus::Degraded => self.degraded += 1,
            HealthStatus::Unhealthy => self.unhealthy += 1,
            HealthStatus::Down => self.down += 1,
            HealthStatus::Timeout => self.timeout += 1,
            HealthStatus::Error => self.error += 1,
            HealthStatus::Stopped => self.stopped += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub overall_status: OverallStatus,
    pub checked_at: DateTime<Utc>,
    pub services: BTreeMap<String, UnitHealth>,
    pub summary: HealthSummary,
}

/// Probes every unit through a bounded worker pool.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    prober: Prober,
    timeout: Duration,
    workers: usize,
}

impl HealthReporter {
    pub fn new(prober: Prober, timeout: Duration, workers: usize) -> Self {
        Self {
            prober,
            timeout,
            workers: workers.max(1),
        }
    }

    pub async fn check_all(&self, registry: &Registry) -> HealthReport {
        let units = registry.snapshots().await;
        let semaphore = Arc::new(Semaphore::new(self.workers));

        let tasks: Vec<_> = units
            .iter()
            .map(|unit| {
                let prober = self.prober.clone();
                let semaphore = semaphore.clone();
                let url = unit.check_url.clone();
                let timeout = self.timeout;
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await;
                    prober.probe(&url, timeout).await
                })
            })
            .collect();

        let mut services = BTreeMap::new();
        for (unit, task) in units.iter().zip(tasks) {
            let outcome = task.await.unwrap_or_else(|e| {
                error!("Health probe task for {} failed: {e}", unit.name);
                ProbeOutcome {
                    status: HealthStatus::Error,
                    response_time_ms: 0,
                    http_status: None,
                    error_detail: Some(format!("probe task failed: {e}")),
                }
            });
            let health = Self::classify(unit, outcome);
            services.insert(unit.name.clone(), health);
        }

        Self::build_report(services)
    }

    pub async fn check_one(&self, registry: &Registry, name: &str) -> SupervisorErrorResult<UnitHealth> {
        let unit = registry.snapshot(name).await?;
        let outcome = self.prober.probe(&unit.check_url, self.timeout).await;
        Ok(Self::classify(&unit, outcome))
    }

    /// Apply the not-started rules on top of the raw probe outcome.
    fn classify(unit: &UnitSnapshot, outcome: ProbeOutcome) -> UnitHealth {
        let (status, note) = match (unit.state.started, outcome.status) {
            (false, HealthStatus::Healthy) => {
                (HealthStatus::Stopped, Some(NOTE_SERVING_NOT_STARTED.to_string()))
            }
            (false, HealthStatus::Down) => {
                (HealthStatus::Stopped, Some(NOTE_NOT_STARTED.to_string()))
            }
            (_, status) => (status, None),
        };

        debug!("{} health: {status:?} in {}ms", unit.name, outcome.response_time_ms);

        UnitHealth {
            name: unit.name.clone(),
            display_name: unit.display_name.clone(),
            status,
            url: unit.check_url.clone(),
            started: unit.state.started,
            response_time_ms: Some(outcome.response_time_ms),
            http_status: outcome.http_status,
            error: outcome.error_detail,
            note,
        }
    }

    pub fn build_report(services: BTreeMap<String, UnitHealth>) -> HealthReport {
        let mut summary = HealthSummary::default();
        for health in services.values() {
            summary.count(health.status);
        }

        HealthReport {
            overall_status: OverallStatus::fold(services.values().map(|h| h.status)),
            checked_at: Utc::now(),
            services,
            summary,
        }
    }
}
