//! Lifecycle controller: start, stop, status and monitor-driven restarts.

use crate::{
    HealthReport, HealthReporter, HealthStatus, Launcher, MonitorHandle, Prober,
    Registry, RestartDecision, ShutdownCoordinator, SupervisorError, SupervisorErrorResult,
    SupervisorMetrics, SupervisorPolicy, UnitDescriptor, UnitHealth, UnitSnapshot,
    UnitStatus, is_port_open,
};

use std::collections::BTreeMap;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use error_location::ErrorLocation;
use futures::future::join_all;
use log::{debug, error, info, warn};
use portal_config::Config;
use serde::Serialize;
use tokio::sync::Mutex;

/// Monitor configuration plus per-unit bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringStatus {
    pub monitoring_active: bool,
    pub interval_secs: u64,
    pub max_restart_attempts: u32,
    pub restart_cooldown_secs: u64,
    pub max_health_check_failures: u32,
    pub services: BTreeMap<String, UnitSnapshot>,
}

/// Owns every managed unit.
///
/// Built once in `main` and shared as `Arc<ServiceManager>` with the HTTP
/// handlers and the monitor task. Start, stop and restart are serialized by
/// one manager-wide lock.
pub struct ServiceManager {
    registry: Registry,
    launcher: Launcher,
    prober: Prober,
    reporter: HealthReporter,
    policy: SupervisorPolicy,
    metrics: SupervisorMetrics,
    ops_lock: Mutex<()>,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl ServiceManager {
    pub fn new(
        units: Vec<UnitDescriptor>,
        policy: SupervisorPolicy,
    ) -> SupervisorErrorResult<Self> {
        let metrics = SupervisorMetrics::new();
        let prober = Prober::new()?;

        Ok(Self {
            registry: Registry::new(units)?,
            launcher: Launcher::new(&policy, metrics.clone()),
            reporter: HealthReporter::new(
                prober.clone(),
                policy.health_timeout,
                policy.health_workers,
            ),
            prober,
            policy,
            metrics,
            ops_lock: Mutex::new(()),
            monitor: Mutex::new(None),
        })
    }

    pub fn from_config(config: &Config) -> SupervisorErrorResult<Self> {
        let units = config
            .units
            .iter()
            .map(|unit| UnitDescriptor::from_config(unit, &config.server))
            .collect::<SupervisorErrorResult<Vec<_>>>()?;

        Self::new(units, SupervisorPolicy::from_config(config))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn policy(&self) -> &SupervisorPolicy {
        &self.policy
    }

    // =========================================================================
    // Operator actions
    // =========================================================================

    /// Start `name`; a unit that is already running is left alone.
    pub async fn start(&self, name: &str) -> SupervisorErrorResult<()> {
        let _ops = self.ops_lock.lock().await;
        self.start_locked(name).await
    }

    /// Stop `name` and suppress automatic restarts until the next start.
    pub async fn stop(&self, name: &str) -> SupervisorErrorResult<()> {
        let _ops = self.ops_lock.lock().await;
        self.stop_locked(name).await
    }

    pub async fn reset_service_stats(&self, name: &str) -> SupervisorErrorResult<()> {
        self.registry
            .update(name, |d| {
                d.state.restart_count = 0;
                d.state.last_restart = None;
                d.state.health_check_failures = 0;
            })
            .await?;
        info!("Reset restart statistics for {name}");
        Ok(())
    }

    /// Start `name` unless it already reports running.
    pub async fn ensure_running(&self, name: &str) -> SupervisorErrorResult<()> {
        if self.status(name).await? == UnitStatus::Running {
            return Ok(());
        }
        self.start(name).await
    }

    /// Start, settle, confirm running. Returns where the unit is served.
    pub async fn launch(&self, name: &str) -> SupervisorErrorResult<String> {
        self.ensure_running(name).await?;
        tokio::time::sleep(self.policy.launch_settle).await;

        match self.status(name).await? {
            UnitStatus::Running => self.registry.read(name, UnitDescriptor::service_url).await,
            status => Err(SupervisorError::NotReady {
                name: name.to_string(),
                status,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn start_locked(&self, name: &str) -> SupervisorErrorResult<()> {
        self.reap(name).await?;

        let running = self
            .registry
            .read(name, |d| d.state.started && (d.kind.is_in_process() || d.has_process()))
            .await?;
        if running {
            debug!("{name} is already running");
            return Ok(());
        }

        self.registry
            .update(name, |d| {
                d.state.auto_restart_disabled = false;
                d.state.last_output = None;
            })
            .await?;

        info!("Starting {name}");
        let result = self.launcher.launch(&self.registry, name).await;
        let started = result.is_ok();
        self.registry.update(name, |d| d.state.started = started).await?;

        match &result {
            Ok(()) => info!("{name} started"),
            Err(e) => error!("{name} failed to start: {e}"),
        }
        result
    }

    async fn stop_locked(&self, name: &str) -> SupervisorErrorResult<()> {
        self.registry
            .update(name, |d| d.state.auto_restart_disabled = true)
            .await?;

        info!("Stopping {name}");
        self.launcher.terminate(&self.registry, name).await?;
        info!("{name} stopped");
        Ok(())
    }

    /// Drop the handle of a started unit whose process has exited.
    async fn reap(&self, name: &str) -> SupervisorErrorResult<bool> {
        let exit = self
            .registry
            .update(name, |d| {
                if !d.state.started {
                    return None;
                }
                let status = d.process.as_mut()?.try_exit_status()?;
                d.process = None;
                d.state.started = false;
                Some(status)
            })
            .await?;

        if let Some(status) = exit {
            warn!("{name} exited unexpectedly with {status}");
        }
        Ok(exit.is_some())
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// In-process units are answered from `started` alone; out-of-process
    /// units additionally need an open port and a healthy probe.
    pub async fn status(&self, name: &str) -> SupervisorErrorResult<UnitStatus> {
        if !self.is_running(name).await? {
            return Ok(UnitStatus::Stopped);
        }

        let (in_process, check_url) = self
            .registry
            .read(name, |d| (d.kind.is_in_process(), d.check_url.clone()))
            .await?;
        if in_process {
            return Ok(UnitStatus::Running);
        }

        let outcome = self.prober.probe(&check_url, self.policy.status_timeout).await;
        Ok(if outcome.status == HealthStatus::Healthy {
            UnitStatus::Running
        } else {
            UnitStatus::Unhealthy
        })
    }

    pub async fn all_status(&self) -> BTreeMap<String, UnitStatus> {
        let names = self.registry.names();
        let statuses = join_all(names.iter().map(|name| self.status(name))).await;

        names
            .iter()
            .zip(statuses)
            .filter_map(|(name, status)| match status {
                Ok(status) => Some((name.clone(), status)),
                Err(e) => {
                    warn!("Status of {name} unavailable: {e}");
                    None
                }
            })
            .collect()
    }

    pub async fn monitoring_status(&self) -> MonitoringStatus {
        let monitoring_active = self
            .monitor
            .lock()
            .await
            .as_ref()
            .is_some_and(|m| !m.is_finished());

        let services = self
            .registry
            .snapshots()
            .await
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();

        MonitoringStatus {
            monitoring_active,
            interval_secs: self.policy.monitor_interval.as_secs(),
            max_restart_attempts: self.policy.restart.max_restart_attempts,
            restart_cooldown_secs: self.policy.restart.cooldown.as_secs(),
            max_health_check_failures: self.policy.restart.max_health_check_failures,
            services,
        }
    }

    pub async fn health_report(&self) -> HealthReport {
        self.reporter.check_all(&self.registry).await
    }

    pub async fn unit_health(&self, name: &str) -> SupervisorErrorResult<UnitHealth> {
        self.reporter.check_one(&self.registry, name).await
    }

    // =========================================================================
    // Monitor
    // =========================================================================

    /// Spawn the background monitor unless disabled by policy.
    pub async fn spawn_monitor(self: &Arc<Self>, coordinator: &ShutdownCoordinator) {
        if !self.policy.monitor_enabled {
            info!("Service monitor disabled");
            return;
        }

        let mut monitor = self.monitor.lock().await;
        if monitor.is_some() {
            warn!("Service monitor already running");
            return;
        }
        *monitor = Some(MonitorHandle::spawn(self.clone(), coordinator));
    }

    /// One monitor pass over every unit, in configuration order.
    ///
    /// A failure on one unit is logged and never stops the pass.
    pub async fn run_monitor_cycle(&self) {
        let started_at = Instant::now();

        for name in self.registry.names() {
            if let Err(e) = self.check_unit(name).await {
                error!("Monitor check of {name} failed: {e}");
            }
        }

        self.metrics.monitor_cycle(started_at.elapsed());
    }

    async fn check_unit(&self, name: &str) -> SupervisorErrorResult<()> {
        let now = Utc::now();
        let disabled = self
            .registry
            .update(name, |d| {
                d.state.last_health_check = Some(now);
                if d.state.auto_restart_disabled {
                    d.state.health_check_failures = 0;
                }
                d.state.auto_restart_disabled
            })
            .await?;
        if disabled {
            return Ok(());
        }

        if !self.is_running(name).await? {
            self.registry
                .update(name, |d| d.state.health_check_failures = 0)
                .await?;
            return Ok(());
        }

        let check_url = self.registry.read(name, |d| d.check_url.clone()).await?;
        let alive = self
            .prober
            .is_alive(&check_url, self.policy.liveness_timeout)
            .await;

        let failures = self
            .registry
            .update(name, |d| {
                if alive {
                    d.state.health_check_failures = 0;
                } else {
                    d.state.health_check_failures += 1;
                }
                d.state.health_check_failures
            })
            .await?;

        if !alive {
            self.metrics.probe_failed(name);
            warn!(
                "{name} failed liveness check ({failures}/{})",
                self.policy.restart.max_health_check_failures
            );
        }

        if self.policy.restart.failure_threshold_reached(failures) {
            self.attempt_restart(name).await?;
        }

        Ok(())
    }

    /// Started, and for out-of-process units also listening.
    async fn is_running(&self, name: &str) -> SupervisorErrorResult<bool> {
        self.reap(name).await?;

        let (started, port) = self.registry.read(name, |d| (d.state.started, d.port())).await?;
        match (started, port) {
            (false, _) => Ok(false),
            (true, None) => Ok(true),
            (true, Some(port)) => Ok(is_port_open(port, self.policy.port_check_timeout).await),
        }
    }

    async fn attempt_restart(&self, name: &str) -> SupervisorErrorResult<()> {
        let (restart_count, last_restart) = self
            .registry
            .read(name, |d| (d.state.restart_count, d.state.last_restart))
            .await?;

        let policy = &self.policy.restart;
        match policy.evaluate(restart_count, last_restart, Utc::now()) {
            RestartDecision::CoolingDown { remaining } => {
                info!("{name} restart skipped, cooling down for another {remaining:?}");
                self.metrics.restart_suppressed(name, "cooldown");
                return Ok(());
            }
            RestartDecision::CeilingReached { attempts } => {
                warn!(
                    "{name} restart skipped, {attempts} restarts already attempted; reset stats to re-enable"
                );
                self.metrics.restart_suppressed(name, "ceiling");
                return Ok(());
            }
            RestartDecision::Proceed => {}
        }

        let _ops = self.ops_lock.lock().await;

        // An operator may have stopped the unit while we waited for the lock.
        if self.registry.read(name, |d| d.state.auto_restart_disabled).await? {
            info!("{name} was stopped by an operator, restart abandoned");
            return Ok(());
        }

        warn!(
            "Restarting {name} (attempt {}/{})",
            restart_count + 1,
            policy.max_restart_attempts
        );

        // Not an operator stop: auto_restart_disabled stays untouched.
        self.launcher.terminate(&self.registry, name).await?;
        tokio::time::sleep(policy.pause).await;
        self.start_locked(name).await?;

        let now = Utc::now();
        self.registry
            .update(name, |d| {
                d.state.restart_count += 1;
                d.state.last_restart = Some(now);
                d.state.health_check_failures = 0;
            })
            .await?;
        self.metrics.restarted(name);
        info!("{name} restarted");

        Ok(())
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Stop the monitor (bounded wait) and terminate every tracked process.
    pub async fn shutdown(&self) {
        if let Some(monitor) = self.monitor.lock().await.take() {
            monitor.stop(self.policy.monitor_join_timeout).await;
        }

        let _ops = self.ops_lock.lock().await;
        let results = join_all(
            self.registry
                .names()
                .iter()
                .map(|name| async move { (name, self.launcher.terminate(&self.registry, name).await) }),
        )
        .await;

        for (name, result) in results {
            if let Err(e) = result {
                error!("Failed to terminate {name} during shutdown: {e}");
            }
        }

        info!("Service manager shut down");
    }
}
