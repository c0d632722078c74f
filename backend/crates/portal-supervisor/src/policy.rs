use crate::RestartPolicy;

use std::time::Duration;

use portal_config::Config;

/// Fallback for how long `launch` waits before confirming a unit is running.
pub const DEFAULT_LAUNCH_SETTLE: Duration = Duration::from_secs(1);
/// Timeout for a single listening-port check.
pub const DEFAULT_PORT_CHECK_TIMEOUT: Duration = Duration::from_secs(1);
/// Bounded join of the monitor task during shutdown.
pub const DEFAULT_MONITOR_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime timing and limits of the supervisor.
///
/// Built from [`Config`] in production; tests construct it directly with
/// sub-second durations.
#[derive(Debug, Clone)]
pub struct SupervisorPolicy {
    pub monitor_enabled: bool,
    pub monitor_interval: Duration,
    pub monitor_join_timeout: Duration,
    pub liveness_timeout: Duration,
    pub status_timeout: Duration,
    pub health_timeout: Duration,
    pub health_workers: usize,
    pub startup_timeout: Duration,
    pub readiness_poll: Duration,
    pub port_check_timeout: Duration,
    pub stop_grace: Duration,
    pub launch_settle: Duration,
    pub restart: RestartPolicy,
}

impl Default for SupervisorPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SupervisorPolicy {
    pub fn from_config(config: &Config) -> Self {
        let monitor = &config.monitor;
        let health = &config.health;

        Self {
            monitor_enabled: monitor.enabled,
            monitor_interval: Duration::from_secs(monitor.interval_secs),
            monitor_join_timeout: DEFAULT_MONITOR_JOIN_TIMEOUT,
            liveness_timeout: Duration::from_secs(monitor.liveness_timeout_secs),
            status_timeout: Duration::from_secs(health.status_timeout_secs),
            health_timeout: Duration::from_secs(health.timeout_secs),
            health_workers: health.workers,
            startup_timeout: Duration::from_secs(monitor.startup_timeout_secs),
            readiness_poll: Duration::from_millis(monitor.readiness_poll_ms),
            port_check_timeout: DEFAULT_PORT_CHECK_TIMEOUT,
            stop_grace: Duration::from_secs(monitor.stop_grace_secs),
            launch_settle: DEFAULT_LAUNCH_SETTLE,
            restart: RestartPolicy {
                max_restart_attempts: monitor.max_restart_attempts,
                cooldown: Duration::from_secs(monitor.restart_cooldown_secs),
                max_health_check_failures: monitor.max_health_check_failures,
                pause: Duration::from_millis(monitor.restart_pause_ms),
            },
        }
    }
}
