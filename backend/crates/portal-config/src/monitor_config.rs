use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Monitor constraints
pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

pub const MAX_MAX_RESTART_ATTEMPTS: u32 = 100;
pub const DEFAULT_MAX_RESTART_ATTEMPTS: u32 = 3;

pub const MAX_RESTART_COOLDOWN_SECS: u64 = 86_400;
pub const DEFAULT_RESTART_COOLDOWN_SECS: u64 = 300;

pub const MIN_MAX_HEALTH_CHECK_FAILURES: u32 = 1;
pub const MAX_MAX_HEALTH_CHECK_FAILURES: u32 = 100;
pub const DEFAULT_MAX_HEALTH_CHECK_FAILURES: u32 = 3;

pub const MIN_LIVENESS_TIMEOUT_SECS: u64 = 1;
pub const MAX_LIVENESS_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LIVENESS_TIMEOUT_SECS: u64 = 5;

pub const MAX_RESTART_PAUSE_MS: u64 = 60_000;
pub const DEFAULT_RESTART_PAUSE_MS: u64 = 2_000;

pub const MIN_STARTUP_TIMEOUT_SECS: u64 = 1;
pub const MAX_STARTUP_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;

pub const MIN_READINESS_POLL_MS: u64 = 10;
pub const MAX_READINESS_POLL_MS: u64 = 10_000;
pub const DEFAULT_READINESS_POLL_MS: u64 = 1_000;

pub const MIN_STOP_GRACE_SECS: u64 = 1;
pub const MAX_STOP_GRACE_SECS: u64 = 120;
pub const DEFAULT_STOP_GRACE_SECS: u64 = 5;

pub const DEFAULT_MONITOR_ENABLED: bool = true;

/// Background monitor and auto-restart policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Run the background monitor at all
    pub enabled: bool,
    /// Seconds between monitor cycles
    pub interval_secs: u64,
    /// Automatic restarts allowed before giving up until stats are reset
    pub max_restart_attempts: u32,
    /// Minimum seconds between two automatic restarts of the same unit
    pub restart_cooldown_secs: u64,
    /// Consecutive failed liveness probes that trigger a restart
    pub max_health_check_failures: u32,
    /// Timeout for the monitor's liveness probe
    pub liveness_timeout_secs: u64,
    /// Pause between stop and start during an automatic restart
    pub restart_pause_ms: u64,
    /// How long a spawned process may take to start listening
    pub startup_timeout_secs: u64,
    /// Readiness poll period while waiting for a spawned process
    pub readiness_poll_ms: u64,
    /// Grace window between terminate and force kill
    pub stop_grace_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_MONITOR_ENABLED,
            interval_secs: DEFAULT_INTERVAL_SECS,
            max_restart_attempts: DEFAULT_MAX_RESTART_ATTEMPTS,
            restart_cooldown_secs: DEFAULT_RESTART_COOLDOWN_SECS,
            max_health_check_failures: DEFAULT_MAX_HEALTH_CHECK_FAILURES,
            liveness_timeout_secs: DEFAULT_LIVENESS_TIMEOUT_SECS,
            restart_pause_ms: DEFAULT_RESTART_PAUSE_MS,
            startup_timeout_secs: DEFAULT_STARTUP_TIMEOUT_SECS,
            readiness_poll_ms: DEFAULT_READINESS_POLL_MS,
            stop_grace_secs: DEFAULT_STOP_GRACE_SECS,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.interval_secs < MIN_INTERVAL_SECS || self.interval_secs > MAX_INTERVAL_SECS {
            return Err(ConfigError::monitor(format!(
                "monitor.interval_secs must be {}-{}, got {}",
                MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, self.interval_secs
            )));
        }

        if self.max_restart_attempts > MAX_MAX_RESTART_ATTEMPTS {
            return Err(ConfigError::monitor(format!(
                "monitor.max_restart_attempts must be 0-{}, got {}",
                MAX_MAX_RESTART_ATTEMPTS, self.max_restart_attempts
            )));
        }

        if self.restart_cooldown_secs > MAX_RESTART_COOLDOWN_SECS {
            return Err(ConfigError::monitor(format!(
                "monitor.restart_cooldown_secs must be 0-{}, got {}",
                MAX_RESTART_COOLDOWN_SECS, self.restart_cooldown_secs
            )));
        }

        if self.max_health_check_failures < MIN_MAX_HEALTH_CHECK_FAILURES
            || self.max_health_check_failures > MAX_MAX_HEALTH_CHECK_FAILURES
        {
            return Err(ConfigError::monitor(format!(
                "monitor.max_health_check_failures must be {}-{}, got {}",
                MIN_MAX_HEALTH_CHECK_FAILURES,
                MAX_MAX_HEALTH_CHECK_FAILURES,
                self.max_health_check_failures
            )));
        }

        if self.liveness_timeout_secs < MIN_LIVENESS_TIMEOUT_SECS
            || self.liveness_timeout_secs > MAX_LIVENESS_TIMEOUT_SECS
        {
            return Err(ConfigError::monitor(format!(
                "monitor.liveness_timeout_secs must be {}-{}, got {}",
                MIN_LIVENESS_TIMEOUT_SECS, MAX_LIVENESS_TIMEOUT_SECS, self.liveness_timeout_secs
            )));
        }

        if self.restart_pause_ms > MAX_RESTART_PAUSE_MS {
            return Err(ConfigError::monitor(format!(
                "monitor.restart_pause_ms must be 0-{}, got {}",
                MAX_RESTART_PAUSE_MS, self.restart_pause_ms
            )));
        }

        if self.startup_timeout_secs < MIN_STARTUP_TIMEOUT_SECS
            || self.startup_timeout_secs > MAX_STARTUP_TIMEOUT_SECS
        {
            return Err(ConfigError::monitor(format!(
                "monitor.startup_timeout_secs must be {}-{}, got {}",
                MIN_STARTUP_TIMEOUT_SECS, MAX_STARTUP_TIMEOUT_SECS, self.startup_timeout_secs
            )));
        }

        if self.readiness_poll_ms < MIN_READINESS_POLL_MS
            || self.readiness_poll_ms > MAX_READINESS_POLL_MS
        {
            return Err(ConfigError::monitor(format!(
                "monitor.readiness_poll_ms must be {}-{}, got {}",
                MIN_READINESS_POLL_MS, MAX_READINESS_POLL_MS, self.readiness_poll_ms
            )));
        }

        if self.stop_grace_secs < MIN_STOP_GRACE_SECS || self.stop_grace_secs > MAX_STOP_GRACE_SECS
        {
            return Err(ConfigError::monitor(format!(
                "monitor.stop_grace_secs must be {}-{}, got {}",
                MIN_STOP_GRACE_SECS, MAX_STOP_GRACE_SECS, self.stop_grace_secs
            )));
        }

        Ok(())
    }
}
