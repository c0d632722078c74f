use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Aggregate health constraints
pub const MIN_TIMEOUT_SECS: u64 = 5;
pub const MAX_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const MIN_STATUS_TIMEOUT_SECS: u64 = 1;
pub const MAX_STATUS_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 5;

pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 32;
pub const DEFAULT_WORKERS: usize = 4;

/// Aggregate health reporter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Probe timeout used by `/health`
    pub timeout_secs: u64,
    /// Probe timeout used by per-unit status checks
    pub status_timeout_secs: u64,
    /// Concurrent probes during a fan-out
    pub workers: usize,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            status_timeout_secs: DEFAULT_STATUS_TIMEOUT_SECS,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl HealthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::health(format!(
                "health.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        if self.status_timeout_secs < MIN_STATUS_TIMEOUT_SECS
            || self.status_timeout_secs > MAX_STATUS_TIMEOUT_SECS
        {
            return Err(ConfigError::health(format!(
                "health.status_timeout_secs must be {}-{}, got {}",
                MIN_STATUS_TIMEOUT_SECS, MAX_STATUS_TIMEOUT_SECS, self.status_timeout_secs
            )));
        }

        if self.workers < MIN_WORKERS || self.workers > MAX_WORKERS {
            return Err(ConfigError::health(format!(
                "health.workers must be {}-{}, got {}",
                MIN_WORKERS, MAX_WORKERS, self.workers
            )));
        }

        Ok(())
    }
}
