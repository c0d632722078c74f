use std::time::Duration;

use chrono::{DateTime, Utc};

/// Bounds on monitor-driven restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPolicy {
    /// Automatic restarts allowed until stats are reset
    pub max_restart_attempts: u32,
    /// Minimum gap between two automatic restarts of one unit
    pub cooldown: Duration,
    /// Consecutive liveness failures that trigger a restart
    pub max_health_check_failures: u32,
    /// Pause between stop and start
    pub pause: Duration,
}

/// Outcome of asking the policy whether a restart may happen now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartDecision {
    Proceed,
    CoolingDown { remaining: Duration },
    CeilingReached { attempts: u32 },
}

impl RestartPolicy {
    pub fn failure_threshold_reached(&self, failures: u32) -> bool {
        failures >= self.max_health_check_failures
    }

    /// Cooldown is checked before the ceiling.
    pub fn evaluate(
        &self,
        restart_count: u32,
        last_restart: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RestartDecision {
        if let Some(last) = last_restart {
            // A clock that moved backwards counts as zero elapsed time.
            let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
            if elapsed < self.cooldown {
                return RestartDecision::CoolingDown {
                    remaining: self.cooldown - elapsed,
                };
            }
        }

        if restart_count >= self.max_restart_attempts {
            return RestartDecision::CeilingReached {
                attempts: restart_count,
            };
        }

        RestartDecision::Proceed
    }
}
