use metrics::{counter, histogram};

/// Metrics collector for supervisor activity
#[derive(Debug, Clone)]
pub struct SupervisorMetrics {
    prefix: &'static str,
}

impl SupervisorMetrics {
    pub fn new() -> Self {
        Self {
            prefix: "portal_supervisor",
        }
    }

    /// Record a process spawned for a unit
    pub fn process_spawned(&self, unit: &str) {
        counter!(format!("{}.spawns", self.prefix), "unit" => unit.to_string()).increment(1);
    }

    /// Record a failed start, `reason` being a short error kind
    pub fn launch_failed(&self, unit: &str, reason: &'static str) {
        counter!(
            format!("{}.launch_failures", self.prefix),
            "unit" => unit.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Record a successful automatic restart
    pub fn restarted(&self, unit: &str) {
        counter!(format!("{}.restarts", self.prefix), "unit" => unit.to_string()).increment(1);
    }

    /// Record a restart the policy refused
    pub fn restart_suppressed(&self, unit: &str, reason: &'static str) {
        counter!(
            format!("{}.restarts_suppressed", self.prefix),
            "unit" => unit.to_string(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Record a failed liveness probe
    pub fn probe_failed(&self, unit: &str) {
        counter!(format!("{}.probe_failures", self.prefix), "unit" => unit.to_string())
            .increment(1);
    }

    /// Record one full monitor pass
    pub fn monitor_cycle(&self, duration: std::time::Duration) {
        counter!(format!("{}.monitor_cycles", self.prefix)).increment(1);
        histogram!(format!("{}.monitor_cycle_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }
}

impl Default for SupervisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}
