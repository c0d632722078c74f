//! Lifecycle and health management for the portal's subsystems.
//!
//! A [`ServiceManager`] owns the [`Registry`] of units, starts and stops them
//! through the [`Launcher`], runs the background monitor and answers the
//! aggregate health questions asked by the HTTP front door.

mod controller;
mod error;
mod health_status;
mod launcher;
mod metrics;
mod monitor;
mod policy;
mod port;
mod probe;
mod process_handle;
mod registry;
mod reporter;
mod restart_policy;
mod shutdown_coordinator;
mod shutdown_guard;
mod unit;
mod unit_status;

#[cfg(test)]
mod tests;

pub use controller::{MonitoringStatus, ServiceManager};
pub use error::{SupervisorError, SupervisorErrorResult};
pub use health_status::{HealthStatus, OverallStatus};
pub use launcher::Launcher;
pub use metrics::SupervisorMetrics;
pub use monitor::MonitorHandle;
pub use policy::SupervisorPolicy;
pub use port::is_port_open;
pub use probe::{ProbeOutcome, Prober};
pub use process_handle::ProcessHandle;
pub use registry::Registry;
pub use reporter::{HealthReport, HealthReporter, HealthSummary, UnitHealth};
pub use restart_policy::{RestartDecision, RestartPolicy};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use unit::{ProcessSpec, UnitDescriptor, UnitKind, UnitSnapshot, UnitState};
pub use unit_status::UnitStatus;

/// Bytes of combined stdout/stderr kept per spawned process.
pub const OUTPUT_TAIL_BYTES: usize = 64 * 1024;
