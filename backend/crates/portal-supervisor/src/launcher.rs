use crate::{
    ProcessHandle, Registry, SupervisorError, SupervisorErrorResult, SupervisorMetrics,
    SupervisorPolicy, UnitKind, is_port_open,
};

use std::panic::Location;
use std::time::Duration;

use error_location::ErrorLocation;
use log::{info, warn};
use tokio::time::Instant;

/// Brings units up and down.
///
/// In-process units only flip `started`. Out-of-process units are spawned,
/// polled until their port opens, and terminated on failure.
#[derive(Debug, Clone)]
pub struct Launcher {
    startup_timeout: Duration,
    readiness_poll: Duration,
    port_check_timeout: Duration,
    stop_grace: Duration,
    metrics: SupervisorMetrics,
}

impl Launcher {
    pub fn new(policy: &SupervisorPolicy, metrics: SupervisorMetrics) -> Self {
        Self {
            startup_timeout: policy.startup_timeout,
            readiness_poll: policy.readiness_poll,
            port_check_timeout: policy.port_check_timeout,
            stop_grace: policy.stop_grace,
            metrics,
        }
    }

    /// Start `name` and wait until it is ready.
    ///
    /// The process handle is stored in the registry as soon as the process
    /// exists and removed again on any failure.
    pub async fn launch(&self, registry: &Registry, name: &str) -> SupervisorErrorResult<()> {
        let kind = registry.read(name, |d| d.kind.clone()).await?;

        let spec = match kind {
            UnitKind::InProcess { .. } => {
                registry.update(name, |d| d.state.started = true).await?;
                info!("{name} is in-process, marked started");
                return Ok(());
            }
            UnitKind::OutOfProcess(spec) => spec,
        };

        if is_port_open(spec.port, self.port_check_timeout).await {
            self.metrics.launch_failed(name, "port_in_use");
            return Err(SupervisorError::PortInUse {
                port: spec.port,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let handle = ProcessHandle::spawn(name, &spec).inspect_err(|_| {
            self.metrics.launch_failed(name, "spawn");
        })?;

        registry
            .update(name, |d| {
                d.process = Some(handle);
                d.state.spawn_count += 1;
            })
            .await?;
        self.metrics.process_spawned(name);

        let deadline = Instant::now() + self.startup_timeout;

        loop {
            let exit = registry
                .update(name, |d| d.process.as_mut().map(ProcessHandle::try_exit_status))
                .await?;

            // A missing handle means the process was reaped underneath us.
            if let None | Some(Some(_)) = exit {
                let code = exit.flatten().and_then(|status| status.code());
                let output = self.discard(registry, name, false).await?;
                warn!("{name} exited with code {code:?} during startup");
                self.metrics.launch_failed(name, "exited");
                return Err(SupervisorError::ProcessExited {
                    name: name.to_string(),
                    code,
                    output,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if is_port_open(spec.port, self.port_check_timeout).await {
                info!("{name} is listening on port {}", spec.port);
                return Ok(());
            }

            if Instant::now() >= deadline {
                warn!(
                    "{name} did not open port {} within {:?}, terminating",
                    spec.port, self.startup_timeout
                );
                let output = self.discard(registry, name, true).await?;
                self.metrics.launch_failed(name, "timeout");
                return Err(SupervisorError::StartupTimeout {
                    name: name.to_string(),
                    timeout: self.startup_timeout,
                    output,
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            tokio::time::sleep(self.readiness_poll).await;
        }
    }

    /// Remove the handle after a failed launch, keeping its output as `last_output`.
    async fn discard(
        &self,
        registry: &Registry,
        name: &str,
        terminate: bool,
    ) -> SupervisorErrorResult<String> {
        let handle = registry
            .update(name, |d| {
                d.state.started = false;
                d.process.take()
            })
            .await?;

        let output = match handle {
            Some(mut handle) => {
                if terminate && let Err(e) = handle.terminate(self.stop_grace).await {
                    warn!("{e}");
                }
                handle.collect_output().await
            }
            None => String::new(),
        };

        registry
            .update(name, |d| d.state.last_output = Some(output.clone()))
            .await?;

        Ok(output)
    }

    /// Stop `name`: in-process units are only marked stopped.
    pub async fn terminate(&self, registry: &Registry, name: &str) -> SupervisorErrorResult<()> {
        let handle = registry
            .update(name, |d| {
                d.state.started = false;
                d.process.take()
            })
            .await?;

        match handle {
            Some(mut handle) => handle.terminate(self.stop_grace).await,
            None => Ok(()),
        }
    }
}
