//! Background monitor task.

use crate::{ServiceManager, ShutdownCoordinator};

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Running monitor task plus the means to stop it.
#[derive(Debug)]
pub struct MonitorHandle {
    coordinator: ShutdownCoordinator,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Spawn the monitor loop. The first cycle runs one interval after spawn.
    pub fn spawn(manager: Arc<ServiceManager>, coordinator: &ShutdownCoordinator) -> Self {
        let mut guard = coordinator.subscribe_guard();
        let interval = manager.policy().monitor_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!("Service monitor started, interval {interval:?}");

            loop {
                tokio::select! {
                    _ = guard.wait() => {
                        info!("Service monitor stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        manager.run_monitor_cycle().await;
                    }
                }
            }
        });

        Self {
            coordinator: coordinator.clone(),
            task,
        }
    }

    /// Signal the task and wait at most `wait` for it to finish.
    pub async fn stop(self, wait: Duration) {
        self.coordinator.shutdown();

        let abort = self.task.abort_handle();
        match tokio::time::timeout(wait, self.task).await {
            Ok(Ok(())) => info!("Service monitor stopped"),
            Ok(Err(e)) => warn!("Service monitor task ended abnormally: {e}"),
            Err(_) => {
                warn!("Service monitor did not stop within {wait:?}, aborting");
                abort.abort();
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
