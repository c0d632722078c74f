use crate::ShutdownGuard;

use tokio::sync::watch;

/// Fans one shutdown signal out to the monitor and the HTTP server.
///
/// Backed by a watch channel, so a guard taken after `shutdown()` already
/// fired still resolves immediately.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    state: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self { state }
    }

    /// Trigger shutdown (call this from the signal handler)
    pub fn shutdown(&self) {
        let already = self.state.send_replace(true);
        if !already {
            log::info!(
                "Shutdown requested, notifying {} subscriber(s)",
                self.state.receiver_count()
            );
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self.state.subscribe())
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
