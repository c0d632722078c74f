use tokio::sync::watch;

/// Per-task view of the shutdown signal
#[derive(Debug)]
pub struct ShutdownGuard {
    state: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub(crate) fn new(state: watch::Receiver<bool>) -> Self {
        Self { state }
    }

    /// Resolves once shutdown is triggered or the coordinator is dropped.
    pub async fn wait(&mut self) {
        let _ = self.state.wait_for(|stopped| *stopped).await;
    }
}
