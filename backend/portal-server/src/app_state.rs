use portal_supervisor::ServiceManager;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ServiceManager>,
    /// None when no Prometheus recorder is installed (tests)
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(manager: Arc<ServiceManager>) -> Self {
        Self {
            manager,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
