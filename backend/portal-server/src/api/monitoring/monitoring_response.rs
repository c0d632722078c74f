use portal_supervisor::MonitoringStatus;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MonitoringResponse {
    pub success: bool,
    #[serde(flatten)]
    pub monitoring: MonitoringStatus,
}
