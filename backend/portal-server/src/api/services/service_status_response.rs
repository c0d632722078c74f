use portal_supervisor::UnitStatus;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceStatusResponse {
    pub success: bool,
    pub name: String,
    pub status: UnitStatus,
}
