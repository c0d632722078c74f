use crate::SystemDto;

use serde::Serialize;

/// Response wrapper for list of systems
#[derive(Debug, Serialize)]
pub struct SystemListResponse {
    pub success: bool,
    pub systems: Vec<SystemDto>,
}
