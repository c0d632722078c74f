use portal_supervisor::UnitStatus;

use std::collections::BTreeMap;

use serde::Serialize;

/// Response wrapper for the status of every registered unit
#[derive(Debug, Serialize)]
pub struct ServicesStatusResponse {
    pub success: bool,
    pub services: BTreeMap<String, UnitStatus>,
}
