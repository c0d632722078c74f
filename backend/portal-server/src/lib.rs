pub mod api;
pub mod app_state;
pub mod error;
pub mod health;
pub mod logger;
pub mod mounts;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api::{
    error::{ApiError, ApiErrorBody, ApiErrorResponse, Result as ApiResult},
    launch::{launch::launch_service, launch_response::LaunchResponse},
    monitoring::{monitoring::monitoring_status, monitoring_response::MonitoringResponse},
    services::{
        service_action_response::ServiceActionResponse,
        service_status_response::ServiceStatusResponse,
        services::{
            all_services_status, reset_service_stats, service_status, start_service, stop_service,
        },
        services_status_response::ServicesStatusResponse,
    },
    systems::{system_dto::SystemDto, system_list_response::SystemListResponse, systems::list_systems},
};
pub use app_state::AppState;
pub use error::{Result as ServerErrorResult, ServerError};

pub use crate::routes::build_router;
