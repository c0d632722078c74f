//! Service lifecycle REST API handlers
//!
//! Thin wrappers over `ServiceManager`; unknown names surface as 404 through
//! `ApiError::from(SupervisorError)`.

use crate::{
    ApiResult, AppState, ServiceActionResponse, ServiceStatusResponse, ServicesStatusResponse,
};

use axum::{
    Json,
    extract::{Path, State},
};

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/services/status
pub async fn all_services_status(
    State(state): State<AppState>,
) -> ApiResult<Json<ServicesStatusResponse>> {
    let services = state.manager.all_status().await;

    Ok(Json(ServicesStatusResponse {
        success: true,
        services,
    }))
}

/// GET /api/services/{name}/status
pub async fn service_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServiceStatusResponse>> {
    let status = state.manager.status(&name).await?;

    Ok(Json(ServiceStatusResponse {
        success: true,
        name,
        status,
    }))
}

/// POST /api/services/{name}/start
///
/// Starting a unit that is already running is a no-op and still succeeds.
pub async fn start_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServiceActionResponse>> {
    state.manager.start(&name).await?;

    log::info!("Service {} started via API", name);

    Ok(Json(ServiceActionResponse::ok(format!(
        "Service {name} started"
    ))))
}

/// POST /api/services/{name}/stop
pub async fn stop_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServiceActionResponse>> {
    state.manager.stop(&name).await?;

    log::info!("Service {} stopped via API", name);

    Ok(Json(ServiceActionResponse::ok(format!(
        "Service {name} stopped"
    ))))
}

/// POST /api/services/{name}/reset-stats
///
/// Clears restart bookkeeping so the monitor may restart the unit again.
pub async fn reset_service_stats(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ServiceActionResponse>> {
    state.manager.reset_service_stats(&name).await?;

    Ok(Json(ServiceActionResponse::ok(format!(
        "Restart statistics for {name} reset"
    ))))
}
