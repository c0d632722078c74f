//! Aggregate health, the portal's own probes, and the metrics exposition.

use crate::{ApiError, ApiResult, AppState};

use portal_supervisor::{HealthReport, UnitHealth};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: HealthReport,
}

#[derive(Debug, Serialize)]
pub struct UnitHealthResponse {
    pub success: bool,
    #[serde(flatten)]
    pub health: UnitHealth,
}

/// GET /health - Probe every unit concurrently and fold an overall status
///
/// Always 200; the overall status lives in the body.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = state.manager.health_report().await;

    Json(HealthResponse {
        success: true,
        report,
    })
}

/// GET /health/{name}
pub async fn unit_health(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<UnitHealthResponse>> {
    let health = state.manager.unit_health(&name).await?;

    Ok(Json(UnitHealthResponse {
        success: true,
        health,
    }))
}

/// GET /live - Is the portal process answering at all?
pub async fn liveness() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "status": "alive" })),
    )
        .into_response()
}

/// GET /ready - Ready to accept control-plane traffic?
pub async fn readiness(State(state): State<AppState>) -> Response {
    let registry = state.manager.registry();

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "units": registry.len(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> ApiResult<Response> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Metrics recorder is not installed"))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}
