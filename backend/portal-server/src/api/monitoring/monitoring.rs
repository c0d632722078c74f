use crate::{ApiResult, AppState, MonitoringResponse};

use axum::{Json, extract::State};

/// GET /api/monitoring/status
///
/// Monitor configuration plus per-unit restart bookkeeping
pub async fn monitoring_status(
    State(state): State<AppState>,
) -> ApiResult<Json<MonitoringResponse>> {
    let monitoring = state.manager.monitoring_status().await;

    Ok(Json(MonitoringResponse {
        success: true,
        monitoring,
    }))
}
