use crate::{ApiResult, AppState, LaunchResponse};

use axum::{
    Json,
    extract::{Path, State},
};

/// POST /api/{name}/launch
///
/// Start the unit if needed, confirm it reports running, and hand back the
/// URL the caller should open.
pub async fn launch_service(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<LaunchResponse>> {
    let service_url = state.manager.launch(&name).await?;

    Ok(Json(LaunchResponse {
        success: true,
        message: format!("{name} is running"),
        service_url,
    }))
}
