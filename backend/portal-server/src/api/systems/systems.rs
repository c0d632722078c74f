//! Subsystem catalogue
//!
//! Read-only; the list is fixed by configuration at startup.

use crate::{ApiResult, AppState, SystemDto, SystemListResponse};

use axum::{Json, extract::State};

/// GET /api/systems
///
/// List every configured subsystem in configuration order
pub async fn list_systems(State(state): State<AppState>) -> ApiResult<Json<SystemListResponse>> {
    let systems = state
        .manager
        .registry()
        .snapshots()
        .await
        .into_iter()
        .map(SystemDto::from)
        .collect();

    Ok(Json(SystemListResponse {
        success: true,
        systems,
    }))
}
