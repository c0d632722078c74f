use crate::{
    AppState, all_services_status, health, launch_service, list_systems, monitoring_status,
    mounts, reset_service_stats, service_status, start_service, stop_service,
};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Service lifecycle
        .route("/api/services/status", get(all_services_status))
        .route("/api/services/{name}/status", get(service_status))
        .route("/api/services/{name}/start", post(start_service))
        .route("/api/services/{name}/stop", post(stop_service))
        .route("/api/services/{name}/reset-stats", post(reset_service_stats))
        .route("/api/monitoring/status", get(monitoring_status))
        // Catalogue and launch
        .route("/api/systems", get(list_systems))
        .route("/api/{name}/launch", post(launch_service))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/health/{name}", get(health::unit_health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics));

    let router = mounts::mount_units(router, state.manager.registry().in_process_routes());

    router
        // Add shared state
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
