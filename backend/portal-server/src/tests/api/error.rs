use crate::ApiError;

use portal_supervisor::{SupervisorError, UnitStatus};

use std::panic::Location;
use std::time::Duration;

use axum::response::IntoResponse;
use error_location::ErrorLocation;
use http::StatusCode;
use http_body_util::BodyExt;

async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_not_found_returns_404_with_json_body() {
    let error = ApiError::NotFound {
        message: "Unknown service: ghost".into(),
        location: ErrorLocation::from(Location::caller()),
    };

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Unknown service: ghost");
}

#[tokio::test]
async fn test_unavailable_returns_503() {
    let (status, json) = body_json(ApiError::unavailable("no recorder")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_unit_converts_to_not_found() {
    let error: ApiError = SupervisorError::unknown_unit("ghost").into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Unknown service: ghost");
}

#[tokio::test]
async fn test_early_exit_converts_to_launch_failure_with_output() {
    let error: ApiError = SupervisorError::ProcessExited {
        name: "alpha".into(),
        code: Some(1),
        output: "Traceback: boom\n".into(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "LAUNCH_FAILED");
    assert_eq!(json["output"], "Traceback: boom\n");
    assert!(json["error"]["hint"].as_str().unwrap().contains("output"));
}

#[tokio::test]
async fn test_startup_timeout_keeps_partial_output() {
    let error: ApiError = SupervisorError::StartupTimeout {
        name: "alpha".into(),
        timeout: Duration::from_secs(30),
        output: "still loading".into(),
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    let (_, json) = body_json(error).await;

    assert_eq!(json["error"]["code"], "LAUNCH_FAILED");
    assert_eq!(json["output"], "still loading");
}

#[tokio::test]
async fn test_not_ready_converts_to_500() {
    let error: ApiError = SupervisorError::NotReady {
        name: "alpha".into(),
        status: UnitStatus::Unhealthy,
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "NOT_READY");
    assert!(json["message"].as_str().unwrap().contains("unhealthy"));
}

#[tokio::test]
async fn test_port_in_use_converts_to_launch_failure() {
    let error: ApiError = SupervisorError::PortInUse {
        port: 18001,
        location: ErrorLocation::from(Location::caller()),
    }
    .into();

    let (status, json) = body_json(error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "LAUNCH_FAILED");
    assert!(json["message"].as_str().unwrap().contains("18001"));
    assert!(json.get("output").is_none());
}
