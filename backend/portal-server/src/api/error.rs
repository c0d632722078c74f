//! Control-plane error types
//!
//! Every failure leaves the server as a JSON body carrying `success: false`
//! next to a machine-readable code, so callers never have to sniff status
//! codes alone.

use portal_supervisor::SupervisorError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ApiErrorBody,
    /// Captured stdout/stderr of a unit that failed to launch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Inner error body with code and message
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g., "NOT_FOUND", "LAUNCH_FAILED")
    pub code: String,
    pub message: String,
    /// Operator guidance for recoverable failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown unit (404)
    #[error("Resource not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Bad request (400)
    #[error("Bad request: {message} {location}")]
    BadRequest {
        message: String,
        location: ErrorLocation,
    },

    /// Lifecycle operation failed (500)
    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        code: &'static str,
        output: Option<String>,
        hint: Option<String>,
        location: ErrorLocation,
    },

    /// Prometheus recorder not installed (503)
    #[error("Unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log the error with location for debugging
        log::error!("{}", self);

        let (status, code, message, hint, output) = match self {
            ApiError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message, None, None)
            }
            ApiError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message, None, None)
            }
            ApiError::Internal {
                message,
                code,
                output,
                hint,
                ..
            } => (StatusCode::INTERNAL_SERVER_ERROR, code, message, hint, output),
            ApiError::Unavailable { message, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", message, None, None)
            }
        };

        let body = ApiErrorResponse {
            success: false,
            message: message.clone(),
            error: ApiErrorBody {
                code: code.to_string(),
                message,
                hint,
            },
            output,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SupervisorError> for ApiError {
    #[track_caller]
    fn from(err: SupervisorError) -> Self {
        let location = ErrorLocation::from(Location::caller());

        match err {
            SupervisorError::UnknownUnit { name, .. } => ApiError::NotFound {
                message: format!("Unknown service: {name}"),
                location,
            },
            SupervisorError::InvalidUnit { .. } => ApiError::BadRequest {
                message: err.to_string(),
                location,
            },
            other => {
                let code = match &other {
                    SupervisorError::ProcessSpawn { .. }
                    | SupervisorError::ProcessExited { .. }
                    | SupervisorError::StartupTimeout { .. }
                    | SupervisorError::PortInUse { .. } => "LAUNCH_FAILED",
                    SupervisorError::NotReady { .. } => "NOT_READY",
                    SupervisorError::Terminate { .. } => "STOP_FAILED",
                    _ => "INTERNAL_ERROR",
                };
                let hint = Some(other.recovery_hint().to_string());

                ApiError::Internal {
                    message: other.to_string(),
                    code,
                    output: other.output().map(str::to_string),
                    hint,
                    location,
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
