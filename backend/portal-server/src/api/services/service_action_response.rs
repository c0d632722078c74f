use serde::Serialize;

/// Response for start / stop / reset-stats
#[derive(Debug, Serialize)]
pub struct ServiceActionResponse {
    pub success: bool,
    pub message: String,
}

impl ServiceActionResponse {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
