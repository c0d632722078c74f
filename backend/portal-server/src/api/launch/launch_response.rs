use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub success: bool,
    pub message: String,
    pub service_url: String,
}
