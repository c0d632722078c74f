use crate::{CliClientResult, ClientError};

use std::panic::Location;

use error_location::ErrorLocation;
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;

/// HTTP client for the portal-server control plane
pub struct Client {
    pub base_url: String,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Portal URL (e.g., "http://127.0.0.1:9000")
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: ReqwestClient::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, &url)
    }

    /// Execute request and turn `{success: false, error}` bodies into errors
    async fn execute(&self, req: reqwest::RequestBuilder) -> CliClientResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if status.is_success() => {
                return Err(ClientError::UnexpectedResponse {
                    status: status.as_u16(),
                    message: "response body is not JSON".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(_) => {
                return Err(ClientError::UnexpectedResponse {
                    status: status.as_u16(),
                    message: text,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if status.is_success() {
            return Ok(body);
        }

        let Some(error) = body.get("error") else {
            return Err(ClientError::UnexpectedResponse {
                status: status.as_u16(),
                message: body.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let code = error
            .get("code")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let message = error
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        let output = body
            .get("output")
            .and_then(|v| v.as_str())
            .map(String::from);

        Err(ClientError::api_error(code, message, output))
    }

    // =========================================================================
    // Service Operations
    // =========================================================================

    /// Status of every service
    pub async fn all_status(&self) -> CliClientResult<Value> {
        let req = self.request(Method::GET, "/api/services/status");
        self.execute(req).await
    }

    pub async fn status(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::GET, &format!("/api/services/{}/status", name));
        self.execute(req).await
    }

    pub async fn start(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::POST, &format!("/api/services/{}/start", name));
        self.execute(req).await
    }

    pub async fn stop(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::POST, &format!("/api/services/{}/stop", name));
        self.execute(req).await
    }

    pub async fn reset_stats(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::POST, &format!("/api/services/{}/reset-stats", name));
        self.execute(req).await
    }

    /// Start if needed and return the service URL once it is running
    pub async fn launch(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::POST, &format!("/api/{}/launch", name));
        self.execute(req).await
    }

    // =========================================================================
    // Monitoring and Health
    // =========================================================================

    pub async fn monitoring(&self) -> CliClientResult<Value> {
        let req = self.request(Method::GET, "/api/monitoring/status");
        self.execute(req).await
    }

    /// Aggregate health report
    pub async fn health(&self) -> CliClientResult<Value> {
        let req = self.request(Method::GET, "/health");
        self.execute(req).await
    }

    pub async fn unit_health(&self, name: &str) -> CliClientResult<Value> {
        let req = self.request(Method::GET, &format!("/health/{}", name));
        self.execute(req).await
    }

    pub async fn systems(&self) -> CliClientResult<Value> {
        let req = self.request(Method::GET, "/api/systems");
        self.execute(req).await
    }
}
