use error_location::ErrorLocation;
use std::panic::Location;
use thiserror::Error;

/// Errors that can occur during API calls
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (code: {code}) {location}")]
    Api {
        code: String,
        message: String,
        /// Captured output of a unit that failed to launch
        output: Option<String>,
        location: ErrorLocation,
    },

    #[error("Unexpected response ({status}): {message} {location}")]
    UnexpectedResponse {
        status: u16,
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn api_error(code: String, message: String, output: Option<String>) -> Self {
        ClientError::Api {
            code,
            message,
            output,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Launch output attached by the server, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            ClientError::Api { output, .. } => output.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
