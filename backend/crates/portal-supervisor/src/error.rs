use crate::UnitStatus;

use std::panic::Location;
use std::result::Result as StdResult;
use std::time::Duration;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Unknown service: {name} {location}")]
    UnknownUnit {
        name: String,
        location: ErrorLocation,
    },

    #[error("Invalid unit {name}: {message} {location}")]
    InvalidUnit {
        name: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Port {port} is in use by a process this portal does not own {location}")]
    PortInUse { port: u16, location: ErrorLocation },

    #[error("Failed to spawn {name}: {source} {location}")]
    ProcessSpawn {
        name: String,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("{name} exited with code {code:?} before it was ready {location}")]
    ProcessExited {
        name: String,
        code: Option<i32>,
        output: String,
        location: ErrorLocation,
    },

    #[error("{name} failed to become ready within {timeout:?} {location}")]
    StartupTimeout {
        name: String,
        timeout: Duration,
        output: String,
        location: ErrorLocation,
    },

    #[error("Failed to terminate {name} (pid {pid:?}): {source} {location}")]
    Terminate {
        name: String,
        pid: Option<u32>,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("{name} was started but reports {status} {location}")]
    NotReady {
        name: String,
        status: UnitStatus,
        location: ErrorLocation,
    },

    #[error("HTTP client error: {source} {location}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },
}

impl SupervisorError {
    #[track_caller]
    pub fn unknown_unit(name: &str) -> Self {
        Self::UnknownUnit {
            name: name.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_unit<S: Into<String>>(name: &str, message: S) -> Self {
        Self::InvalidUnit {
            name: name.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Captured process output attached to a failed launch.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ProcessExited { output, .. } | Self::StartupTimeout { output, .. } => {
                Some(output.as_str())
            }
            _ => None,
        }
    }

    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::UnknownUnit { .. } => "Check the service name against GET /api/systems.",
            Self::InvalidUnit { .. } => {
                "The unit table has invalid settings. \
                   Fix the [[units]] entry in config.toml."
            }
            Self::PortInUse { .. } => {
                "Another program is already listening on the unit's port. \
                   Stop it or change the unit's port."
            }
            Self::ProcessSpawn { .. } => {
                "The unit's command could not be executed. \
                   Check the command and working directory."
            }
            Self::ProcessExited { .. } => {
                "The unit exited during startup. \
                   Inspect the captured output for the cause."
            }
            Self::StartupTimeout { .. } => {
                "The unit did not open its port in time. \
                   Try again or raise monitor.startup_timeout_secs."
            }
            Self::Terminate { .. } => {
                "The process could not be killed. \
                   Terminate it manually before starting the unit again."
            }
            _ => "An unexpected error occurred. Please check the logs for details.",
        }
    }
}

impl From<reqwest::Error> for SupervisorError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::HttpClient {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type SupervisorErrorResult<T> = StdResult<T, SupervisorError>;
