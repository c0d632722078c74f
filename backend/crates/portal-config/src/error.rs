use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    /// A section failed validation; `category` names the section
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid value for {name}: '{value}' ({message}) {location}")]
    EnvVar {
        name: String,
        value: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn generic<S: Into<String>>(category: &'static str, message: S) -> Self {
        ConfigError::Generic {
            category,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// `[server]`, `[logging]` and whole-file problems
    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::generic("Config", message)
    }

    #[track_caller]
    pub fn monitor<S: Into<String>>(message: S) -> Self {
        Self::generic("Monitor", message)
    }

    #[track_caller]
    pub fn health<S: Into<String>>(message: S) -> Self {
        Self::generic("Health", message)
    }

    /// A `[[units]]` entry, or the unit table as a whole
    #[track_caller]
    pub fn unit<S: Into<String>>(message: S) -> Self {
        Self::generic("Unit", message)
    }

    /// A `PORTAL_*` override that does not parse
    #[track_caller]
    pub fn env_var<S: Into<String>>(name: &str, value: &str, message: S) -> Self {
        ConfigError::EnvVar {
            name: name.to_string(),
            value: value.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
