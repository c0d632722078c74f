mod config;
mod error;
mod health_config;
mod log_level;
mod logging_config;
mod monitor_config;
mod server_config;
mod unit_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use health_config::HealthConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use monitor_config::MonitorConfig;
pub use server_config::ServerConfig;
pub use unit_config::{UnitConfig, UnitKindConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9000;
const MIN_PORT: u16 = 1024;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "logs";
const DEFAULT_LOG_COLORED: bool = true;

/// Directory name used when `PORTAL_CONFIG_DIR` is not set.
pub const CONFIG_DIR_NAME: &str = ".portal";
/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
