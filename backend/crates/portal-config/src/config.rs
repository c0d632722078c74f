use crate::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult, HealthConfig,
    LoggingConfig, MonitorConfig, ServerConfig, UnitConfig, UnitKindConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub monitor: MonitorConfig,
    pub health: HealthConfig,
    pub units: Vec<UnitConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            monitor: MonitorConfig::default(),
            health: HealthConfig::default(),
            units: UnitConfig::defaults(),
        }
    }
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for PORTAL_CONFIG_DIR env var, else use ./.portal/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply PORTAL_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        Self::from_toml_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Parse a config document without touching the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config directory.
    /// Priority: PORTAL_CONFIG_DIR env var > ./.portal/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("PORTAL_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.monitor.validate()?;
        self.health.validate()?;
        UnitConfig::validate_all(&self.units)?;

        for unit in &self.units {
            if unit.kind == UnitKindConfig::OutOfProcess && unit.port == Some(self.server.port) {
                return Err(ConfigError::unit(format!(
                    "units.{} cannot share the portal port {}",
                    unit.name, self.server.port
                )));
            }
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  monitor: {} every {}s, restarts={}, cooldown={}s, failures={}",
            if self.monitor.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.monitor.interval_secs,
            self.monitor.max_restart_attempts,
            self.monitor.restart_cooldown_secs,
            self.monitor.max_health_check_failures
        );
        info!(
            "  health: timeout={}s, workers={}",
            self.health.timeout_secs, self.health.workers
        );
        info!("  units: {}", self.units.len());
        for unit in &self.units {
            match unit.kind {
                UnitKindConfig::InProcess => info!(
                    "    - {} ({}): in-process at {}",
                    unit.name,
                    unit.display_name,
                    unit.route.as_deref().unwrap_or("-")
                ),
                UnitKindConfig::OutOfProcess => info!(
                    "    - {} ({}): out-of-process on port {}",
                    unit.name,
                    unit.display_name,
                    unit.port.unwrap_or(0)
                ),
            }
        }
    }

    fn apply_env_overrides(&mut self) -> ConfigErrorResult<()> {
        // Server
        Self::apply_env_string("PORTAL_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("PORTAL_SERVER_PORT", &mut self.server.port)?;

        // Logging
        Self::apply_env_parse("PORTAL_LOG_LEVEL", &mut self.logging.level)?;
        Self::apply_env_bool("PORTAL_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("PORTAL_LOG_FILE", &mut self.logging.file);

        // Monitor
        Self::apply_env_bool("PORTAL_MONITOR_ENABLED", &mut self.monitor.enabled);
        Self::apply_env_parse(
            "PORTAL_MONITOR_INTERVAL_SECS",
            &mut self.monitor.interval_secs,
        )?;
        Self::apply_env_parse(
            "PORTAL_MAX_RESTART_ATTEMPTS",
            &mut self.monitor.max_restart_attempts,
        )?;
        Self::apply_env_parse(
            "PORTAL_RESTART_COOLDOWN_SECS",
            &mut self.monitor.restart_cooldown_secs,
        )?;
        Self::apply_env_parse(
            "PORTAL_MAX_HEALTH_CHECK_FAILURES",
            &mut self.monitor.max_health_check_failures,
        )?;

        // Health
        Self::apply_env_parse("PORTAL_HEALTH_TIMEOUT_SECS", &mut self.health.timeout_secs)?;
        Self::apply_env_parse("PORTAL_HEALTH_WORKERS", &mut self.health.workers)?;

        // Units
        for unit in &mut self.units {
            let prefix = unit.env_prefix();

            Self::apply_env_parse(&format!("{prefix}KIND"), &mut unit.kind)?;

            let mut port = unit.port.unwrap_or_default();
            if Self::apply_env_parse(&format!("{prefix}PORT"), &mut port)? {
                unit.port = Some(port);
            }

            if let Ok(val) = std::env::var(format!("{prefix}COMMAND")) {
                unit.command = val.split_whitespace().map(String::from).collect();
            }
            Self::apply_env_option_string(&format!("{prefix}CWD"), &mut unit.working_dir);
        }

        Ok(())
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values.
    ///
    /// Returns whether the variable was set. A value that does not parse is
    /// an error rather than a silent fallback.
    fn apply_env_parse<T>(var_name: &str, target: &mut T) -> ConfigErrorResult<bool>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        let Ok(val) = std::env::var(var_name) else {
            return Ok(false);
        };

        *target = val
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::env_var(var_name, &val, e.to_string()))?;
        Ok(true)
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
