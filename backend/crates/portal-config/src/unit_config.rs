use crate::{ConfigError, ConfigErrorResult};

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

/// First path segments owned by the portal's own endpoints.
pub const RESERVED_ROUTE_SEGMENTS: &[&str] = &["api", "health", "live", "ready", "metrics"];

/// How a unit is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKindConfig {
    /// Routes mounted on the portal itself
    InProcess,
    /// Separate program bound to its own port
    OutOfProcess,
}

impl std::str::FromStr for UnitKindConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "in_process" => Ok(Self::InProcess),
            "out_of_process" => Ok(Self::OutOfProcess),
            other => Err(ConfigError::unit(format!("unknown unit kind '{other}'"))),
        }
    }
}

/// One managed subsystem as written in `[[units]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub kind: UnitKindConfig,
    /// Path prefix inside the portal (`/writing`)
    #[serde(default)]
    pub route: Option<String>,
    /// Listening port of an out-of-process unit
    #[serde(default)]
    pub port: Option<u16>,
    /// argv of an out-of-process unit
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Extra environment for an out-of-process unit
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Explicit liveness URL; derived from route or port when absent
    #[serde(default)]
    pub check_url: Option<String>,
}

impl UnitConfig {
    fn in_process(name: &str, display_name: &str, description: &str, icon: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind: UnitKindConfig::InProcess,
            route: Some(format!("/{name}")),
            port: None,
            command: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
            check_url: None,
        }
    }

    /// The subsystems the portal ships with, all mounted in-process.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::in_process(
                "writing",
                "Document Writing",
                "Official document and article generation",
                "📝",
                "#4CAF50",
            ),
            Self::in_process(
                "qa_sys",
                "Business Q&A",
                "Approval-office business question answering",
                "🏢",
                "#17a2b8",
            ),
            Self::in_process(
                "case2pg",
                "Data Processing",
                "Case file extraction into the database",
                "📊",
                "#FF9800",
            ),
            Self::in_process(
                "censor",
                "File Review",
                "Document and contract review",
                "🔍",
                "#9C27B0",
            ),
            Self::in_process(
                "meeting_minutes",
                "Meeting Minutes",
                "Meeting minutes from audio recordings",
                "🎙",
                "#3F51B5",
            ),
        ]
    }

    /// Environment variable prefix for per-unit overrides (`PORTAL_UNIT_QA_SYS_`).
    pub fn env_prefix(&self) -> String {
        format!(
            "PORTAL_UNIT_{}_",
            self.name.to_uppercase().replace(['-', '.'], "_")
        )
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        let valid_name = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !valid_name {
            return Err(ConfigError::unit(format!(
                "unit name must be non-empty [a-z0-9_-], got '{}'",
                self.name
            )));
        }

        if let Some(ref route) = self.route
            && (!route.starts_with('/') || route.len() < 2 || route.ends_with('/'))
        {
            return Err(ConfigError::unit(format!(
                "units.{}.route must look like '/name', got '{}'",
                self.name, route
            )));
        }

        if let Some(ref route) = self.route {
            let first_segment = route.trim_start_matches('/').split('/').next().unwrap_or("");
            if RESERVED_ROUTE_SEGMENTS.contains(&first_segment) {
                return Err(ConfigError::unit(format!(
                    "units.{}.route '{}' collides with a portal endpoint",
                    self.name, route
                )));
            }
        }

        if let Some(ref url) = self.check_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::unit(format!(
                "units.{}.check_url must be an http(s) URL, got '{}'",
                self.name, url
            )));
        }

        match self.kind {
            UnitKindConfig::InProcess => {
                if self.route.is_none() {
                    return Err(ConfigError::unit(format!(
                        "units.{} is in_process and needs a route",
                        self.name
                    )));
                }
            }
            UnitKindConfig::OutOfProcess => {
                match self.port {
                    Some(port) if port > 0 => {}
                    _ => {
                        return Err(ConfigError::unit(format!(
                            "units.{} is out_of_process and needs a non-zero port",
                            self.name
                        )));
                    }
                }
                if self.command.is_empty() {
                    return Err(ConfigError::unit(format!(
                        "units.{} is out_of_process and needs a command",
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validate a whole unit table, including name uniqueness.
    pub fn validate_all(units: &[UnitConfig]) -> ConfigErrorResult<()> {
        let mut seen = HashSet::new();
        let mut routes = HashSet::new();
        for unit in units {
            unit.validate()?;
            if !seen.insert(unit.name.as_str()) {
                return Err(ConfigError::unit(format!(
                    "duplicate unit name '{}'",
                    unit.name
                )));
            }
            if let Some(ref route) = unit.route
                && unit.kind == UnitKindConfig::InProcess
                && !routes.insert(route.as_str())
            {
                return Err(ConfigError::unit(format!(
                    "units.{}.route '{}' is already mounted by another unit",
                    unit.name, route
                )));
            }
        }
        Ok(())
    }
}
