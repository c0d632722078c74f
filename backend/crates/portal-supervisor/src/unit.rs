use crate::{ProcessHandle, SupervisorError, SupervisorErrorResult};

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use portal_config::{ServerConfig, UnitConfig, UnitKindConfig};
use serde::Serialize;

/// How to run an out-of-process unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub port: u16,
    /// argv; the first element is the program
    pub command: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// A route group mounted on the portal itself
    InProcess { route: String },
    /// A separately spawned program bound to its own port
    OutOfProcess(ProcessSpec),
}

impl UnitKind {
    pub fn is_in_process(&self) -> bool {
        matches!(self, Self::InProcess { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProcess { .. } => "in_process",
            Self::OutOfProcess(_) => "out_of_process",
        }
    }
}

/// Configuration plus runtime state of one managed unit.
#[derive(Debug)]
pub struct UnitDescriptor {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub kind: UnitKind,
    /// Resolved liveness/health URL
    pub check_url: String,

    pub(crate) process: Option<ProcessHandle>,
    pub state: UnitState,
}

/// Runtime bookkeeping of one unit. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnitState {
    pub started: bool,
    pub last_health_check: Option<DateTime<Utc>>,
    /// Consecutive failed liveness checks
    pub health_check_failures: u32,
    /// Successful automatic restarts
    pub restart_count: u32,
    pub last_restart: Option<DateTime<Utc>>,
    /// Set by an operator stop, cleared by the next start
    pub auto_restart_disabled: bool,
    pub spawn_count: u32,
    /// Output tail of the most recent failed launch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_output: Option<String>,
}

impl UnitDescriptor {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: UnitKind,
        check_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
            kind,
            check_url: check_url.into(),
            process: None,
            state: UnitState::default(),
        }
    }

    /// Build a descriptor from its `[[units]]` entry.
    ///
    /// In-process units are probed through the portal's own listener at
    /// `{base}{route}/`, out-of-process units at `http://127.0.0.1:{port}/`,
    /// unless an explicit `check_url` is configured.
    pub fn from_config(unit: &UnitConfig, server: &ServerConfig) -> SupervisorErrorResult<Self> {
        let kind = match unit.kind {
            UnitKindConfig::InProcess => {
                let route = unit.route.clone().ok_or_else(|| {
                    SupervisorError::invalid_unit(&unit.name, "in-process unit without a route")
                })?;
                UnitKind::InProcess { route }
            }
            UnitKindConfig::OutOfProcess => {
                let port = unit.port.filter(|p| *p > 0).ok_or_else(|| {
                    SupervisorError::invalid_unit(&unit.name, "out-of-process unit without a port")
                })?;
                if unit.command.is_empty() {
                    return Err(SupervisorError::invalid_unit(
                        &unit.name,
                        "out-of-process unit without a command",
                    ));
                }
                UnitKind::OutOfProcess(ProcessSpec {
                    port,
                    command: unit.command.clone(),
                    working_dir: unit.working_dir.as_ref().map(PathBuf::from),
                    env: unit.env.clone(),
                })
            }
        };

        let check_url = match (&unit.check_url, &kind) {
            (Some(url), _) => url.clone(),
            (None, UnitKind::InProcess { route }) => {
                format!("{}{}/", server.local_base_url(), route)
            }
            (None, UnitKind::OutOfProcess(spec)) => format!("http://127.0.0.1:{}/", spec.port),
        };

        let mut descriptor = Self::new(&unit.name, &unit.display_name, kind, check_url);
        descriptor.description = unit.description.clone();
        descriptor.icon = unit.icon.clone();
        descriptor.color = unit.color.clone();
        Ok(descriptor)
    }

    pub fn route(&self) -> Option<&str> {
        match &self.kind {
            UnitKind::InProcess { route } => Some(route),
            UnitKind::OutOfProcess(_) => None,
        }
    }

    pub fn port(&self) -> Option<u16> {
        match &self.kind {
            UnitKind::InProcess { .. } => None,
            UnitKind::OutOfProcess(spec) => Some(spec.port),
        }
    }

    /// Where an operator reaches the unit: a portal path for in-process
    /// units, the unit's own listener otherwise.
    pub fn service_url(&self) -> String {
        match &self.kind {
            UnitKind::InProcess { route } => format!("{route}/"),
            UnitKind::OutOfProcess(spec) => format!("http://127.0.0.1:{}/", spec.port),
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(ProcessHandle::pid)
    }

    pub fn has_process(&self) -> bool {
        self.process.is_some()
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            kind: self.kind.as_str(),
            route: self.route().map(String::from),
            port: self.port(),
            check_url: self.check_url.clone(),
            service_url: self.service_url(),
            pid: self.pid(),
            state: self.state.clone(),
        }
    }
}

/// Point-in-time copy of a descriptor, without the process handle.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub check_url: String,
    pub service_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(flatten)]
    pub state: UnitState,
}
