use serde::Serialize;

/// Classified outcome of one health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Down,
    Timeout,
    Error,
    /// Reporter only: the unit answers or is unreachable while not started
    Stopped,
}

impl HealthStatus {
    /// Classify an HTTP status code: 200 healthy, 4xx degraded, anything else unhealthy.
    pub fn from_http_status(code: u16) -> Self {
        match code {
            200 => Self::Healthy,
            400..=499 => Self::Degraded,
            _ => Self::Unhealthy,
        }
    }
}

/// Fold of every unit's health into one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Critical,
}

impl OverallStatus {
    pub fn fold<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = HealthStatus>,
    {
        statuses
            .into_iter()
            .map(|status| match status {
                HealthStatus::Down | HealthStatus::Error => Self::Critical,
                HealthStatus::Unhealthy | HealthStatus::Timeout => Self::Unhealthy,
                HealthStatus::Degraded => Self::Degraded,
                HealthStatus::Healthy | HealthStatus::Stopped => Self::Healthy,
            })
            .max()
            .unwrap_or(Self::Healthy)
    }
}
