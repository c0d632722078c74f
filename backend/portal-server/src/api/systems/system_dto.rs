use portal_supervisor::UnitSnapshot;

use serde::Serialize;

/// Display metadata for one subsystem
#[derive(Debug, Serialize)]
pub struct SystemDto {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    /// Where the browser should go to use the subsystem
    pub url: String,
    pub kind: String,
}

impl From<UnitSnapshot> for SystemDto {
    fn from(unit: UnitSnapshot) -> Self {
        Self {
            name: unit.name,
            display_name: unit.display_name,
            description: unit.description,
            icon: unit.icon,
            color: unit.color,
            url: unit.service_url,
            kind: unit.kind.to_string(),
        }
    }
}
