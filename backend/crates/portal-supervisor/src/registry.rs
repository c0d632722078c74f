use crate::{SupervisorError, SupervisorErrorResult, UnitDescriptor, UnitSnapshot};

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Shared map from unit name to descriptor.
///
/// The unit set is fixed at construction; only descriptor fields change.
/// Every access holds the lock for one descriptor update and never across
/// network or process waits.
#[derive(Debug)]
pub struct Registry {
    units: RwLock<HashMap<String, UnitDescriptor>>,
    order: Vec<String>,
    routes: Vec<(String, String)>,
}

impl Registry {
    pub fn new(descriptors: Vec<UnitDescriptor>) -> SupervisorErrorResult<Self> {
        let mut units = HashMap::with_capacity(descriptors.len());
        let mut order = Vec::with_capacity(descriptors.len());
        let mut routes = Vec::new();

        for descriptor in descriptors {
            if units.contains_key(&descriptor.name) {
                return Err(SupervisorError::invalid_unit(
                    &descriptor.name,
                    "duplicate unit name",
                ));
            }
            order.push(descriptor.name.clone());
            if let Some(route) = descriptor.route() {
                if routes.iter().any(|(_, mounted)| mounted == route) {
                    return Err(SupervisorError::invalid_unit(
                        &descriptor.name,
                        format!("route {route} is already mounted"),
                    ));
                }
                routes.push((descriptor.name.clone(), route.to_string()));
            }
            units.insert(descriptor.name.clone(), descriptor);
        }

        Ok(Self {
            units: RwLock::new(units),
            order,
            routes,
        })
    }

    /// Unit names in configuration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// `(name, route)` of every in-process unit, for mounting on the router.
    pub fn in_process_routes(&self) -> &[(String, String)] {
        &self.routes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub async fn read<R>(
        &self,
        name: &str,
        f: impl FnOnce(&UnitDescriptor) -> R,
    ) -> SupervisorErrorResult<R> {
        let units = self.units.read().await;
        let descriptor = units
            .get(name)
            .ok_or_else(|| SupervisorError::unknown_unit(name))?;
        Ok(f(descriptor))
    }

    pub async fn update<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut UnitDescriptor) -> R,
    ) -> SupervisorErrorResult<R> {
        let mut units = self.units.write().await;
        let descriptor = units
            .get_mut(name)
            .ok_or_else(|| SupervisorError::unknown_unit(name))?;
        Ok(f(descriptor))
    }

    pub async fn snapshot(&self, name: &str) -> SupervisorErrorResult<UnitSnapshot> {
        self.read(name, UnitDescriptor::snapshot).await
    }

    /// Snapshots of every unit in configuration order.
    pub async fn snapshots(&self) -> Vec<UnitSnapshot> {
        let units = self.units.read().await;
        self.order
            .iter()
            .filter_map(|name| units.get(name).map(UnitDescriptor::snapshot))
            .collect()
    }
}
