//! In-process provisioning backend.
//!
//! Keeps units in a map and names them `node-1`, `node-2`, ... in creation
//! order. Used by tests and the CLI dry run.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use fleet_core::labels::LABEL_ZONE;

use crate::error::ProvisionError;
use crate::materialize::{ProcuredUnit, ProcurementDirective};
use crate::provider::{NodeProvisioner, ProvisionFuture};

#[derive(Debug, Default)]
pub struct MemoryProvisioner {
    nodes: Mutex<BTreeMap<String, ProcuredUnit>>,
    next_id: AtomicU64,
    reported_zone: Option<String>,
}

impl MemoryProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every created unit in `zone`, whatever the directive asked for.
    pub fn with_reported_zone(mut self, zone: impl Into<String>) -> Self {
        self.reported_zone = Some(zone.into());
        self
    }

    /// Register a unit directly, bypassing `create`.
    pub fn insert(&self, unit: ProcuredUnit) {
        self.nodes
            .lock()
            .expect("nodes lock")
            .insert(unit.name.clone(), unit);
    }

    pub fn names(&self) -> Vec<String> {
        self.nodes.lock().expect("nodes lock").keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().expect("nodes lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn create_unit(&self, directive: &ProcurementDirective) -> ProcuredUnit {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut labels = directive.labels.clone();
        if let Some(zone) = &self.reported_zone {
            labels.insert(LABEL_ZONE.to_string(), zone.clone());
        }
        let unit = ProcuredUnit::new(format!("node-{id}"), labels);
        self.insert(unit.clone());
        unit
    }

    fn get_unit(&self, name: &str) -> Result<ProcuredUnit, ProvisionError> {
        self.nodes
            .lock()
            .expect("nodes lock")
            .get(name)
            .cloned()
            .ok_or_else(|| ProvisionError::NodeNotFound(name.to_string()))
    }

    fn delete_unit(&self, name: &str) -> Result<(), ProvisionError> {
        self.nodes
            .lock()
            .expect("nodes lock")
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ProvisionError::NodeNotFound(name.to_string()))
    }
}

impl NodeProvisioner for MemoryProvisioner {
    fn create<'a>(&'a self, directive: &'a ProcurementDirective) -> ProvisionFuture<'a, ProcuredUnit> {
        Box::pin(async move { Ok(self.create_unit(directive)) })
    }

    fn get<'a>(&'a self, name: &'a str) -> ProvisionFuture<'a, ProcuredUnit> {
        Box::pin(async move { self.get_unit(name) })
    }

    fn delete<'a>(&'a self, name: &'a str) -> ProvisionFuture<'a, ()> {
        Box::pin(async move { self.delete_unit(name) })
    }
}
