//! Materialization — labels and resources handed to and reported back from
//! the node-provisioning collaborator.
//!
//! Outbound, a [`ProcurementDirective`] carries the label set a new compute
//! unit should wear. Inbound, a [`ProcuredUnit`] reports what was actually
//! created, and [`materialize`] folds it into the final [`NodeClaim`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fleet_core::ResourceList;
use fleet_core::labels::{LABEL_CAPACITY_TYPE, LABEL_INSTANCE_TYPE, LABEL_NODE_NAME, LABEL_ZONE};
use fleetgrid_catalog::{InstanceType, Offering};

/// What the provisioning collaborator is asked to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementDirective {
    pub instance_type: String,
    pub zone: String,
    pub capacity_class: String,
    pub price: f64,
    pub labels: BTreeMap<String, String>,
}

impl ProcurementDirective {
    /// Default labels of `instance_type`, pinned to `offering`'s zone and
    /// capacity class.
    pub fn new(instance_type: &InstanceType, offering: &Offering) -> Self {
        let mut labels = instance_type.requirements().labels();
        labels.insert(LABEL_ZONE.to_string(), offering.zone().to_string());
        labels.insert(
            LABEL_CAPACITY_TYPE.to_string(),
            offering.capacity_class().to_string(),
        );
        Self {
            instance_type: instance_type.name().to_string(),
            zone: offering.zone().to_string(),
            capacity_class: offering.capacity_class().to_string(),
            price: offering.price(),
            labels,
        }
    }
}

/// A compute unit as reported by the provisioning collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcuredUnit {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl ProcuredUnit {
    pub fn new(name: impl Into<String>, labels: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn instance_type(&self) -> Option<&str> {
        self.label(LABEL_INSTANCE_TYPE)
    }

    pub fn zone(&self) -> Option<&str> {
        self.label(LABEL_ZONE)
    }

    pub fn capacity_class(&self) -> Option<&str> {
        self.label(LABEL_CAPACITY_TYPE)
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// The final result record for a provisioned unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeClaim {
    pub name: String,
    pub instance_type: String,
    pub labels: BTreeMap<String, String>,
    /// Non-zero capacity entries only.
    pub capacity: ResourceList,
    /// Non-zero allocatable entries only.
    pub allocatable: ResourceList,
}

/// Fold a procured unit back onto the instance type it was created from.
///
/// Labels start from the first value of every `In` requirement; zone and
/// capacity class reported by the unit win over the catalog defaults.
pub fn materialize(instance_type: &InstanceType, unit: &ProcuredUnit) -> NodeClaim {
    let mut labels = instance_type.requirements().labels();
    if let Some(zone) = unit.zone() {
        labels.insert(LABEL_ZONE.to_string(), zone.to_string());
    }
    if let Some(class) = unit.capacity_class() {
        labels.insert(LABEL_CAPACITY_TYPE.to_string(), class.to_string());
    }
    labels.insert(LABEL_NODE_NAME.to_string(), unit.name.clone());

    NodeClaim {
        name: unit.name.clone(),
        instance_type: instance_type.name().to_string(),
        labels,
        capacity: instance_type.capacity().non_zero(),
        allocatable: instance_type.allocatable().non_zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::labels::*;
    use fleet_core::{FleetConfig, Quantity, ResourceList};
    use fleetgrid_catalog::{InstanceTypeOptions, Offerings};

    fn instance_type() -> InstanceType {
        let offerings: Offerings = [
            Offering::new("zone-1", CAPACITY_SPOT, 0.4),
            Offering::new("zone-2", CAPACITY_ON_DEMAND, 0.6),
        ]
        .into_iter()
        .collect();
        InstanceType::from_options(
            InstanceTypeOptions {
                name: "m".to_string(),
                resources: ResourceList::new()
                    .with(RESOURCE_CPU, Quantity::from_units(2))
                    .with(RESOURCE_MEMORY, Quantity::from_gib(4))
                    .with(RESOURCE_GPU_VENDOR_A, Quantity::ZERO),
                offerings,
                ..Default::default()
            },
            &FleetConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn directive_pins_offering_zone_and_class() {
        let it = instance_type();
        let offering = it.offerings().iter().nth(1).unwrap();
        let directive = ProcurementDirective::new(&it, offering);

        assert_eq!(directive.instance_type, "m");
        assert_eq!(directive.price, 0.6);
        assert_eq!(directive.labels[LABEL_ZONE], "zone-2");
        assert_eq!(directive.labels[LABEL_CAPACITY_TYPE], CAPACITY_ON_DEMAND);
        assert_eq!(directive.labels[LABEL_INSTANCE_TYPE], "m");
        assert_eq!(directive.labels[LABEL_ARCH], ARCH_AMD64);
    }

    #[test]
    fn default_labels_take_first_inserted_value() {
        let it = instance_type();
        let claim = materialize(&it, &ProcuredUnit::new("n", BTreeMap::new()));
        assert_eq!(claim.labels[LABEL_ZONE], "zone-1");
        assert_eq!(claim.labels[LABEL_CAPACITY_TYPE], CAPACITY_SPOT);
        assert_eq!(claim.labels[LABEL_OS], OS_LINUX);
    }

    #[test]
    fn reported_zone_and_class_override_defaults() {
        let it = instance_type();
        let unit = ProcuredUnit::new(
            "node-7",
            BTreeMap::from([
                (LABEL_ZONE.to_string(), "zone-9".to_string()),
                (LABEL_CAPACITY_TYPE.to_string(), CAPACITY_ON_DEMAND.to_string()),
            ]),
        );
        let claim = materialize(&it, &unit);

        assert_eq!(claim.name, "node-7");
        assert_eq!(claim.labels[LABEL_ZONE], "zone-9");
        assert_eq!(claim.labels[LABEL_CAPACITY_TYPE], CAPACITY_ON_DEMAND);
        assert_eq!(claim.labels[LABEL_NODE_NAME], "node-7");
    }

    #[test]
    fn zero_quantities_are_omitted() {
        let claim = materialize(&instance_type(), &ProcuredUnit::new("n", BTreeMap::new()));

        assert!(!claim.capacity.contains(RESOURCE_GPU_VENDOR_A));
        assert!(!claim.allocatable.contains(RESOURCE_GPU_VENDOR_A));
        assert_eq!(claim.capacity.cpu(), Quantity::from_units(2));
        assert_eq!(claim.allocatable.cpu(), Quantity::from_milli(1900));
    }
}
