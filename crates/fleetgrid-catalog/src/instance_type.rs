//! Instance types — named capacity profiles with requirements and offerings.

use serde::Serialize;

use fleet_core::labels::*;
use fleet_core::{FleetConfig, Operator, Quantity, Requirement, Requirements, ResourceList};

use crate::error::CatalogResult;
use crate::offering::{Offering, Offerings};
use crate::pricing::{SizeClass, price_from_resources, size_class};

/// An immutable capacity profile.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceType {
    name: String,
    requirements: Requirements,
    capacity: ResourceList,
    overhead: ResourceList,
    offerings: Offerings,
}

/// Inputs for a single hand-built instance type.
///
/// Empty fields are filled with defaults: 4 CPU, 4Gi memory, 5 pods,
/// `amd64`, linux/windows/darwin, and a spread of spot and on-demand
/// offerings across three zones.
#[derive(Debug, Clone, Default)]
pub struct InstanceTypeOptions {
    pub name: String,
    pub architecture: Option<String>,
    pub operating_systems: Vec<String>,
    pub resources: ResourceList,
    pub offerings: Offerings,
}

impl InstanceType {
    /// Assemble an instance type from already-derived parts.
    pub fn new(
        name: impl Into<String>,
        requirements: Requirements,
        capacity: ResourceList,
        overhead: ResourceList,
        offerings: Offerings,
    ) -> Self {
        Self {
            name: name.into(),
            requirements,
            capacity,
            overhead,
            offerings,
        }
    }

    /// Build an instance type from options, deriving its requirement set
    /// and pricing its default offerings from `config`.
    pub fn from_options(options: InstanceTypeOptions, config: &FleetConfig) -> CatalogResult<Self> {
        let InstanceTypeOptions {
            name,
            architecture,
            mut operating_systems,
            mut resources,
            mut offerings,
        } = options;

        if resources.cpu().is_zero() {
            resources.insert(RESOURCE_CPU, Quantity::from_units(4));
        }
        if resources.memory().is_zero() {
            resources.insert(RESOURCE_MEMORY, Quantity::from_gib(4));
        }
        if resources.pods().is_zero() {
            resources.insert(RESOURCE_PODS, Quantity::from_units(5));
        }
        if offerings.is_empty() {
            let price = price_from_resources(&resources, &config.pricing);
            offerings = [
                ("test-zone-1", CAPACITY_SPOT),
                ("test-zone-2", CAPACITY_SPOT),
                ("test-zone-1", CAPACITY_ON_DEMAND),
                ("test-zone-2", CAPACITY_ON_DEMAND),
                ("test-zone-3", CAPACITY_ON_DEMAND),
            ]
            .into_iter()
            .map(|(zone, class)| Offering::new(zone, class, price))
            .collect();
        }
        let architecture = architecture.unwrap_or_else(|| ARCH_AMD64.to_string());
        if operating_systems.is_empty() {
            operating_systems = [OS_LINUX, OS_WINDOWS, OS_DARWIN].map(String::from).to_vec();
        }

        let size = size_class(&resources, &config.size);
        let requirements = derive_requirements(
            &name,
            &architecture,
            &operating_systems,
            &resources,
            &offerings,
            size,
        )?;

        Ok(Self::new(name, requirements, resources, config.overhead.clone(), offerings))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn capacity(&self) -> &ResourceList {
        &self.capacity
    }

    pub fn overhead(&self) -> &ResourceList {
        &self.overhead
    }

    pub fn offerings(&self) -> &Offerings {
        &self.offerings
    }

    /// `max(0, capacity - overhead)` per capacity entry.
    pub fn allocatable(&self) -> ResourceList {
        self.capacity.subtract_clamped(&self.overhead)
    }

    /// The size-class label value, if the instance type carries one.
    pub fn size(&self) -> Option<&str> {
        self.requirements.get(LABEL_INSTANCE_SIZE)?.first_value()
    }
}

/// Requirement set describing an instance type's static attributes.
///
/// Zone and capacity-class requirements list only what is reachable
/// through available offerings; with none available the label is
/// required to be absent.
fn derive_requirements(
    name: &str,
    architecture: &str,
    operating_systems: &[String],
    resources: &ResourceList,
    offerings: &Offerings,
    size: SizeClass,
) -> CatalogResult<Requirements> {
    let reachable = |key: &str, values: Vec<&str>| -> CatalogResult<Requirement> {
        if values.is_empty() {
            Ok(Requirement::does_not_exist(key))
        } else {
            Ok(Requirement::new(key, Operator::In, values)?)
        }
    };

    let mut requirements = Requirements::new()
        .with(Requirement::in_value(LABEL_INSTANCE_TYPE, name))
        .with(Requirement::in_value(LABEL_ARCH, architecture))
        .with(Requirement::new(LABEL_OS, Operator::In, operating_systems.iter().map(String::as_str))?)
        .with(reachable(LABEL_ZONE, offerings.zones())?)
        .with(reachable(LABEL_CAPACITY_TYPE, offerings.capacity_classes())?)
        .with(Requirement::in_value(LABEL_INTEGER, resources.cpu().value().to_string()))
        .with(Requirement::in_value(LABEL_INSTANCE_SIZE, size.as_str()));

    requirements.add(match size {
        SizeClass::Large => Requirement::in_value(LABEL_EXOTIC, EXOTIC_OPTIONAL),
        SizeClass::Small => Requirement::does_not_exist(LABEL_EXOTIC),
    });

    Ok(requirements)
}
