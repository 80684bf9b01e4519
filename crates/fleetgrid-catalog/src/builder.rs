//! Catalog builder — enumerates the configured parameter space.
//!
//! One instance type per (cpu, memory ratio, architecture). Zones and
//! capacity classes only parameterize offerings: every instance type gets
//! one offering per (zone, class) pair, all priced from its capacity.

use tracing::{debug, info};

use fleet_core::labels::{RESOURCE_CPU, RESOURCE_MEMORY, RESOURCE_PODS};
use fleet_core::{CoreError, FleetConfig, Quantity, ResourceList};

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::instance_type::{InstanceType, InstanceTypeOptions};
use crate::offering::{Offering, Offerings};
use crate::pricing::price_from_resources;

/// Deterministic, unique name for a (cpu, memory GiB, architecture) shape.
pub fn instance_type_name(cpu: u32, memory_gib: u64, architecture: &str) -> String {
    format!("{cpu}-{memory_gib}-{architecture}")
}

/// Build the full catalog described by `config`.
pub fn build_catalog(config: &FleetConfig) -> CatalogResult<Catalog> {
    config.validate()?;
    let axes = &config.catalog;

    let mut instance_types = Vec::new();
    for &cpu in &axes.cpus {
        for &ratio in &axes.memory_ratios {
            for architecture in &axes.architectures {
                let memory_gib = u64::from(cpu) * u64::from(ratio);
                let name = instance_type_name(cpu, memory_gib, architecture);
                let memory = Quantity::checked_from_gib(memory_gib).ok_or_else(|| {
                    CoreError::InvalidConfig(format!("{name}: {memory_gib}Gi of memory is out of range"))
                })?;
                let resources = ResourceList::new()
                    .with(RESOURCE_CPU, Quantity::from_units(i64::from(cpu)))
                    .with(RESOURCE_MEMORY, memory)
                    .with(RESOURCE_PODS, Quantity::from_units(i64::from(axes.pods)));

                let price = price_from_resources(&resources, &config.pricing);
                let mut offerings = Offerings::new();
                for zone in &axes.zones {
                    for class in &axes.capacity_classes {
                        offerings.push(Offering::new(zone.as_str(), class.as_str(), price));
                    }
                }

                let instance_type = InstanceType::from_options(
                    InstanceTypeOptions {
                        name,
                        architecture: Some(architecture.clone()),
                        operating_systems: axes.operating_systems.clone(),
                        resources,
                        offerings,
                    },
                    config,
                )?;
                debug!(
                    instance_type = instance_type.name(),
                    offerings = instance_type.offerings().len(),
                    price,
                    "built instance type"
                );
                instance_types.push(instance_type);
            }
        }
    }

    let catalog = Catalog::from_instance_types(instance_types)?;
    info!(instance_types = catalog.len(), "catalog built");
    Ok(catalog)
}
