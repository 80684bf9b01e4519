//! fleet.toml configuration parser.
//!
//! Every section is optional; omitted fields fall back to the default
//! catalog parameterization.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::labels::*;
use crate::quantity::Quantity;
use crate::resources::ResourceList;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub catalog: CatalogAxes,
    pub pricing: PricingConfig,
    pub size: SizeThresholds,
    /// Fixed per-instance-type overhead, paid out of capacity. A missing
    /// table means the default overhead, an empty one means none.
    #[serde(default = "default_overhead")]
    pub overhead: ResourceList,
}

/// Parameter space the catalog builder enumerates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogAxes {
    pub cpus: Vec<u32>,
    /// Memory (GiB) per CPU.
    pub memory_ratios: Vec<u32>,
    pub architectures: Vec<String>,
    pub operating_systems: Vec<String>,
    pub zones: Vec<String>,
    pub capacity_classes: Vec<String>,
    /// Pod capacity of every built instance type.
    pub pods: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Price per CPU.
    pub cpu_rate: f64,
    /// Price per 10^9 bytes of memory.
    pub memory_rate_per_gb: f64,
    /// Price per accelerator unit.
    pub accelerator_surcharge: f64,
    /// Resource names billed as accelerators.
    pub accelerator_resources: Vec<String>,
}

/// An instance type is `large` when it exceeds both thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeThresholds {
    pub cpu: Quantity,
    pub memory: Quantity,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogAxes::default(),
            pricing: PricingConfig::default(),
            size: SizeThresholds::default(),
            overhead: default_overhead(),
        }
    }
}

impl Default for CatalogAxes {
    fn default() -> Self {
        Self {
            cpus: vec![1, 2, 4, 8, 16, 32, 64],
            memory_ratios: vec![1, 2, 4, 8, 16],
            architectures: vec![ARCH_AMD64.to_string(), ARCH_ARM64.to_string()],
            operating_systems: vec![OS_LINUX.to_string(), OS_WINDOWS.to_string()],
            zones: vec![
                "test-zone-1".to_string(),
                "test-zone-2".to_string(),
                "test-zone-3".to_string(),
            ],
            capacity_classes: vec![CAPACITY_SPOT.to_string(), CAPACITY_ON_DEMAND.to_string()],
            pods: 5,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cpu_rate: 0.1,
            memory_rate_per_gb: 0.1,
            accelerator_surcharge: 1.0,
            accelerator_resources: vec![
                RESOURCE_GPU_VENDOR_A.to_string(),
                RESOURCE_GPU_VENDOR_B.to_string(),
            ],
        }
    }
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            cpu: Quantity::from_units(4),
            memory: Quantity::from_gib(8),
        }
    }
}

/// Default overhead: 100m CPU and 10Mi memory.
pub fn default_overhead() -> ResourceList {
    ResourceList::new()
        .with(RESOURCE_CPU, Quantity::from_milli(100))
        .with(RESOURCE_MEMORY, Quantity::from_mib(10))
}

impl FleetConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: FleetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject empty or duplicated axes, memory sizes past the quantity range,
    /// negative rates and negative overhead.
    pub fn validate(&self) -> CoreResult<()> {
        let axes = &self.catalog;
        check_axis("cpus", &axes.cpus)?;
        check_axis("memory_ratios", &axes.memory_ratios)?;
        check_axis("architectures", &axes.architectures)?;
        check_axis("operating_systems", &axes.operating_systems)?;
        check_axis("zones", &axes.zones)?;
        check_axis("capacity_classes", &axes.capacity_classes)?;
        if axes.cpus.contains(&0) || axes.memory_ratios.contains(&0) {
            return Err(CoreError::InvalidConfig(
                "cpus and memory_ratios must be positive".to_string(),
            ));
        }
        let max_cpu = axes.cpus.iter().max().copied().unwrap_or(0);
        let max_ratio = axes.memory_ratios.iter().max().copied().unwrap_or(0);
        let max_memory_gib = u64::from(max_cpu) * u64::from(max_ratio);
        if Quantity::checked_from_gib(max_memory_gib).is_none() {
            return Err(CoreError::InvalidConfig(format!(
                "largest instance type needs {max_memory_gib}Gi of memory, which is out of range"
            )));
        }

        let pricing = &self.pricing;
        for (name, rate) in [
            ("cpu_rate", pricing.cpu_rate),
            ("memory_rate_per_gb", pricing.memory_rate_per_gb),
            ("accelerator_surcharge", pricing.accelerator_surcharge),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "pricing.{name} must be a non-negative number, got {rate}"
                )));
            }
        }

        if let Some(name) = self.overhead.negative_entries().first() {
            return Err(CoreError::InvalidConfig(format!(
                "overhead.{name} must not be negative"
            )));
        }
        Ok(())
    }
}

fn check_axis<T: Ord>(name: &str, values: &[T]) -> CoreResult<()> {
    if values.is_empty() {
        return Err(CoreError::InvalidConfig(format!("catalog.{name} must not be empty")));
    }
    let unique: BTreeSet<&T> = values.iter().collect();
    if unique.len() != values.len() {
        return Err(CoreError::InvalidConfig(format!(
            "catalog.{name} contains duplicates"
        )));
    }
    Ok(())
}
