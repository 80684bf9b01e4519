//! Pricing and size classification.
//!
//! Both are pure functions of a capacity vector so they can be tested
//! apart from offerings and requirements.

use serde::{Deserialize, Serialize};

use fleet_core::labels::{RESOURCE_CPU, RESOURCE_MEMORY};
use fleet_core::{PricingConfig, ResourceList, SizeThresholds};

/// Linear price of a capacity vector.
///
/// CPU is billed per core, memory per 10^9 bytes and every unit of an
/// accelerator resource adds a flat surcharge. Negative entries are
/// billed as zero, which keeps the function monotone in every dimension.
pub fn price_from_resources(resources: &ResourceList, pricing: &PricingConfig) -> f64 {
    let mut price = 0.0;
    for (name, quantity) in resources.iter() {
        let amount = quantity.as_f64().max(0.0);
        if name == RESOURCE_CPU {
            price += pricing.cpu_rate * amount;
        } else if name == RESOURCE_MEMORY {
            price += pricing.memory_rate_per_gb * amount / 1e9;
        } else if pricing.accelerator_resources.iter().any(|r| r == name) {
            price += pricing.accelerator_surcharge * amount;
        }
    }
    price
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Large => "large",
        }
    }
}

/// `Large` iff CPU and memory both strictly exceed their thresholds.
pub fn size_class(resources: &ResourceList, thresholds: &SizeThresholds) -> SizeClass {
    if resources.cpu() > thresholds.cpu && resources.memory() > thresholds.memory {
        SizeClass::Large
    } else {
        SizeClass::Small
    }
}
