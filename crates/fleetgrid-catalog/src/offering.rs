//! Offerings — purchasable zone / capacity-class variants of an instance type.
//!
//! Price, zone and capacity class are fixed at build time. Availability is
//! an atomic flag so external signals can toggle it while resolution
//! passes read the catalog concurrently.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use fleet_core::labels::{LABEL_CAPACITY_TYPE, LABEL_ZONE};
use fleet_core::{Requirement, Requirements};

/// A single purchasable unit of an instance type.
#[derive(Debug, Serialize, Deserialize)]
pub struct Offering {
    zone: String,
    capacity_class: String,
    price: f64,
    available: AtomicBool,
}

impl Offering {
    /// A new, available offering.
    pub fn new(zone: impl Into<String>, capacity_class: impl Into<String>, price: f64) -> Self {
        Self {
            zone: zone.into(),
            capacity_class: capacity_class.into(),
            price,
            available: AtomicBool::new(true),
        }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn capacity_class(&self) -> &str {
        &self.capacity_class
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// `{zone: In[zone], capacity-type: In[class]}`.
    pub fn requirements(&self) -> Requirements {
        Requirements::new()
            .with(Requirement::in_value(LABEL_ZONE, self.zone.as_str()))
            .with(Requirement::in_value(LABEL_CAPACITY_TYPE, self.capacity_class.as_str()))
    }
}

impl Clone for Offering {
    fn clone(&self) -> Self {
        Self {
            zone: self.zone.clone(),
            capacity_class: self.capacity_class.clone(),
            price: self.price,
            available: AtomicBool::new(self.is_available()),
        }
    }
}

/// Offerings of one instance type, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Offerings(Vec<Offering>);

impl Offerings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, offering: Offering) {
        self.0.push(offering);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offering> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Available offerings in insertion order.
    pub fn available(&self) -> Vec<&Offering> {
        self.iter().filter(|o| o.is_available()).collect()
    }

    /// Available offerings whose zone / capacity class satisfy `requirements`.
    pub fn compatible(&self, requirements: &Requirements) -> Vec<&Offering> {
        self.iter()
            .filter(|o| o.is_available())
            .filter(|o| requirements.compatible(&o.requirements()).is_ok())
            .collect()
    }

    /// Lowest-priced available offering; ties keep insertion order.
    pub fn cheapest(&self) -> Option<&Offering> {
        self.iter()
            .filter(|o| o.is_available())
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Distinct zones of available offerings, first-seen order.
    pub fn zones(&self) -> Vec<&str> {
        distinct(self.iter().filter(|o| o.is_available()).map(Offering::zone))
    }

    /// Distinct capacity classes of available offerings, first-seen order.
    pub fn capacity_classes(&self) -> Vec<&str> {
        distinct(self.iter().filter(|o| o.is_available()).map(Offering::capacity_class))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

impl FromIterator<Offering> for Offerings {
    fn from_iter<I: IntoIterator<Item = Offering>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
