//! Resource vectors and fit arithmetic.
//!
//! A [`ResourceList`] maps resource names to quantities. Lists merge by
//! componentwise addition and a request fits a capacity when every
//! requested dimension is covered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::{RESOURCE_CPU, RESOURCE_MEMORY, RESOURCE_PODS};
use crate::quantity::Quantity;

/// Resource name → quantity, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceList(BTreeMap<String, Quantity>);

/// A fit check failed on one resource dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient {resource}: requested {requested}, capacity {available}, short by {shortfall}")]
pub struct InsufficientResource {
    pub resource: String,
    pub requested: Quantity,
    pub available: Quantity,
    pub shortfall: Quantity,
}

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, quantity: Quantity) -> Self {
        self.insert(name, quantity);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, quantity: Quantity) {
        self.0.insert(name.into(), quantity);
    }

    /// Quantity for `name`; absent entries read as zero.
    pub fn get(&self, name: &str) -> Quantity {
        self.0.get(name).copied().unwrap_or(Quantity::ZERO)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn cpu(&self) -> Quantity {
        self.get(RESOURCE_CPU)
    }

    pub fn memory(&self) -> Quantity {
        self.get(RESOURCE_MEMORY)
    }

    pub fn pods(&self) -> Quantity {
        self.get(RESOURCE_PODS)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.0.iter().map(|(name, quantity)| (name.as_str(), *quantity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Componentwise sum over the union of keys.
    pub fn merge(&self, other: &ResourceList) -> ResourceList {
        let mut merged = self.clone();
        for (name, quantity) in other.iter() {
            let entry = merged.0.entry(name.to_string()).or_insert(Quantity::ZERO);
            *entry = entry.saturating_add(quantity);
        }
        merged
    }

    /// `self - other` per entry of `self`, clamped at zero.
    pub fn subtract_clamped(&self, other: &ResourceList) -> ResourceList {
        self.iter()
            .map(|(name, quantity)| {
                let remaining = quantity.saturating_sub(other.get(name)).max(Quantity::ZERO);
                (name.to_string(), remaining)
            })
            .collect()
    }

    /// Copy of the list without zero-valued entries.
    pub fn non_zero(&self) -> ResourceList {
        self.iter()
            .filter(|(_, quantity)| !quantity.is_zero())
            .map(|(name, quantity)| (name.to_string(), quantity))
            .collect()
    }

    /// Names of entries with a negative quantity.
    pub fn negative_entries(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, quantity)| quantity.is_negative())
            .map(|(name, _)| name)
            .collect()
    }
}

impl<N: Into<String>> FromIterator<(N, Quantity)> for ResourceList {
    fn from_iter<I: IntoIterator<Item = (N, Quantity)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, quantity)| (name.into(), quantity)).collect())
    }
}

/// Sum any number of resource lists.
pub fn merge<'a>(lists: impl IntoIterator<Item = &'a ResourceList>) -> ResourceList {
    lists
        .into_iter()
        .fold(ResourceList::new(), |acc, list| acc.merge(list))
}

/// Check every requested dimension against capacity.
///
/// Returns the first dimension (in name order) that does not fit.
pub fn check_fit(request: &ResourceList, capacity: &ResourceList) -> Result<(), InsufficientResource> {
    for (name, requested) in request.iter() {
        let available = capacity.get(name);
        if available < requested {
            return Err(InsufficientResource {
                resource: name.to_string(),
                requested,
                available,
                shortfall: requested.saturating_sub(available),
            });
        }
    }
    Ok(())
}

/// `true` when `capacity[name] >= request[name]` for every requested name.
pub fn fits(request: &ResourceList, capacity: &ResourceList) -> bool {
    check_fit(request, capacity).is_ok()
}
