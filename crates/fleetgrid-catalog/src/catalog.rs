//! The catalog — every instance type, keyed and iterated by name.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::error::{CatalogError, CatalogResult};
use crate::instance_type::InstanceType;

/// Read-only collection of instance types.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    instance_types: BTreeMap<String, InstanceType>,
}

impl Catalog {
    /// Build a catalog from hand-made instance types. Names must be unique.
    pub fn from_instance_types(
        instance_types: impl IntoIterator<Item = InstanceType>,
    ) -> CatalogResult<Self> {
        let mut map = BTreeMap::new();
        for instance_type in instance_types {
            let name = instance_type.name().to_string();
            if map.contains_key(&name) {
                return Err(CatalogError::DuplicateInstanceType(name));
            }
            map.insert(name, instance_type);
        }
        Ok(Self { instance_types: map })
    }

    pub fn get(&self, name: &str) -> Option<&InstanceType> {
        self.instance_types.get(name)
    }

    /// Like [`get`](Self::get), but a missing name is an error.
    pub fn require(&self, name: &str) -> CatalogResult<&InstanceType> {
        self.get(name)
            .ok_or_else(|| CatalogError::InstanceTypeNotFound(name.to_string()))
    }

    /// Instance types sorted by name.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.instance_types.values())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.instance_types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instance_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_types.is_empty()
    }
}

/// Iterator over a catalog's instance types in name order.
#[derive(Debug, Clone)]
pub struct Iter<'a>(btree_map::Values<'a, String, InstanceType>);

impl<'a> Iterator for Iter<'a> {
    type Item = &'a InstanceType;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}
