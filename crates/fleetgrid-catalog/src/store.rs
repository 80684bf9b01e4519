//! Catalog snapshots.
//!
//! The store hands out `Arc<Catalog>` snapshots. A refresh builds a new
//! catalog and swaps it in whole; readers holding an older snapshot keep
//! using it undisturbed until they drop it.

use std::sync::{Arc, RwLock};

use tracing::info;

use fleet_core::FleetConfig;

use crate::builder::build_catalog;
use crate::catalog::Catalog;
use crate::error::CatalogResult;

/// Holder of the current catalog snapshot.
#[derive(Debug)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Build the initial catalog from config.
    pub fn from_config(config: &FleetConfig) -> CatalogResult<Self> {
        Ok(Self::new(build_catalog(config)?))
    }

    /// The catalog as of now.
    pub fn snapshot(&self) -> Arc<Catalog> {
        let current = self.current.read().expect("catalog lock");
        Arc::clone(&current)
    }

    /// Swap in a new catalog, returning the previous snapshot.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        self.swap(Arc::new(catalog))
    }

    /// Rebuild from config and swap the result in, returning the snapshot
    /// this call installed. On error the current snapshot stays in place.
    pub fn rebuild(&self, config: &FleetConfig) -> CatalogResult<Arc<Catalog>> {
        let next = Arc::new(build_catalog(config)?);
        self.swap(Arc::clone(&next));
        Ok(next)
    }

    fn swap(&self, next: Arc<Catalog>) -> Arc<Catalog> {
        let mut current = self.current.write().expect("catalog lock");
        let previous = std::mem::replace(&mut *current, next);
        info!(
            previous = previous.len(),
            current = current.len(),
            "catalog replaced"
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::CatalogAxes;

    fn config(cpus: Vec<u32>) -> FleetConfig {
        FleetConfig {
            catalog: CatalogAxes {
                cpus,
                memory_ratios: vec![1],
                architectures: vec!["amd64".to_string()],
                ..CatalogAxes::default()
            },
            ..FleetConfig::default()
        }
    }

    #[test]
    fn snapshot_survives_rebuild() {
        let store = CatalogStore::from_config(&config(vec![1, 2])).unwrap();
        let before = store.snapshot();

        let after = store.rebuild(&config(vec![1, 2, 4])).unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
        assert_eq!(store.snapshot().len(), 3);
    }

    #[test]
    fn failed_rebuild_keeps_current() {
        let store = CatalogStore::from_config(&config(vec![1])).unwrap();
        assert!(store.rebuild(&config(vec![])).is_err());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn replace_returns_previous() {
        let store = CatalogStore::new(Catalog::default());
        let previous = store.replace(build_catalog(&config(vec![1])).unwrap());
        assert!(previous.is_empty());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn rebuild_returns_installed_snapshot() {
        let store = CatalogStore::from_config(&config(vec![1])).unwrap();
        let installed = store.rebuild(&config(vec![1, 2])).unwrap();
        assert!(Arc::ptr_eq(&installed, &store.snapshot()));
    }

    #[test]
    fn concurrent_rebuilds_return_their_own_catalog() {
        let store = CatalogStore::from_config(&config(vec![1])).unwrap();
        let shapes: Vec<Vec<u32>> = (1..=8).map(|n| (1..=n).collect()).collect();

        std::thread::scope(|scope| {
            for cpus in &shapes {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..50 {
                        let installed = store.rebuild(&config(cpus.clone())).unwrap();
                        assert_eq!(installed.len(), cpus.len());
                    }
                });
            }
        });

        assert!((1..=8).contains(&store.snapshot().len()));
    }
}
