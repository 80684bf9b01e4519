//! Provisioner — drives the node-provisioning collaborator.
//!
//! The resolution core never creates or deletes compute units itself. A
//! [`NodeProvisioner`] backend does that; [`Provisioner`] sits in front of
//! it, resolving the request against the current catalog snapshot, pinning
//! an offering, and materializing whatever the backend reports back.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use fleetgrid_catalog::{Catalog, CatalogStore};

use crate::engine::resolve;
use crate::error::{ProvisionError, ProvisionResult, ResolveError};
use crate::materialize::{NodeClaim, ProcuredUnit, ProcurementDirective, materialize};
use crate::request::ResolutionRequest;
use crate::select::select_offering;

/// Boxed future returned by [`NodeProvisioner`] methods.
pub type ProvisionFuture<'a, T> = Pin<Box<dyn Future<Output = ProvisionResult<T>> + Send + 'a>>;

/// The external component that creates and deletes compute units.
pub trait NodeProvisioner: Send + Sync + std::fmt::Debug {
    /// Create a unit wearing the directive's labels.
    fn create<'a>(&'a self, directive: &'a ProcurementDirective) -> ProvisionFuture<'a, ProcuredUnit>;

    /// Look up a unit by name.
    fn get<'a>(&'a self, name: &'a str) -> ProvisionFuture<'a, ProcuredUnit>;

    /// Delete a unit by name.
    fn delete<'a>(&'a self, name: &'a str) -> ProvisionFuture<'a, ()>;
}

/// Resolves requests and hands the result to a provisioning backend.
#[derive(Debug)]
pub struct Provisioner<P> {
    catalog: Arc<CatalogStore>,
    backend: P,
}

impl<P: NodeProvisioner> Provisioner<P> {
    pub fn new(catalog: Arc<CatalogStore>, backend: P) -> Self {
        Self { catalog, backend }
    }

    pub fn backend(&self) -> &P {
        &self.backend
    }

    /// Current catalog snapshot.
    pub fn instance_types(&self) -> Arc<Catalog> {
        self.catalog.snapshot()
    }

    /// Resolve `request`, take the first eligible instance type, and create
    /// a unit in its first compatible available offering.
    pub async fn create(&self, request: &ResolutionRequest) -> ProvisionResult<NodeClaim> {
        let catalog = self.catalog.snapshot();
        let instance_type = resolve(&catalog, request)
            .next()
            .ok_or(ResolveError::NoEligibleInstanceType)?;
        let offering = select_offering(instance_type, request.requirements())?;
        let directive = ProcurementDirective::new(instance_type, offering);
        debug!(
            instance_type = %directive.instance_type,
            zone = %directive.zone,
            capacity_class = %directive.capacity_class,
            price = directive.price,
            "procurement directive"
        );

        let unit = self.backend.create(&directive).await?;
        let claim = materialize(instance_type, &unit);
        info!(
            node = %claim.name,
            instance_type = %claim.instance_type,
            "node created"
        );
        Ok(claim)
    }

    /// Re-materialize an existing unit from the current catalog.
    pub async fn get(&self, name: &str) -> ProvisionResult<NodeClaim> {
        let unit = self.backend.get(name).await?;
        let instance_type_name = unit
            .instance_type()
            .ok_or_else(|| ProvisionError::MissingInstanceType(name.to_string()))?;
        let catalog = self.catalog.snapshot();
        let instance_type = catalog.require(instance_type_name)?;
        Ok(materialize(instance_type, &unit))
    }

    pub async fn delete(&self, name: &str) -> ProvisionResult<()> {
        self.backend.delete(name).await?;
        info!(node = name, "node deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use fleet_core::labels::*;
    use fleet_core::{CatalogAxes, FleetConfig, Quantity, Requirement, ResourceList};
    use fleetgrid_catalog::CatalogError;

    use crate::memory::MemoryProvisioner;

    fn store() -> Arc<CatalogStore> {
        let config = FleetConfig {
            catalog: CatalogAxes {
                cpus: vec![1, 2, 4],
                memory_ratios: vec![1, 2],
                ..CatalogAxes::default()
            },
            ..FleetConfig::default()
        };
        Arc::new(CatalogStore::from_config(&config).unwrap())
    }

    fn request(cpu: i64) -> ResolutionRequest {
        ResolutionRequest::new(
            Default::default(),
            ResourceList::new().with(RESOURCE_CPU, Quantity::from_units(cpu)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_takes_first_eligible_instance_type() {
        let provisioner = Provisioner::new(store(), MemoryProvisioner::new());
        let claim = provisioner.create(&request(1)).await.unwrap();

        // 1 CPU + overhead rules out the 1-CPU shapes; "2-2-amd64" sorts first.
        assert_eq!(claim.instance_type, "2-2-amd64");
        assert_eq!(claim.name, "node-1");
        assert_eq!(claim.labels[LABEL_ZONE], "test-zone-1");
        assert_eq!(claim.labels[LABEL_CAPACITY_TYPE], CAPACITY_SPOT);
    }

    #[tokio::test]
    async fn create_honors_capacity_class_requirement() {
        let provisioner = Provisioner::new(store(), MemoryProvisioner::new());
        let req = request(1).with_requirement(Requirement::in_value(
            LABEL_CAPACITY_TYPE,
            CAPACITY_ON_DEMAND,
        ));
        let claim = provisioner.create(&req).await.unwrap();
        assert_eq!(claim.labels[LABEL_CAPACITY_TYPE], CAPACITY_ON_DEMAND);
    }

    #[tokio::test]
    async fn create_without_eligible_type_fails() {
        let provisioner = Provisioner::new(store(), MemoryProvisioner::new());
        let err = provisioner.create(&request(64)).await.unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Resolve(ResolveError::NoEligibleInstanceType)
        ));
        assert!(provisioner.backend().is_empty());
    }

    #[tokio::test]
    async fn get_and_delete_round_trip() {
        let provisioner = Provisioner::new(store(), MemoryProvisioner::new());
        let created = provisioner.create(&request(1)).await.unwrap();

        let fetched = provisioner.get(&created.name).await.unwrap();
        assert_eq!(fetched, created);

        provisioner.delete(&created.name).await.unwrap();
        assert!(matches!(
            provisioner.get(&created.name).await,
            Err(ProvisionError::NodeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn get_reports_unknown_instance_type() {
        let backend = MemoryProvisioner::new();
        backend.insert(ProcuredUnit::new(
            "stray",
            BTreeMap::from([(LABEL_INSTANCE_TYPE.to_string(), "9-9-riscv".to_string())]),
        ));
        let provisioner = Provisioner::new(store(), backend);

        assert!(matches!(
            provisioner.get("stray").await,
            Err(ProvisionError::Catalog(CatalogError::InstanceTypeNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn get_reports_missing_instance_type_label() {
        let backend = MemoryProvisioner::new();
        backend.insert(ProcuredUnit::new("bare", BTreeMap::new()));
        let provisioner = Provisioner::new(store(), backend);

        assert!(matches!(
            provisioner.get("bare").await,
            Err(ProvisionError::MissingInstanceType(name)) if name == "bare"
        ));
    }

    #[tokio::test]
    async fn instance_types_follow_catalog_rebuilds() {
        let store = store();
        let provisioner = Provisioner::new(Arc::clone(&store), MemoryProvisioner::new());
        assert_eq!(provisioner.instance_types().len(), 3 * 2 * 2);

        let config = FleetConfig {
            catalog: CatalogAxes {
                cpus: vec![8],
                memory_ratios: vec![2],
                ..CatalogAxes::default()
            },
            ..FleetConfig::default()
        };
        store.rebuild(&config).unwrap();

        let catalog = provisioner.instance_types();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("8-16-amd64").is_some());
        let claim = provisioner.create(&request(4)).await.unwrap();
        assert_eq!(claim.instance_type, "8-16-amd64");
    }

    #[derive(Debug)]
    struct Unreachable;

    impl NodeProvisioner for Unreachable {
        fn create<'a>(&'a self, _: &'a ProcurementDirective) -> ProvisionFuture<'a, ProcuredUnit> {
            Box::pin(async { Err(ProvisionError::Backend("connection refused".to_string())) })
        }

        fn get<'a>(&'a self, _: &'a str) -> ProvisionFuture<'a, ProcuredUnit> {
            Box::pin(async { Err(ProvisionError::Backend("connection refused".to_string())) })
        }

        fn delete<'a>(&'a self, _: &'a str) -> ProvisionFuture<'a, ()> {
            Box::pin(async { Err(ProvisionError::Backend("connection refused".to_string())) })
        }
    }

    #[tokio::test]
    async fn backend_failures_propagate() {
        let provisioner = Provisioner::new(store(), Unreachable);

        let err = provisioner.create(&request(1)).await.unwrap_err();
        assert!(matches!(&err, ProvisionError::Backend(msg) if msg == "connection refused"));
        assert_eq!(err.to_string(), "provisioner backend error: connection refused");
        assert!(matches!(
            provisioner.get("node-1").await,
            Err(ProvisionError::Backend(_))
        ));
        assert!(matches!(
            provisioner.delete("node-1").await,
            Err(ProvisionError::Backend(_))
        ));
    }
}
