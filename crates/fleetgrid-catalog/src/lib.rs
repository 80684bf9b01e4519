//! fleetgrid-catalog — the instance type catalog.
//!
//! Builds an immutable [`Catalog`] of instance types from a
//! [`FleetConfig`](fleet_core::FleetConfig) and serves it as swappable
//! snapshots.
//!
//! # Components
//!
//! - **`offering`** — zone / capacity-class offerings with atomic availability
//! - **`instance_type`** — capacity profiles and their derived requirements
//! - **`pricing`** — linear pricing and the size-class threshold rule
//! - **`builder`** — enumerates the configured parameter space
//! - **`catalog`** — name-keyed collection of instance types
//! - **`store`** — current-snapshot holder for refreshes

pub mod builder;
pub mod catalog;
pub mod error;
pub mod instance_type;
pub mod offering;
pub mod pricing;
pub mod store;

pub use builder::{build_catalog, instance_type_name};
pub use catalog::{Catalog, Iter};
pub use error::{CatalogError, CatalogResult};
pub use instance_type::{InstanceType, InstanceTypeOptions};
pub use offering::{Offering, Offerings};
pub use pricing::{SizeClass, price_from_resources, size_class};
pub use store::CatalogStore;
