//! Resolution and provisioning error types.

use thiserror::Error;

use fleet_core::{ConflictError, InsufficientResource};
use fleetgrid_catalog::CatalogError;

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Why a request cannot be served, or why one candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("no available offering of {instance_type} satisfies the zone and capacity-class constraints")]
    NoOffering { instance_type: String },

    #[error(transparent)]
    InsufficientResource(#[from] InsufficientResource),

    #[error("no eligible instance type")]
    NoEligibleInstanceType,
}

/// Result type alias for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors surfaced by [`Provisioner`](crate::provider::Provisioner).
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node {0} carries no instance type")]
    MissingInstanceType(String),

    #[error("provisioner backend error: {0}")]
    Backend(String),
}
