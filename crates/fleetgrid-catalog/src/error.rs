//! Catalog error types.

use thiserror::Error;

use fleet_core::CoreError;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while building or querying a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate instance type: {0}")]
    DuplicateInstanceType(String),

    #[error("instance type not found: {0}")]
    InstanceTypeNotFound(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
