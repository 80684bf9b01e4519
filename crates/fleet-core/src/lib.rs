//! fleet-core — value types shared across FleetGrid crates.
//!
//! - **`quantity`** — fixed-point resource amounts (`100m`, `4Gi`)
//! - **`resources`** — resource vectors, merge and fit arithmetic
//! - **`requirements`** — label requirements and the compatibility algebra
//! - **`labels`** — well-known label keys and resource names
//! - **`config`** — `fleet.toml` catalog parameterization

pub mod config;
pub mod error;
pub mod labels;
pub mod quantity;
pub mod requirements;
pub mod resources;

pub use config::{CatalogAxes, FleetConfig, PricingConfig, SizeThresholds};
pub use error::{CoreError, CoreResult};
pub use quantity::Quantity;
pub use requirements::{ConflictError, Operator, Requirement, Requirements};
pub use resources::{InsufficientResource, ResourceList, check_fit, fits, merge};
