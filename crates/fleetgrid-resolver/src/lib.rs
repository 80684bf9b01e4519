//! fleetgrid-resolver — turns capacity requests into instance types.
//!
//! Given a [`Catalog`](fleetgrid_catalog::Catalog) snapshot and a
//! [`ResolutionRequest`], the engine yields every instance type whose
//! requirements are compatible with the request, that still has a
//! matching available offering, and whose capacity covers the request plus
//! overhead. The caller picks the head, pins an offering, and materializes
//! the procured unit.
//!
//! # Components
//!
//! - **`request`** — validated requirement set plus resource demand
//! - **`engine`** — lazy, restartable resolution and per-candidate diagnostics
//! - **`select`** — first compatible available offering
//! - **`materialize`** — procurement directives and node claims
//! - **`provider`** — the provisioning boundary and its orchestrator
//! - **`memory`** — in-process provisioning backend

pub mod engine;
pub mod error;
pub mod materialize;
pub mod memory;
pub mod provider;
pub mod request;
pub mod select;

pub use engine::{Candidate, Resolution, evaluate, explain, resolve};
pub use error::{ProvisionError, ProvisionResult, ResolveError, ResolveResult};
pub use materialize::{NodeClaim, ProcuredUnit, ProcurementDirective, materialize};
pub use memory::MemoryProvisioner;
pub use provider::{NodeProvisioner, ProvisionFuture, Provisioner};
pub use request::ResolutionRequest;
pub use select::select_offering;
