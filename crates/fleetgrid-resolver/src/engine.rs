//! Resolution engine — filters the catalog down to eligible instance types.
//!
//! A candidate survives when all three checks pass, in order:
//!
//! 1. its requirement set is compatible with the request's
//! 2. at least one available offering satisfies the request's zone and
//!    capacity-class constraints
//! 3. the request plus the instance type's overhead fits its capacity
//!
//! Rejections are logged at debug level and never surface as errors; an
//! empty result is for the caller to interpret.

use tracing::debug;

use fleet_core::check_fit;
use fleetgrid_catalog::{Catalog, InstanceType, Iter};

use crate::error::{ResolveError, ResolveResult};
use crate::request::ResolutionRequest;

/// Run the three checks against one instance type.
pub fn evaluate(instance_type: &InstanceType, request: &ResolutionRequest) -> ResolveResult<()> {
    request.requirements().compatible(instance_type.requirements())?;

    if instance_type
        .offerings()
        .compatible(request.requirements())
        .is_empty()
    {
        return Err(ResolveError::NoOffering {
            instance_type: instance_type.name().to_string(),
        });
    }

    let demand = request.resources().merge(instance_type.overhead());
    check_fit(&demand, instance_type.capacity())?;
    Ok(())
}

/// Lazily filter `catalog` for `request`, in catalog (name) order.
pub fn resolve<'a>(catalog: &'a Catalog, request: &'a ResolutionRequest) -> Resolution<'a> {
    Resolution {
        catalog,
        request,
        candidates: catalog.iter(),
    }
}

/// Lazy sequence of instance types that satisfy a request.
///
/// Finite, borrows the catalog and request without mutating them, and can
/// be restarted from the beginning.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    catalog: &'a Catalog,
    request: &'a ResolutionRequest,
    candidates: Iter<'a>,
}

impl<'a> Resolution<'a> {
    /// Rewind to the first instance type in the catalog.
    pub fn restart(&mut self) {
        self.candidates = self.catalog.iter();
    }
}

impl<'a> Iterator for Resolution<'a> {
    type Item = &'a InstanceType;

    fn next(&mut self) -> Option<Self::Item> {
        for candidate in self.candidates.by_ref() {
            match evaluate(candidate, self.request) {
                Ok(()) => return Some(candidate),
                Err(reason) => {
                    debug!(instance_type = candidate.name(), %reason, "instance type rejected");
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.candidates.size_hint().1)
    }
}

/// Outcome of evaluating one catalog entry.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub instance_type: &'a InstanceType,
    pub verdict: ResolveResult<()>,
}

impl Candidate<'_> {
    pub fn is_eligible(&self) -> bool {
        self.verdict.is_ok()
    }
}

/// Evaluate every instance type, keeping the rejection reason of each.
pub fn explain<'a>(catalog: &'a Catalog, request: &ResolutionRequest) -> Vec<Candidate<'a>> {
    catalog
        .iter()
        .map(|instance_type| Candidate {
            instance_type,
            verdict: evaluate(instance_type, request),
        })
        .collect()
}
