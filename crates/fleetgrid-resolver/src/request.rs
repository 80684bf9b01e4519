//! Resolution requests — what the caller wants.

use serde::{Deserialize, Serialize};

use fleet_core::{Requirement, Requirements, ResourceList};

use crate::error::{ResolveError, ResolveResult};

/// A validated capacity request: label constraints plus resource demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct ResolutionRequest {
    requirements: Requirements,
    resources: ResourceList,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    requirements: Requirements,
    #[serde(default)]
    resources: ResourceList,
}

impl TryFrom<RawRequest> for ResolutionRequest {
    type Error = ResolveError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        ResolutionRequest::new(raw.requirements, raw.resources)
    }
}

impl ResolutionRequest {
    /// Validate and build a request. Negative quantities are rejected.
    pub fn new(requirements: Requirements, resources: ResourceList) -> ResolveResult<Self> {
        let negative = resources.negative_entries();
        if !negative.is_empty() {
            return Err(ResolveError::Validation(format!(
                "negative resource request for {}",
                negative.join(", ")
            )));
        }
        Ok(Self {
            requirements,
            resources,
        })
    }

    /// Builder-style: add one more label requirement.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.add(requirement);
        self
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn resources(&self) -> &ResourceList {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::Quantity;
    use fleet_core::labels::{RESOURCE_CPU, RESOURCE_MEMORY};

    #[test]
    fn accepts_non_negative_resources() {
        let resources = ResourceList::new()
            .with(RESOURCE_CPU, Quantity::from_units(2))
            .with(RESOURCE_MEMORY, Quantity::ZERO);
        assert!(ResolutionRequest::new(Requirements::new(), resources).is_ok());
    }

    #[test]
    fn rejects_negative_quantities() {
        let resources = ResourceList::new().with(RESOURCE_CPU, Quantity::from_milli(-1));
        let err = ResolutionRequest::new(Requirements::new(), resources).unwrap_err();
        assert!(matches!(err, ResolveError::Validation(msg) if msg.contains("cpu")));
    }

    #[test]
    fn deserialization_validates() {
        let ok: ResolutionRequest = serde_json::from_str(
            r#"{"requirements":[{"key":"kubernetes.io/arch","operator":"In","values":["arm64"]}],
                "resources":{"cpu":"2","memory":"4Gi"}}"#,
        )
        .unwrap();
        assert_eq!(ok.resources().memory(), Quantity::from_gib(4));
        assert_eq!(ok.requirements().len(), 1);

        let bad = serde_json::from_str::<ResolutionRequest>(r#"{"resources":{"cpu":"-2"}}"#);
        assert!(bad.is_err());
    }
}
