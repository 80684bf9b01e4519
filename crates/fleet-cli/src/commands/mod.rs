pub mod catalog;
pub mod provision;
pub mod resolve;

use std::path::Path;

use clap::Args;
use tracing::info;

use fleet_core::labels::{RESOURCE_CPU, RESOURCE_MEMORY};
use fleet_core::{FleetConfig, Quantity, Requirement, ResourceList};
use fleetgrid_resolver::ResolutionRequest;

/// Load the catalog configuration, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FleetConfig> {
    match path {
        Some(path) => {
            let config = FleetConfig::from_file(path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => Ok(FleetConfig::default()),
    }
}

/// Request flags shared by `resolve` and `provision`.
#[derive(Args, Debug, Default)]
pub struct RequestArgs {
    /// Requested CPU (e.g. 2, 500m)
    #[arg(long)]
    pub cpu: Option<Quantity>,
    /// Requested memory (e.g. 4Gi)
    #[arg(long)]
    pub memory: Option<Quantity>,
    /// Any other resource, as name=quantity (repeatable)
    #[arg(long = "resource", value_name = "NAME=QUANTITY", value_parser = parse_resource)]
    pub resources: Vec<(String, Quantity)>,
    /// Label requirement: key=a,b | key!=a | key | !key | key>n | key<n (repeatable)
    #[arg(long = "require", value_name = "EXPR")]
    pub requirements: Vec<Requirement>,
}

impl RequestArgs {
    pub fn into_request(self) -> anyhow::Result<ResolutionRequest> {
        let mut resources = ResourceList::new();
        if let Some(cpu) = self.cpu {
            resources.insert(RESOURCE_CPU, cpu);
        }
        if let Some(memory) = self.memory {
            resources.insert(RESOURCE_MEMORY, memory);
        }
        for (name, quantity) in self.resources {
            resources.insert(name, quantity);
        }
        let requirements = self.requirements.into_iter().collect();
        Ok(ResolutionRequest::new(requirements, resources)?)
    }
}

fn parse_resource(s: &str) -> Result<(String, Quantity), String> {
    let (name, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=QUANTITY, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("missing resource name in {s:?}"));
    }
    let quantity = quantity.parse::<Quantity>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), quantity))
}

/// `cpu=4, memory=8Gi, pods=5`
pub fn format_resources(resources: &ResourceList) -> String {
    resources
        .iter()
        .map(|(name, quantity)| format!("{name}={quantity}"))
        .collect::<Vec<_>>()
        .join(", ")
}
