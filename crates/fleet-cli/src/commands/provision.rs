use std::sync::Arc;

use fleet_core::FleetConfig;
use fleetgrid_catalog::CatalogStore;
use fleetgrid_resolver::{MemoryProvisioner, NodeClaim, Provisioner};

use super::{RequestArgs, format_resources};

pub async fn provision(config: &FleetConfig, args: RequestArgs, format: &str) -> anyhow::Result<()> {
    let store = Arc::new(CatalogStore::from_config(config)?);
    let provisioner = Provisioner::new(store, MemoryProvisioner::new());
    let request = args.into_request()?;

    let claim = provisioner.create(&request).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&claim)?);
        }
        _ => {
            print!("{}", render(&claim));
        }
    }

    Ok(())
}

fn render(claim: &NodeClaim) -> String {
    let mut out = format!(
        "✓ Created {} ({})\n  capacity:    {}\n  allocatable: {}\n  labels:\n",
        claim.name,
        claim.instance_type,
        format_resources(&claim.capacity),
        format_resources(&claim.allocatable),
    );
    for (key, value) in &claim.labels {
        out.push_str(&format!("    {key}={value}\n"));
    }
    out
}
