use fleet_core::FleetConfig;
use fleetgrid_catalog::{InstanceType, build_catalog};

use super::format_resources;

pub fn list(config: &FleetConfig, format: &str) -> anyhow::Result<()> {
    let catalog = build_catalog(config)?;
    let instance_types: Vec<&InstanceType> = catalog.iter().collect();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&instance_types)?);
        }
        _ => {
            for instance_type in instance_types {
                println!("{}", summary_line(instance_type));
            }
        }
    }

    Ok(())
}

/// One-line text rendering shared by `catalog` and `resolve`.
pub fn summary_line(instance_type: &InstanceType) -> String {
    let offerings = instance_type.offerings();
    let price = offerings
        .cheapest()
        .map(|o| format!("{:.3}", o.price()))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<16} {:<6} price {:>7}  offerings {}/{}  {}",
        instance_type.name(),
        instance_type.size().unwrap_or("-"),
        price,
        offerings.available().len(),
        offerings.len(),
        format_resources(instance_type.capacity()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::CatalogAxes;

    #[test]
    fn summary_line_shows_price_and_capacity() {
        let config = FleetConfig {
            catalog: CatalogAxes {
                cpus: vec![2],
                memory_ratios: vec![2],
                architectures: vec!["amd64".to_string()],
                ..CatalogAxes::default()
            },
            ..FleetConfig::default()
        };
        let catalog = build_catalog(&config).unwrap();
        let line = summary_line(catalog.get("2-4-amd64").unwrap());

        assert!(line.starts_with("2-4-amd64"));
        assert!(line.contains("small"));
        assert!(line.contains("offerings 6/6"));
        assert!(line.contains("cpu=2, memory=4Gi, pods=5"));
    }
}
