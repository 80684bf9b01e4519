use fleet_core::FleetConfig;
use fleetgrid_catalog::{InstanceType, build_catalog};
use fleetgrid_resolver::{explain as explain_candidates, resolve as resolve_request};
use serde_json::{Value, json};
use tracing::warn;

use super::RequestArgs;
use super::catalog::summary_line;

pub fn resolve(
    config: &FleetConfig,
    args: RequestArgs,
    format: &str,
    explain: bool,
) -> anyhow::Result<()> {
    let catalog = build_catalog(config)?;
    let request = args.into_request()?;

    if explain {
        let candidates = explain_candidates(&catalog, &request);
        match format {
            "json" => {
                let rendered: Vec<Value> = candidates
                    .iter()
                    .map(|c| {
                        json!({
                            "instance_type": c.instance_type.name(),
                            "eligible": c.is_eligible(),
                            "reason": c.verdict.as_ref().err().map(ToString::to_string),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            }
            _ => {
                for candidate in &candidates {
                    match &candidate.verdict {
                        Ok(()) => println!("{:<16} eligible", candidate.instance_type.name()),
                        Err(reason) => {
                            println!("{:<16} rejected: {reason}", candidate.instance_type.name())
                        }
                    }
                }
            }
        }
        return Ok(());
    }

    let resolved: Vec<&InstanceType> = resolve_request(&catalog, &request).collect();
    if resolved.is_empty() {
        warn!(request = %request.requirements(), "no eligible instance type");
    }

    match format {
        "json" => {
            let rendered: Vec<Value> = resolved.iter().map(|it| descriptor(it)).collect();
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        _ => {
            for instance_type in &resolved {
                println!("{}", summary_line(instance_type));
            }
        }
    }

    Ok(())
}

/// Name, requirements, capacity, allocatable and offerings of one result.
fn descriptor(instance_type: &InstanceType) -> Value {
    json!({
        "name": instance_type.name(),
        "requirements": instance_type.requirements(),
        "capacity": instance_type.capacity(),
        "allocatable": instance_type.allocatable(),
        "offerings": instance_type.offerings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::labels::RESOURCE_CPU;

    #[test]
    fn descriptor_includes_allocatable() {
        let catalog = build_catalog(&FleetConfig::default()).unwrap();
        let value = descriptor(catalog.get("2-4-amd64").unwrap());

        assert_eq!(value["name"], "2-4-amd64");
        assert_eq!(value["capacity"][RESOURCE_CPU], "2");
        assert_eq!(value["allocatable"][RESOURCE_CPU], "1900m");
        assert_eq!(value["offerings"].as_array().unwrap().len(), 6);
    }
}
