//! Offering selection for a resolved instance type.

use fleet_core::Requirements;
use fleetgrid_catalog::{InstanceType, Offering};

use crate::error::{ResolveError, ResolveResult};

/// First available offering, in the instance type's offering order, whose
/// zone and capacity class satisfy `requirements`.
///
/// Price plays no part; callers wanting the cheapest sort candidates first.
pub fn select_offering<'a>(
    instance_type: &'a InstanceType,
    requirements: &Requirements,
) -> ResolveResult<&'a Offering> {
    instance_type
        .offerings()
        .iter()
        .filter(|offering| offering.is_available())
        .find(|offering| requirements.compatible(&offering.requirements()).is_ok())
        .ok_or_else(|| ResolveError::NoOffering {
            instance_type: instance_type.name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::labels::*;
    use fleet_core::{FleetConfig, Requirement};
    use fleetgrid_catalog::{InstanceTypeOptions, Offerings};

    fn instance_type() -> InstanceType {
        let offerings: Offerings = [
            Offering::new("a", CAPACITY_SPOT, 1.0),
            Offering::new("b", CAPACITY_SPOT, 0.5),
            Offering::new("b", CAPACITY_ON_DEMAND, 2.0),
        ]
        .into_iter()
        .collect();
        InstanceType::from_options(
            InstanceTypeOptions {
                name: "it".to_string(),
                offerings,
                ..Default::default()
            },
            &FleetConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn picks_first_in_order_not_cheapest() {
        let it = instance_type();
        let offering = select_offering(&it, &Requirements::new()).unwrap();
        assert_eq!(offering.zone(), "a");
    }

    #[test]
    fn honors_zone_and_class_constraints() {
        let it = instance_type();
        let reqs = Requirements::new()
            .with(Requirement::in_value(LABEL_ZONE, "b"))
            .with(Requirement::in_value(LABEL_CAPACITY_TYPE, CAPACITY_ON_DEMAND));
        let offering = select_offering(&it, &reqs).unwrap();
        assert_eq!((offering.zone(), offering.capacity_class()), ("b", CAPACITY_ON_DEMAND));
    }

    #[test]
    fn skips_unavailable_offerings() {
        let it = instance_type();
        it.offerings().iter().next().unwrap().set_available(false);
        let offering = select_offering(&it, &Requirements::new()).unwrap();
        assert_eq!((offering.zone(), offering.price()), ("b", 0.5));
    }

    #[test]
    fn reports_no_offering() {
        let it = instance_type();
        let reqs = Requirements::new().with(Requirement::in_value(LABEL_ZONE, "c"));
        assert_eq!(
            select_offering(&it, &reqs).unwrap_err(),
            ResolveError::NoOffering {
                instance_type: "it".to_string()
            }
        );
    }
}
