use crate::topology::TopologyKind;

const SINGLE: &str = include_str!("../templates/single.json");
const PRODUCTION_STAGING: &str = include_str!("../templates/production_staging.json");

/// CloudFormation template body for a topology. Parameter substitution is
/// left to CloudFormation.
pub fn template(topology: TopologyKind) -> &'static str {
    return match topology {
        TopologyKind::Single => SINGLE,
        TopologyKind::ProductionStaging => PRODUCTION_STAGING,
    };
}
