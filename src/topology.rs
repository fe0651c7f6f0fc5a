use serde::{Deserialize, Serialize};

/// What kind of resource sits behind a logical name. Only distributions are
/// hydrated from a second backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Bucket,
    Identity,
    Distribution,
}

/// A fixed slot in a topology's template.
///
/// `logical_name` is the resource name inside the template, `role` is the key
/// the resolved descriptor is returned under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSlot {
    pub logical_name: &'static str,
    pub role: &'static str,
    pub kind: ResourceKind,
}

const SINGLE_SLOTS: &[ResourceSlot] = &[
    ResourceSlot {
        logical_name: "CloudFrontDistribution",
        role: "Distribution",
        kind: ResourceKind::Distribution,
    },
    ResourceSlot {
        logical_name: "S3Bucket",
        role: "S3Bucket",
        kind: ResourceKind::Bucket,
    },
    ResourceSlot {
        logical_name: "IAMUser",
        role: "IAMUser",
        kind: ResourceKind::Identity,
    },
];

const PRODUCTION_STAGING_SLOTS: &[ResourceSlot] = &[
    ResourceSlot {
        logical_name: "ProductionCloudFrontDistribution",
        role: "ProductionDistribution",
        kind: ResourceKind::Distribution,
    },
    ResourceSlot {
        logical_name: "ProductionS3Bucket",
        role: "ProductionS3Bucket",
        kind: ResourceKind::Bucket,
    },
    ResourceSlot {
        logical_name: "ProductionIAMUser",
        role: "ProductionIAMUser",
        kind: ResourceKind::Identity,
    },
    ResourceSlot {
        logical_name: "StagingCloudFrontDistribution",
        role: "StagingDistribution",
        kind: ResourceKind::Distribution,
    },
    ResourceSlot {
        logical_name: "StagingS3Bucket",
        role: "StagingS3Bucket",
        kind: ResourceKind::Bucket,
    },
    ResourceSlot {
        logical_name: "StagingIAMUser",
        role: "StagingIAMUser",
        kind: ResourceKind::Identity,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyKind {
    Single,
    ProductionStaging,
}

impl TopologyKind {
    pub fn slots(&self) -> &'static [ResourceSlot] {
        return match self {
            TopologyKind::Single => SINGLE_SLOTS,
            TopologyKind::ProductionStaging => PRODUCTION_STAGING_SLOTS,
        };
    }

    /// Template parameters bound at submission time, in the order the name
    /// deriver produces their values.
    pub fn parameter_names(&self) -> &'static [&'static str] {
        return match self {
            TopologyKind::Single => &["Name"],
            TopologyKind::ProductionStaging => &["ProductionName", "StagingName"],
        };
    }

    pub fn slot(&self, logical_name: &str) -> Option<&'static ResourceSlot> {
        return self
            .slots()
            .iter()
            .find(|slot| slot.logical_name == logical_name);
    }

    pub fn identity_slots(&self) -> impl Iterator<Item = &'static ResourceSlot> {
        return self
            .slots()
            .iter()
            .filter(|slot| slot.kind == ResourceKind::Identity);
    }
}
