//! Response-facing shapes of the resources a stack owns. These are filled
//! in from the AWS SDK models by `backend::aws` so the JSON returned to
//! callers does not change when the SDK does.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackResourceDescriptor {
    pub stack_name: String,
    pub stack_id: Option<String>,
    pub logical_resource_id: String,
    pub physical_resource_id: String,
    pub resource_type: Option<String>,
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
    /// Seconds since the unix epoch.
    pub last_updated_timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionDescriptor {
    pub id: String,
    pub arn: Option<String>,
    pub status: Option<String>,
    pub domain_name: Option<String>,
    /// Seconds since the unix epoch.
    pub last_modified_time: Option<i64>,
    pub origin_domain_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceDescriptor {
    Distribution(DistributionDescriptor),
    StackResource(StackResourceDescriptor),
}

/// A freshly minted access key. The secret is only ever serialized into the
/// response body; `Debug` redacts it.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessCredential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub status: Option<String>,
    pub user_name: Option<String>,
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("status", &self.status)
            .field("user_name", &self.user_name)
            .finish()
    }
}
