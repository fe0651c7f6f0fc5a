use std::collections::BTreeMap;

use futures::future::try_join_all;

use crate::backend::{BackendError, Cdn, Orchestrator};
use crate::descriptor::{ResourceDescriptor, StackResourceDescriptor};
use crate::naming::StackIdentity;
use crate::topology::{ResourceKind, ResourceSlot};

pub type Resolution = BTreeMap<&'static str, ResourceDescriptor>;

/// Looks up the physical resource behind one logical name in the stack.
pub async fn resolve_physical(
    orchestrator: &dyn Orchestrator,
    stack: &StackIdentity,
    logical_name: &str,
) -> Result<StackResourceDescriptor, BackendError> {
    tracing::debug!(stack_name = %stack, logical_name, "describing stack resource");

    return orchestrator
        .describe_stack_resource(stack.as_str(), logical_name)
        .await;
}

async fn resolve_slot(
    orchestrator: &dyn Orchestrator,
    cdn: &dyn Cdn,
    stack: &StackIdentity,
    slot: &ResourceSlot,
) -> Result<(&'static str, ResourceDescriptor), BackendError> {
    let resource = resolve_physical(orchestrator, stack, slot.logical_name).await?;

    let descriptor = match slot.kind {
        ResourceKind::Distribution => {
            let distribution = cdn.get_distribution(&resource.physical_resource_id).await?;
            ResourceDescriptor::Distribution(distribution)
        }
        ResourceKind::Bucket | ResourceKind::Identity => {
            ResourceDescriptor::StackResource(resource)
        }
    };

    return Ok((slot.logical_name, descriptor));
}

/// Resolves every slot concurrently. The first failure aborts the lot and
/// nothing partial is returned.
pub async fn resolve(
    orchestrator: &dyn Orchestrator,
    cdn: &dyn Cdn,
    stack: &StackIdentity,
    slots: &[ResourceSlot],
) -> Result<Resolution, BackendError> {
    let lookups = slots
        .iter()
        .map(|slot| resolve_slot(orchestrator, cdn, stack, slot));

    let resolved = match try_join_all(lookups).await {
        Ok(resolved) => resolved,
        Err(error) => {
            tracing::error!(stack_name = %stack, %error, "resolution failed");
            return Err(error);
        }
    };

    return Ok(resolved.into_iter().collect());
}
