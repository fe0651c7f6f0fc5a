use crate::backend::{BackendError, Orchestrator, StackReceipt, StackRequest};
use crate::naming::DerivedIdentity;
use crate::templates;

pub const STACK_TIMEOUT_IN_MINUTES: i32 = 60;

pub fn stack_request(identity: &DerivedIdentity) -> StackRequest {
    let parameters = identity
        .parameters()
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    return StackRequest {
        stack_name: identity.stack.to_string(),
        template_body: templates::template(identity.topology),
        parameters,
        timeout_in_minutes: STACK_TIMEOUT_IN_MINUTES,
    };
}

/// Submits the stack once. Acceptance is final; provisioning continues in
/// the background and is not awaited.
pub async fn submit(
    orchestrator: &dyn Orchestrator,
    identity: &DerivedIdentity,
) -> Result<StackReceipt, BackendError> {
    let request = stack_request(identity);
    tracing::info!(
        stack_name = %request.stack_name,
        parameters = ?request.parameters,
        "submitting stack"
    );

    let receipt = match orchestrator.create_stack(&request).await {
        Ok(receipt) => receipt,
        Err(error) => {
            tracing::error!(stack_name = %request.stack_name, %error, "stack rejected");
            return Err(error);
        }
    };

    tracing::info!(
        stack_name = %request.stack_name,
        stack_id = ?receipt.stack_id,
        "stack accepted"
    );
    return Ok(receipt);
}
