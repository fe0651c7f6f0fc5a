use crate::backend::{BackendError, Identity};
use crate::descriptor::AccessCredential;

/// Mints a new access key for an IAM user. Every call creates another live
/// key; nothing here checks for existing ones.
pub async fn issue(
    identity: &dyn Identity,
    user_name: &str,
) -> Result<AccessCredential, BackendError> {
    let credential = match identity.create_access_key(user_name).await {
        Ok(credential) => credential,
        Err(error) => {
            tracing::error!(user_name, %error, "access key rejected");
            return Err(error);
        }
    };

    // Only the key id, never the secret.
    tracing::info!(
        user_name,
        access_key_id = %credential.access_key_id,
        "issued access key"
    );

    return Ok(credential);
}
