use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_cloudformation::model::{Capability, OnFailure, Parameter};
use aws_sdk_cloudformation::types::SdkError;
use aws_types::region::Region;
use aws_types::SdkConfig;

use super::{BackendError, Cdn, Identity, Orchestrator, StackReceipt, StackRequest};
use crate::descriptor::{AccessCredential, DistributionDescriptor, StackResourceDescriptor};

/// Loads the shared SDK configuration, falling back to the default region
/// provider chain when no region is configured.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(region.map(|region| Region::new(region.to_string())))
            .or_default_provider();

    return aws_config::from_env().region(region_provider).load().await;
}

fn map_sdk_error<E: std::error::Error + 'static>(error: SdkError<E>) -> BackendError {
    return match error {
        SdkError::ServiceError { err, raw } => BackendError::ServiceError {
            status_code: Some(raw.http().status().as_u16()),
            message: err.to_string(),
        },
        err => BackendError::UnknownError(err.to_string()),
    };
}

pub struct CloudFormation {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormation {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_cloudformation::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl Orchestrator for CloudFormation {
    async fn create_stack(&self, request: &StackRequest) -> Result<StackReceipt, BackendError> {
        let mut operation = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(request.template_body)
            .capabilities(Capability::CapabilityNamedIam)
            .on_failure(OnFailure::Delete)
            .timeout_in_minutes(request.timeout_in_minutes);

        for (key, value) in &request.parameters {
            let parameter = Parameter::builder()
                .parameter_key(key)
                .parameter_value(value)
                .build();
            operation = operation.parameters(parameter);
        }

        let result = operation.send().await.map_err(map_sdk_error)?;

        return Ok(StackReceipt {
            stack_id: result.stack_id().map(String::from),
        });
    }

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_name: &str,
    ) -> Result<StackResourceDescriptor, BackendError> {
        let result = self
            .client
            .describe_stack_resource()
            .stack_name(stack_name)
            .logical_resource_id(logical_name)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let not_found =
            || BackendError::NotFoundError(format!("{} in stack {}", logical_name, stack_name));

        let detail = result.stack_resource_detail().ok_or_else(not_found)?;
        let physical_resource_id = detail.physical_resource_id().ok_or_else(not_found)?;

        return Ok(StackResourceDescriptor {
            stack_name: detail.stack_name().unwrap_or(stack_name).to_string(),
            stack_id: detail.stack_id().map(String::from),
            logical_resource_id: logical_name.to_string(),
            physical_resource_id: physical_resource_id.to_string(),
            resource_type: detail.resource_type().map(String::from),
            resource_status: detail
                .resource_status()
                .map(|status| status.as_str().to_string()),
            resource_status_reason: detail.resource_status_reason().map(String::from),
            last_updated_timestamp: detail.last_updated_timestamp().map(|time| time.secs()),
        });
    }
}

pub struct CloudFront {
    client: aws_sdk_cloudfront::Client,
}

impl CloudFront {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_cloudfront::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl Cdn for CloudFront {
    async fn get_distribution(&self, id: &str) -> Result<DistributionDescriptor, BackendError> {
        let result = self
            .client
            .get_distribution()
            .id(id)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let distribution = match result.distribution() {
            Some(distribution) => distribution,
            None => return Err(BackendError::NotFoundError(format!("distribution {}", id))),
        };

        let origin_domain_names = distribution
            .distribution_config()
            .and_then(|config| config.origins())
            .and_then(|origins| origins.items())
            .unwrap_or_else(|| &[])
            .iter()
            .filter_map(|origin| origin.domain_name())
            .map(String::from)
            .collect();

        return Ok(DistributionDescriptor {
            id: distribution.id().unwrap_or(id).to_string(),
            arn: distribution.arn().map(String::from),
            status: distribution.status().map(String::from),
            domain_name: distribution.domain_name().map(String::from),
            last_modified_time: distribution.last_modified_time().map(|time| time.secs()),
            origin_domain_names,
        });
    }
}

pub struct Iam {
    client: aws_sdk_iam::Client,
}

impl Iam {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let client = aws_sdk_iam::Client::new(sdk_config);
        return Self { client };
    }
}

#[async_trait]
impl Identity for Iam {
    async fn create_access_key(&self, user_name: &str) -> Result<AccessCredential, BackendError> {
        let result = self
            .client
            .create_access_key()
            .user_name(user_name)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let access_key = match result.access_key() {
            Some(access_key) => access_key,
            None => {
                return Err(BackendError::UnknownError(format!(
                    "no access key returned for {}",
                    user_name
                )))
            }
        };

        let (access_key_id, secret_access_key) =
            match (access_key.access_key_id(), access_key.secret_access_key()) {
                (Some(id), Some(secret)) => (id.to_string(), secret.to_string()),
                _ => {
                    return Err(BackendError::UnknownError(format!(
                        "incomplete access key returned for {}",
                        user_name
                    )))
                }
            };

        return Ok(AccessCredential {
            access_key_id,
            secret_access_key,
            status: access_key.status().map(|status| status.as_str().to_string()),
            user_name: access_key.user_name().map(String::from),
        });
    }
}
