use async_trait::async_trait;

use crate::descriptor::{AccessCredential, DistributionDescriptor, StackResourceDescriptor};

pub mod aws;
#[cfg(test)]
pub mod fake;

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
pub enum BackendError {
    #[error("Service error ocurred: {message}.")]
    ServiceError {
        status_code: Option<u16>,
        message: String,
    },

    #[error("Unknown error ocurred: {0}.")]
    UnknownError(String),

    #[error("Resource not found: {0}")]
    NotFoundError(String),
}

impl BackendError {
    /// HTTP status reported by the backend, when there was a response at all.
    pub fn status_code(&self) -> Option<u16> {
        return match self {
            BackendError::ServiceError { status_code, .. } => *status_code,
            _ => None,
        };
    }
}

/// Everything the orchestrator needs to create a stack.
#[derive(Debug, Clone, PartialEq)]
pub struct StackRequest {
    pub stack_name: String,
    pub template_body: &'static str,
    pub parameters: Vec<(String, String)>,
    pub timeout_in_minutes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackReceipt {
    pub stack_id: Option<String>,
}

#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Schedules stack creation. Resources are deleted by the backend if
    /// creation fails.
    async fn create_stack(&self, request: &StackRequest) -> Result<StackReceipt, BackendError>;

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_name: &str,
    ) -> Result<StackResourceDescriptor, BackendError>;
}

#[async_trait]
pub trait Cdn: Send + Sync {
    async fn get_distribution(&self, id: &str) -> Result<DistributionDescriptor, BackendError>;
}

#[async_trait]
pub trait Identity: Send + Sync {
    async fn create_access_key(&self, user_name: &str) -> Result<AccessCredential, BackendError>;
}
