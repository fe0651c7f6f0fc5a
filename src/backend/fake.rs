//! In-memory backends for tests. Resources are keyed by
//! `(stack name, logical name)` and every call is recorded.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{BackendError, Cdn, Identity, Orchestrator, StackReceipt, StackRequest};
use crate::descriptor::{AccessCredential, DistributionDescriptor, StackResourceDescriptor};

#[derive(Default)]
pub struct FakeBackend {
    resources: HashMap<(String, String), StackResourceDescriptor>,
    distributions: HashMap<String, DistributionDescriptor>,
    create_stack_error: Option<BackendError>,
    access_key_error: Option<BackendError>,
    pub submitted: Mutex<Vec<StackRequest>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        return Self::default();
    }

    /// Registers a provisioned resource. Distributions are registered with
    /// the CDN side too, under the same physical id.
    pub fn with_resource(
        mut self,
        stack_name: &str,
        logical_name: &str,
        physical_id: &str,
    ) -> Self {
        self.resources.insert(
            (stack_name.to_string(), logical_name.to_string()),
            StackResourceDescriptor {
                stack_name: stack_name.to_string(),
                stack_id: Some(format!("arn:aws:cloudformation:::stack/{}", stack_name)),
                logical_resource_id: logical_name.to_string(),
                physical_resource_id: physical_id.to_string(),
                resource_type: None,
                resource_status: Some(String::from("CREATE_COMPLETE")),
                resource_status_reason: None,
                last_updated_timestamp: None,
            },
        );

        if logical_name.ends_with("CloudFrontDistribution") {
            self.distributions.insert(
                physical_id.to_string(),
                DistributionDescriptor {
                    id: physical_id.to_string(),
                    arn: None,
                    status: Some(String::from("Deployed")),
                    domain_name: Some(format!("{}.cloudfront.net", physical_id.to_lowercase())),
                    last_modified_time: None,
                    origin_domain_names: vec![],
                },
            );
        }

        return self;
    }

    /// Registers every slot of a topology for `stack_name`, physical ids are
    /// `{stack_name}-{logical_name}`.
    pub fn with_stack(mut self, stack_name: &str, topology: crate::topology::TopologyKind) -> Self {
        for slot in topology.slots() {
            let physical_id = format!("{}-{}", stack_name, slot.logical_name);
            self = self.with_resource(stack_name, slot.logical_name, &physical_id);
        }
        return self;
    }

    /// Drops a distribution from the CDN side while the stack still lists it.
    pub fn without_distribution(mut self, physical_id: &str) -> Self {
        self.distributions.remove(physical_id);
        return self;
    }

    pub fn rejecting_create_stack(mut self, error: BackendError) -> Self {
        self.create_stack_error = Some(error);
        return self;
    }

    pub fn rejecting_access_keys(mut self, error: BackendError) -> Self {
        self.access_key_error = Some(error);
        return self;
    }

    pub fn call_count(&self) -> usize {
        return self.calls.lock().unwrap().len();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Orchestrator for FakeBackend {
    async fn create_stack(&self, request: &StackRequest) -> Result<StackReceipt, BackendError> {
        self.record(format!("create_stack {}", request.stack_name));
        self.submitted.lock().unwrap().push(request.clone());

        if let Some(error) = &self.create_stack_error {
            return Err(error.clone());
        }

        return Ok(StackReceipt {
            stack_id: Some(format!(
                "arn:aws:cloudformation:::stack/{}",
                request.stack_name
            )),
        });
    }

    async fn describe_stack_resource(
        &self,
        stack_name: &str,
        logical_name: &str,
    ) -> Result<StackResourceDescriptor, BackendError> {
        self.record(format!("describe_stack_resource {} {}", stack_name, logical_name));

        let key = (stack_name.to_string(), logical_name.to_string());
        return match self.resources.get(&key) {
            Some(resource) => Ok(resource.clone()),
            None => Err(BackendError::ServiceError {
                status_code: Some(400),
                message: format!(
                    "Resource {} does not exist for stack {}",
                    logical_name, stack_name
                ),
            }),
        };
    }
}

#[async_trait]
impl Cdn for FakeBackend {
    async fn get_distribution(&self, id: &str) -> Result<DistributionDescriptor, BackendError> {
        self.record(format!("get_distribution {}", id));

        return match self.distributions.get(id) {
            Some(distribution) => Ok(distribution.clone()),
            None => Err(BackendError::ServiceError {
                status_code: Some(404),
                message: format!("The specified distribution does not exist: {}", id),
            }),
        };
    }
}

#[async_trait]
impl Identity for FakeBackend {
    async fn create_access_key(&self, user_name: &str) -> Result<AccessCredential, BackendError> {
        self.record(format!("create_access_key {}", user_name));

        if let Some(error) = &self.access_key_error {
            return Err(error.clone());
        }

        return Ok(AccessCredential {
            access_key_id: format!("AKIA{}", self.call_count()),
            secret_access_key: String::from("fake-secret-do-not-log"),
            status: Some(String::from("Active")),
            user_name: Some(user_name.to_string()),
        });
    }
}
