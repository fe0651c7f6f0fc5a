//! API Gateway proxy binding.
//!
//! One function serves all three routes:
//!
//! - `POST` without a `name` path parameter creates a stack (`202`).
//! - `GET` with `name` resolves the stack's resources (`200`).
//! - `POST` with `name` and optionally `resource` mints an access key (`201`).
//!
//! Backend failures keep the backend's status code (default `400`) and its
//! message.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::backend::{BackendError, Cdn, Identity, Orchestrator};
use crate::config::Config;
use crate::descriptor::ResourceDescriptor;
use crate::naming::{NameDeriver, StackIdentity, ValidationError};
use crate::topology::{ResourceKind, TopologyKind};
use crate::{credentials, orchestrator, resolver};

const ACCEPTED_MESSAGE: &str =
    "The stack has been scheduled for processing. Be patient. It could take ~20 minutes.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub http_method: String,
    pub path_parameters: Option<HashMap<String, String>>,
    pub body: Option<String>,
}

impl ProxyRequest {
    fn path_parameter(&self, key: &str) -> Option<&str> {
        return self
            .path_parameters
            .as_ref()
            .and_then(|parameters| parameters.get(key))
            .map(String::as_str);
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    fn json(status_code: u16, body: Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert(
            String::from("Content-Type"),
            String::from("application/json"),
        );

        return Self {
            status_code,
            headers,
            body: body.to_string(),
        };
    }

    fn backend_error(error: &BackendError) -> Self {
        let status_code = error.status_code().unwrap_or(400);

        return Self::json(
            status_code,
            json!({
                "Status": "Error",
                "Error": {
                    "Message": error.to_string(),
                    "StatusCode": status_code,
                },
            }),
        );
    }

    fn bad_request(message: String) -> Self {
        return Self::json(
            400,
            json!({
                "Status": "Error",
                "Error": { "Message": message },
            }),
        );
    }

    fn validation_failed(field: &str, error: &ValidationError, raw: Value) -> Self {
        let mut rejected = Map::new();
        rejected.insert(capitalize(field), raw);

        return Self::json(
            422,
            json!({
                "Status": "Validation Failed",
                "Message": error.to_string(),
                "Error": rejected,
            }),
        );
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    return match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Create,
    Show,
    IssueCredential,
}

impl Route {
    pub fn of(request: &ProxyRequest) -> Option<Route> {
        let has_name = request.path_parameter("name").is_some();

        return match (request.http_method.to_ascii_uppercase().as_str(), has_name) {
            ("POST", false) => Some(Route::Create),
            ("GET", true) => Some(Route::Show),
            ("POST", true) => Some(Route::IssueCredential),
            _ => None,
        };
    }
}

pub struct Service {
    topology: TopologyKind,
    deriver: NameDeriver,
    orchestrator: Arc<dyn Orchestrator>,
    cdn: Arc<dyn Cdn>,
    identity: Arc<dyn Identity>,
}

impl Service {
    pub fn new(
        config: &Config,
        orchestrator: Arc<dyn Orchestrator>,
        cdn: Arc<dyn Cdn>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        return Self {
            topology: config.topology,
            deriver: NameDeriver::new(&config.prefix, config.topology, config.naming),
            orchestrator,
            cdn,
            identity,
        };
    }

    pub async fn handle(&self, request: &ProxyRequest) -> ProxyResponse {
        let route = match Route::of(request) {
            Some(route) => route,
            None => {
                tracing::warn!(method = %request.http_method, "no route");
                return ProxyResponse::json(
                    404,
                    json!({
                        "Status": "Error",
                        "Error": {
                            "Message": format!("No route for {} request", request.http_method),
                        },
                    }),
                );
            }
        };

        tracing::info!(?route, "handling request");
        return match route {
            Route::Create => self.create(request).await,
            Route::Show => self.show(request).await,
            Route::IssueCredential => self.issue_credential(request).await,
        };
    }

    async fn create(&self, request: &ProxyRequest) -> ProxyResponse {
        let body: Value = match serde_json::from_str(request.body.as_deref().unwrap_or("{}")) {
            Ok(body) => body,
            Err(error) => {
                return ProxyResponse::bad_request(format!(
                    "Request body is not valid JSON: {}",
                    error
                ))
            }
        };

        let scheme = self.deriver.scheme();
        let field = scheme.input_field();
        let raw = body.get(field).cloned().unwrap_or(Value::Null);
        let input = match &raw {
            Value::String(input) => input.as_str(),
            other => {
                let error = scheme.rejection(other.to_string());
                return ProxyResponse::validation_failed(field, &error, raw.clone());
            }
        };

        let identity = match self.deriver.derive(input) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "rejected create request");
                return ProxyResponse::validation_failed(field, &error, raw.clone());
            }
        };

        return match orchestrator::submit(self.orchestrator.as_ref(), &identity).await {
            Ok(receipt) => ProxyResponse::json(
                202,
                json!({
                    "Status": "Accepted",
                    "StackName": identity.stack.as_str(),
                    "Message": ACCEPTED_MESSAGE,
                    "Stack": { "StackId": receipt.stack_id },
                }),
            ),
            Err(error) => ProxyResponse::json(
                400,
                json!({
                    "Status": "Error",
                    "StackName": identity.stack.as_str(),
                    "Name": input,
                    "Error": error.to_string(),
                }),
            ),
        };
    }

    /// Derives the stack from the `name` path parameter.
    fn stack_from_path(&self, request: &ProxyRequest) -> Result<StackIdentity, ProxyResponse> {
        let name = request.path_parameter("name").unwrap_or_default();

        return match self.deriver.derive(name) {
            Ok(identity) => Ok(identity.stack),
            Err(error) => Err(ProxyResponse::validation_failed(
                "name",
                &error,
                Value::String(name.to_string()),
            )),
        };
    }

    async fn show(&self, request: &ProxyRequest) -> ProxyResponse {
        let stack = match self.stack_from_path(request) {
            Ok(stack) => stack,
            Err(response) => return response,
        };

        let mut resolution = match resolver::resolve(
            self.orchestrator.as_ref(),
            self.cdn.as_ref(),
            &stack,
            self.topology.slots(),
        )
        .await
        {
            Ok(resolution) => resolution,
            Err(error) => return ProxyResponse::backend_error(&error),
        };

        let mut body = Map::new();
        for slot in self.topology.slots() {
            if let Some(descriptor) = resolution.remove(slot.logical_name) {
                body.insert(slot.role.to_string(), descriptor_value(&descriptor));
            }
        }

        return ProxyResponse::json(200, Value::Object(body));
    }

    async fn issue_credential(&self, request: &ProxyRequest) -> ProxyResponse {
        let stack = match self.stack_from_path(request) {
            Ok(stack) => stack,
            Err(response) => return response,
        };

        let logical_name = match self.identity_slot(request.path_parameter("resource")) {
            Ok(logical_name) => logical_name,
            Err(response) => return response,
        };

        let user = match resolver::resolve_physical(
            self.orchestrator.as_ref(),
            &stack,
            logical_name,
        )
        .await
        {
            Ok(user) => user,
            Err(error) => return ProxyResponse::backend_error(&error),
        };

        return match credentials::issue(self.identity.as_ref(), &user.physical_resource_id).await {
            Ok(credential) => ProxyResponse::json(201, json!({ "AccessCredential": credential })),
            Err(error) => ProxyResponse::backend_error(&error),
        };
    }

    /// Picks the identity slot named by `resource`, or the only one when the
    /// topology has a single identity.
    fn identity_slot(&self, resource: Option<&str>) -> Result<&'static str, ProxyResponse> {
        let identities: Vec<&'static str> = self
            .topology
            .identity_slots()
            .map(|slot| slot.logical_name)
            .collect();

        let unknown = |value: &str| {
            ProxyResponse::json(
                422,
                json!({
                    "Status": "Validation Failed",
                    "Message": format!("'resource' must be one of {}", identities.join(", ")),
                    "Error": { "Resource": value },
                }),
            )
        };

        return match resource {
            Some(resource) => match self.topology.slot(resource) {
                Some(slot) if slot.kind == ResourceKind::Identity => Ok(slot.logical_name),
                _ => Err(unknown(resource)),
            },
            None if identities.len() == 1 => Ok(identities[0]),
            None => Err(unknown("")),
        };
    }
}

fn descriptor_value(descriptor: &ResourceDescriptor) -> Value {
    return serde_json::to_value(descriptor).unwrap_or(Value::Null);
}
