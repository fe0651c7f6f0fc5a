use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing_subscriber::EnvFilter;

pub mod backend;
pub mod config;
pub mod credentials;
pub mod descriptor;
pub mod handlers;
pub mod naming;
pub mod orchestrator;
pub mod resolver;
pub mod templates;
pub mod topology;

use backend::aws;
use handlers::{ProxyRequest, ProxyResponse, Service};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .without_time()
        .init();

    let config = match env::var("CONFIG_PATH") {
        Ok(path) => config::parse(&PathBuf::from(path))?,
        Err(_) => config::from_env()?,
    };
    tracing::info!(
        prefix = %config.prefix,
        topology = ?config.topology,
        naming = ?config.naming,
        "loaded config"
    );

    let sdk_config = aws::load_sdk_config(config.region.as_deref()).await;
    let service = Arc::new(Service::new(
        &config,
        Arc::new(aws::CloudFormation::new(&sdk_config)),
        Arc::new(aws::CloudFront::new(&sdk_config)),
        Arc::new(aws::Iam::new(&sdk_config)),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ProxyRequest>| {
        let service = service.clone();
        async move {
            let response: ProxyResponse = service.handle(&event.payload).await;
            tracing::info!(status_code = response.status_code, "responded");
            return Ok::<ProxyResponse, lambda_runtime::Error>(response);
        }
    }))
    .await?;

    return Ok(());
}
