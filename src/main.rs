//! SR-IOV network node policy cleanup
//!
//! Lists the SriovNetworkNodePolicies in the operator namespace and deletes
//! every one except the operator-owned `default` policy.

use kube::{Client, ResourceExt};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kube_resource_builders::{
    adapters::{clean_all_network_node_policies, list_policy, DEFAULT_POLICY_NAME},
    config::CleanupConfig,
    metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    let config = CleanupConfig::from_env();
    info!(
        "Starting SriovNetworkNodePolicy cleanup in namespace {}",
        config.namespace
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes API server");

    let params = config.list_params();
    let policies = list_policy(&client, &config.namespace, &params).await?;

    for policy in &policies {
        let name = policy.definition().name_any();
        if name == DEFAULT_POLICY_NAME {
            info!("Keeping policy {}", name);
        } else if config.dry_run {
            info!("Would delete policy {}", name);
        }
    }

    if !config.dry_run {
        clean_all_network_node_policies(&client, &config.namespace, &params).await?;
        info!("SriovNetworkNodePolicy cleanup finished");
    }

    debug!("API request metrics:\n{}", metrics::render());
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,kube_resource_builders=debug,kube=warn,hyper=warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
