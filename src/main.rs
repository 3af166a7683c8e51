// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::{Client, CustomResourceExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use amp_operator::config::Config;
use amp_operator::constants::{OPERATOR_NAME, THREESCALE_RELEASE};
use amp_operator::kubernetes::wait_for_openshift_apis;
use amp_operator::reconcilers::ApiManagerReconciler;
use amp_operator::types::ApiManager;

#[tokio::main]
async fn main() -> Result<()> {
    // `amp-operator crd` prints the ApiManager CRD and exits
    if std::env::args().nth(1).as_deref() == Some("crd") {
        print!("{}", serde_yaml::to_string(&ApiManager::crd()).context("failed to render CRD")?);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting {} for release {}", OPERATOR_NAME, THREESCALE_RELEASE);

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={:?}, requeue_after={:?}, resync_interval={:?}",
        config.watch_namespace, config.requeue_after, config.resync_interval
    );

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    // DeploymentConfigs and ImageStreams only exist on OpenShift
    info!("Waiting for OpenShift APIs to become available...");
    wait_for_openshift_apis(&client).await?;

    info!("Starting reconciler...");
    ApiManagerReconciler::new(client, config).run().await?;

    // This should never be reached as the reconciler runs forever
    warn!("Reconciler stopped unexpectedly");
    Ok(())
}
