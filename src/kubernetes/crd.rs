// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API availability checking utilities

use crate::constants::crd::{POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::{OperatorError, Result};
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// An API resource the operator needs before it can reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredApi {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
}

impl std::fmt::Display for RequiredApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.kind, self.group, self.version)
    }
}

pub const REQUIRED_APIS: [RequiredApi; 2] = [
    RequiredApi {
        group: "apps.openshift.io",
        version: "v1",
        kind: "DeploymentConfig",
    },
    RequiredApi {
        group: "image.openshift.io",
        version: "v1",
        kind: "ImageStream",
    },
];

/// Wait for the OpenShift DeploymentConfig and ImageStream APIs.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_openshift_apis(client: &Client) -> Result<()> {
    for api in REQUIRED_APIS {
        wait_for_api(client, api).await?;
    }
    Ok(())
}

async fn wait_for_api(client: &Client, api: RequiredApi) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match check_api_exists(client, api).await {
            Ok(true) => {
                info!("{} is available", api);
                return Ok(());
            }
            Ok(false) => {
                info!("{} not yet available, waiting {} seconds...", api, interval);
            }
            Err(e) => {
                warn!("Error checking for {}: {}, retrying in {} seconds...", api, e, interval);
            }
        }

        sleep(Duration::from_secs(interval)).await;

        // Exponential backoff with max cap
        interval = next_interval(interval);
    }
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}

async fn check_api_exists(client: &Client, api: RequiredApi) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[api.group])
        .run()
        .await
        .map_err(|e| {
            OperatorError::StorageUnavailable(format!("API discovery for {} failed: {}", api, e))
        })?;

    let found = discovery
        .groups()
        .filter(|group| group.name() == api.group)
        .flat_map(|group| group.recommended_resources())
        .any(|(ar, _)| ar.kind == api.kind && ar.version == api.version);
    Ok(found)
}
