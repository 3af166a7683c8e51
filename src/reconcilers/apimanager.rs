// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ApiManager reconciler - runs one upgrade tick per ApiManager change or resync.

use crate::config::Config;
use crate::error::{OperatorError, Result};
use crate::kubernetes::identity::object_info;
use crate::kubernetes::secrets::{KubeSecretStore, SecretStore};
use crate::kubernetes::store::{KubeObjectStore, ObjectStore};
use crate::types::{ApiManager, DeploymentConfig, ImageStream};
use crate::upgrade::{StageResult, UpgradeApiManager};
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct ApiManagerReconciler {
    client: Client,
    config: Config,
}

impl ApiManagerReconciler {
    pub fn new(client: Client, config: Config) -> Self {
        Self { client, config }
    }

    fn api<K>(&self) -> Api<K>
    where
        K: kube::Resource<DynamicType = (), Scope = k8s_openapi::NamespaceResourceScope>,
    {
        match self.config.watch_namespace.as_deref() {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let apimanagers: Api<ApiManager> = self.api();
        let deployment_configs: Api<DeploymentConfig> = self.api();
        let image_streams: Api<ImageStream> = self.api();
        match self.config.watch_namespace.as_deref() {
            Some(namespace) => info!("Watching ApiManagers in namespace {}", namespace),
            None => info!("Watching ApiManagers in all namespaces"),
        }
        let context = Arc::new(self);

        Controller::new(apimanagers, WatcherConfig::default())
            .owns(deployment_configs, WatcherConfig::default())
            .owns(image_streams, WatcherConfig::default())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled ApiManager: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile(apimanager: Arc<ApiManager>, ctx: Arc<ApiManagerReconciler>) -> Result<Action> {
    let Some(namespace) = apimanager.namespace() else {
        warn!("Skipping {} without a namespace", object_info(apimanager.as_ref()));
        return Ok(Action::await_change());
    };

    let objects = KubeObjectStore::new(ctx.client.clone(), &namespace);
    let secrets =
        KubeSecretStore::new(ctx.client.clone(), &namespace).with_owner(apimanager.as_ref());
    tick(&apimanager, &objects, &secrets, &ctx.config).await
}

/// Run the upgrade for one ApiManager and decide when to look at it again
#[instrument(skip_all, fields(apimanager = %object_info(apimanager)))]
pub async fn tick<O, S>(
    apimanager: &ApiManager,
    objects: &O,
    secrets: &S,
    config: &Config,
) -> Result<Action>
where
    O: ObjectStore,
    S: SecretStore,
{
    if apimanager.metadata.deletion_timestamp.is_some() {
        debug!("ApiManager is being deleted, leaving cleanup to garbage collection");
        return Ok(Action::await_change());
    }

    let result = UpgradeApiManager::new(apimanager, objects, secrets)
        .upgrade()
        .await?;
    Ok(action_for(result, config))
}

pub fn action_for(result: StageResult, config: &Config) -> Action {
    match result {
        StageResult::Requeue => Action::requeue(config.requeue_after),
        StageResult::Done => Action::requeue(config.resync_interval),
    }
}

/// Retryable errors come back after `error_requeue`, the rest wait for a change to the ApiManager
pub fn error_action(error: &OperatorError, config: &Config) -> Action {
    if error.is_retryable() {
        Action::requeue(config.error_requeue)
    } else {
        Action::await_change()
    }
}

fn error_policy(
    apimanager: Arc<ApiManager>,
    error: &OperatorError,
    ctx: Arc<ApiManagerReconciler>,
) -> Action {
    if error.is_retryable() {
        warn!("Reconciliation of {} failed, retrying: {}", object_info(apimanager.as_ref()), error);
    } else {
        error!("Reconciliation of {} failed: {}", object_info(apimanager.as_ref()), error);
    }
    error_action(error, &ctx.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apimanager, InMemoryObjectStore, InMemorySecretStore};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            watch_namespace: None,
            requeue_after: Duration::from_secs(5),
            resync_interval: Duration::from_secs(300),
            error_requeue: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_stage_results_map_to_requeue_delays() {
        assert_eq!(
            action_for(StageResult::Requeue, &config()),
            Action::requeue(Duration::from_secs(5))
        );
        assert_eq!(
            action_for(StageResult::Done, &config()),
            Action::requeue(Duration::from_secs(300))
        );
    }

    #[test]
    fn test_error_policy_by_retryability() {
        let transient =
            OperatorError::StorageUnavailable("etcd timeout".to_string()).in_stage("images");
        assert_eq!(error_action(&transient, &config()), Action::requeue(Duration::from_secs(60)));

        let fatal = OperatorError::MalformedTemplate("two triggers".to_string());
        assert_eq!(error_action(&fatal, &config()), Action::await_change());
    }

    #[tokio::test]
    async fn test_first_tick_requeues_soon() {
        let objects = InMemoryObjectStore::new("3scale");
        let secrets = InMemorySecretStore::new();

        let action = tick(&apimanager("acme", "example.com"), &objects, &secrets, &config())
            .await
            .unwrap();

        assert_eq!(action, Action::requeue(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_deleted_apimanager_is_left_alone() {
        let objects = InMemoryObjectStore::new("3scale");
        let secrets = InMemorySecretStore::new();
        let mut apimanager = apimanager("acme", "example.com");
        apimanager.metadata.deletion_timestamp = Some(Time(k8s_openapi::chrono::Utc::now()));

        let action = tick(&apimanager, &objects, &secrets, &config()).await.unwrap();

        assert_eq!(action, Action::await_change());
        assert!(objects.calls().is_empty());
    }
}
