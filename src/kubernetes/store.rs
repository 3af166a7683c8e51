// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespaced object store used by the upgrade engine

use crate::error::{OperatorError, Result};
use crate::kubernetes::identity::object_info;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{ListParams, PostParams},
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::future::Future;
use tracing::{debug, instrument};

/// Any namespaced resource the engine can read and write
pub trait ManagedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> ManagedResource for K where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// Read and write access to objects in a single namespace
pub trait ObjectStore: Send + Sync {
    /// Fetch an object by name, None when it does not exist
    fn get<K: ManagedResource>(&self, name: &str) -> impl Future<Output = Result<Option<K>>> + Send;

    fn create<K: ManagedResource>(&self, obj: &K) -> impl Future<Output = Result<K>> + Send;

    /// Replace an object; the resourceVersion it was read with guards against lost updates
    fn update<K: ManagedResource>(&self, obj: &K) -> impl Future<Output = Result<K>> + Send;

    fn list<K: ManagedResource>(
        &self,
        label_selector: &str,
    ) -> impl Future<Output = Result<Vec<K>>> + Send;
}

/// Object store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeObjectStore {
    client: Client,
    namespace: String,
}

impl KubeObjectStore {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    fn api<K: ManagedResource>(&self) -> Api<K> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn storage_error<K: ManagedResource>(
        &self,
        op: &str,
        name: &str,
        e: kube::Error,
    ) -> OperatorError {
        OperatorError::StorageUnavailable(format!(
            "failed to {} {} {}/{}: {}",
            op,
            K::kind(&()),
            self.namespace,
            name,
            e
        ))
    }
}

impl ObjectStore for KubeObjectStore {
    #[instrument(skip(self), fields(kind = %K::kind(&()), namespace = %self.namespace))]
    async fn get<K: ManagedResource>(&self, name: &str) -> Result<Option<K>> {
        let obj = self
            .api::<K>()
            .get_opt(name)
            .await
            .map_err(|e| self.storage_error::<K>("get", name, e))?;
        if obj.is_none() {
            debug!("{} {}/{} not found", K::kind(&()), self.namespace, name);
        }
        Ok(obj)
    }

    #[instrument(skip(self, obj), fields(object = %object_info(obj)))]
    async fn create<K: ManagedResource>(&self, obj: &K) -> Result<K> {
        self.api::<K>()
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| self.storage_error::<K>("create", &obj.name_any(), e))
    }

    #[instrument(skip(self, obj), fields(object = %object_info(obj)))]
    async fn update<K: ManagedResource>(&self, obj: &K) -> Result<K> {
        let name = obj.name_any();
        self.api::<K>()
            .replace(&name, &PostParams::default(), obj)
            .await
            .map_err(|e| self.storage_error::<K>("update", &name, e))
    }

    #[instrument(skip(self), fields(kind = %K::kind(&()), namespace = %self.namespace))]
    async fn list<K: ManagedResource>(&self, label_selector: &str) -> Result<Vec<K>> {
        let lp = ListParams::default().labels(label_selector);
        self.api::<K>()
            .list(&lp)
            .await
            .map(|list| list.items)
            .map_err(|e| self.storage_error::<K>("list", label_selector, e))
    }
}
