// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Field level access to the Secrets that persist resolved configuration

use crate::constants::OPERATOR_NAME;
use crate::error::{OperatorError, Result};
use crate::kubernetes::ownership::{as_owner, with_owner_reference};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{
    api::{ObjectMeta, Patch, PatchParams, PostParams},
    Api, Client, Resource,
};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{info, instrument};

/// Read and write single fields of named secrets in one namespace
pub trait SecretStore: Send + Sync {
    /// The field's value, None when the secret or the field is missing
    fn read_field(
        &self,
        secret: &str,
        field: &str,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Store a field, creating the secret when it does not exist yet
    fn write_field(
        &self,
        secret: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Secret store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
    namespace: String,
    owner: Option<OwnerReference>,
}

impl KubeSecretStore {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            owner: None,
        }
    }

    /// Secrets created by this store are garbage collected together with `owner`
    pub fn with_owner<K: Resource<DynamicType = ()>>(mut self, owner: &K) -> Self {
        self.owner = as_owner(owner);
        self
    }

    fn api(&self) -> Api<Secret> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn storage_error(&self, op: &str, secret: &str, field: &str, e: kube::Error) -> OperatorError {
        OperatorError::StorageUnavailable(format!(
            "failed to {} field '{}' of Secret {}/{}: {}",
            op, field, self.namespace, secret, e
        ))
    }

    fn new_secret(&self, secret: &str, field: &str, value: &str) -> Secret {
        let mut metadata = ObjectMeta {
            name: Some(secret.to_string()),
            namespace: Some(self.namespace.clone()),
            ..Default::default()
        };
        if let Some(owner) = &self.owner {
            metadata = with_owner_reference(metadata, owner.clone());
        }

        Secret {
            metadata,
            string_data: Some(BTreeMap::from([(field.to_string(), value.to_string())])),
            type_: Some("Opaque".to_string()),
            ..Default::default()
        }
    }
}

fn field_value(secret: &Secret, field: &str) -> Result<Option<String>> {
    if let Some(bytes) = secret.data.as_ref().and_then(|d| d.get(field)) {
        return String::from_utf8(bytes.0.clone()).map(Some).map_err(|e| {
            OperatorError::InvalidSecretData(format!(
                "field '{}' of Secret {}/{} is not valid UTF-8: {}",
                field,
                secret.metadata.namespace.as_deref().unwrap_or_default(),
                secret.metadata.name.as_deref().unwrap_or_default(),
                e
            ))
        });
    }
    Ok(secret
        .string_data
        .as_ref()
        .and_then(|d| d.get(field))
        .cloned())
}

impl SecretStore for KubeSecretStore {
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn read_field(&self, secret: &str, field: &str) -> Result<Option<String>> {
        let existing = self
            .api()
            .get_opt(secret)
            .await
            .map_err(|e| self.storage_error("read", secret, field, e))?;

        match existing {
            Some(s) => field_value(&s, field),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, value), fields(namespace = %self.namespace))]
    async fn write_field(&self, secret: &str, field: &str, value: &str) -> Result<()> {
        let api = self.api();
        let existing = api
            .get_opt(secret)
            .await
            .map_err(|e| self.storage_error("write", secret, field, e))?;

        match existing {
            None => {
                info!("Creating Secret {}/{} with field '{}'", self.namespace, secret, field);
                api.create(&PostParams::default(), &self.new_secret(secret, field, value))
                    .await
                    .map_err(|e| self.storage_error("write", secret, field, e))?;
            }
            Some(_) => {
                info!("Adding field '{}' to Secret {}/{}", field, self.namespace, secret);
                let patch = serde_json::json!({ "stringData": BTreeMap::from([(field, value)]) });
                let pp = PatchParams {
                    field_manager: Some(OPERATOR_NAME.to_string()),
                    ..Default::default()
                };
                api.patch(secret, &pp, &Patch::Merge(&patch))
                    .await
                    .map_err(|e| self.storage_error("write", secret, field, e))?;
            }
        }

        Ok(())
    }
}
