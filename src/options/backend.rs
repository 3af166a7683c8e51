// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Backend (listener, worker, cron) options

use crate::constants::{backend_secrets, THREESCALE_RELEASE};
use crate::error::{Result, ValidationErrors};
use crate::kubernetes::secrets::SecretStore;
use crate::options::resolver::{SecretRef, SecretSource};
use crate::options::resources;
use crate::types::ApiManager;
use k8s_openapi::api::core::v1::ResourceRequirements;
use kube::ResourceExt;
use tracing::{debug, instrument};

/// Fully resolved configuration of the backend tier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendOptions {
    pub app_label: String,
    pub tenant_name: String,
    pub wildcard_domain: String,
    pub image_tag: String,

    pub system_backend_username: String,
    pub system_backend_password: String,
    pub service_endpoint: String,
    pub route_endpoint: String,
    pub storage_url: String,
    pub queues_url: String,
    pub storage_sentinel_hosts: Option<String>,
    pub storage_sentinel_role: Option<String>,
    pub queues_sentinel_hosts: Option<String>,
    pub queues_sentinel_role: Option<String>,

    pub listener_resource_requirements: ResourceRequirements,
    pub worker_resource_requirements: ResourceRequirements,
    pub cron_resource_requirements: ResourceRequirements,

    pub listener_replicas: i32,
    pub worker_replicas: i32,
    pub cron_replicas: i32,
}

impl BackendOptions {
    /// Report every missing or out of range field at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_empty("app_label", &self.app_label);
        errors.require_non_empty("tenant_name", &self.tenant_name);
        errors.require_non_empty("wildcard_domain", &self.wildcard_domain);
        errors.require_non_empty("image_tag", &self.image_tag);
        errors.require_non_empty("system_backend_username", &self.system_backend_username);
        errors.require_non_empty("system_backend_password", &self.system_backend_password);
        errors.require_non_empty("service_endpoint", &self.service_endpoint);
        errors.require_url("service_endpoint", &self.service_endpoint);
        errors.require_non_empty("route_endpoint", &self.route_endpoint);
        errors.require_url("route_endpoint", &self.route_endpoint);
        errors.require_non_empty("storage_url", &self.storage_url);
        errors.require_url("storage_url", &self.storage_url);
        errors.require_non_empty("queues_url", &self.queues_url);
        errors.require_url("queues_url", &self.queues_url);
        errors.require_non_negative("listener_replicas", self.listener_replicas);
        errors.require_non_negative("worker_replicas", self.worker_replicas);
        errors.require_non_negative("cron_replicas", self.cron_replicas);
        errors.into_result()
    }
}

pub fn default_system_backend_username() -> String {
    "3scale_api_user".to_string()
}

/// Derived from the owning ApiManager's uid so equal inputs give equal options.
/// The uid is readable by anyone who can read the ApiManager.
pub fn default_system_backend_password(seed: &str) -> String {
    seed.chars()
        .filter(char::is_ascii_alphanumeric)
        .take(16)
        .collect()
}

pub fn default_backend_service_endpoint() -> String {
    "http://backend-listener:3000".to_string()
}

pub fn default_backend_route_endpoint(tenant_name: &str, wildcard_domain: &str) -> String {
    format!("https://backend-{}.{}", tenant_name, wildcard_domain)
}

pub fn default_backend_redis_storage_url() -> String {
    "redis://backend-redis:6379/0".to_string()
}

pub fn default_backend_redis_queues_url() -> String {
    "redis://backend-redis:6379/1".to_string()
}

/// Sentinel hosts and roles are unset unless configured in the secret
pub fn default_backend_sentinel() -> String {
    String::new()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One secret-backed option and where its resolved value goes.
/// Without a default the value must already be stored.
struct SecretBackedOption {
    name: &'static str,
    reference: SecretRef,
    default: Option<String>,
    set: fn(&mut BackendOptions, String),
}

fn secret_backed_options(apimanager: &ApiManager) -> Vec<SecretBackedOption> {
    use backend_secrets::*;

    let spec = &apimanager.spec;
    let uid = apimanager.uid().filter(|uid| !uid.is_empty());

    vec![
        SecretBackedOption {
            name: "system_backend_username",
            reference: SecretRef::new(INTERNAL_API, INTERNAL_API_USERNAME),
            default: Some(default_system_backend_username()),
            set: |o, v| o.system_backend_username = v,
        },
        SecretBackedOption {
            name: "system_backend_password",
            reference: SecretRef::new(INTERNAL_API, INTERNAL_API_PASSWORD),
            default: uid.as_deref().map(default_system_backend_password),
            set: |o, v| o.system_backend_password = v,
        },
        SecretBackedOption {
            name: "service_endpoint",
            reference: SecretRef::new(LISTENER, LISTENER_SERVICE_ENDPOINT),
            default: Some(default_backend_service_endpoint()),
            set: |o, v| o.service_endpoint = v,
        },
        SecretBackedOption {
            name: "route_endpoint",
            reference: SecretRef::new(LISTENER, LISTENER_ROUTE_ENDPOINT),
            default: Some(default_backend_route_endpoint(&spec.tenant_name, &spec.wildcard_domain)),
            set: |o, v| o.route_endpoint = v,
        },
        SecretBackedOption {
            name: "storage_url",
            reference: SecretRef::new(REDIS, REDIS_STORAGE_URL),
            default: Some(default_backend_redis_storage_url()),
            set: |o, v| o.storage_url = v,
        },
        SecretBackedOption {
            name: "queues_url",
            reference: SecretRef::new(REDIS, REDIS_QUEUES_URL),
            default: Some(default_backend_redis_queues_url()),
            set: |o, v| o.queues_url = v,
        },
        SecretBackedOption {
            name: "storage_sentinel_hosts",
            reference: SecretRef::new(REDIS, REDIS_STORAGE_SENTINEL_HOSTS),
            default: Some(default_backend_sentinel()),
            set: |o, v| o.storage_sentinel_hosts = non_empty(v),
        },
        SecretBackedOption {
            name: "storage_sentinel_role",
            reference: SecretRef::new(REDIS, REDIS_STORAGE_SENTINEL_ROLE),
            default: Some(default_backend_sentinel()),
            set: |o, v| o.storage_sentinel_role = non_empty(v),
        },
        SecretBackedOption {
            name: "queues_sentinel_hosts",
            reference: SecretRef::new(REDIS, REDIS_QUEUES_SENTINEL_HOSTS),
            default: Some(default_backend_sentinel()),
            set: |o, v| o.queues_sentinel_hosts = non_empty(v),
        },
        SecretBackedOption {
            name: "queues_sentinel_role",
            reference: SecretRef::new(REDIS, REDIS_QUEUES_SENTINEL_ROLE),
            default: Some(default_backend_sentinel()),
            set: |o, v| o.queues_sentinel_role = non_empty(v),
        },
    ]
}

/// Builds [`BackendOptions`] from an ApiManager and the backend secrets
pub struct BackendOptionsProvider<'a, S> {
    apimanager: &'a ApiManager,
    secrets: SecretSource<'a, S>,
}

impl<'a, S: SecretStore> BackendOptionsProvider<'a, S> {
    pub fn new(apimanager: &'a ApiManager, store: &'a S) -> Self {
        Self {
            apimanager,
            secrets: SecretSource::new(store),
        }
    }

    #[instrument(skip(self), fields(apimanager = %self.apimanager.name_any()))]
    pub async fn get_backend_options(&self) -> Result<BackendOptions> {
        let spec = &self.apimanager.spec;
        let mut options = BackendOptions {
            app_label: spec.app_label.clone(),
            tenant_name: spec.tenant_name.clone(),
            wildcard_domain: spec.wildcard_domain.clone(),
            image_tag: THREESCALE_RELEASE.to_string(),
            ..Default::default()
        };

        let mut underivable = ValidationErrors::new();
        for option in secret_backed_options(self.apimanager) {
            let value = match &option.default {
                Some(default) => self.secrets.resolve(option.reference, default).await?,
                None => match self.secrets.stored(option.reference).await? {
                    Some(value) => value,
                    None => {
                        underivable.push(
                            option.name,
                            format!(
                                "missing from Secret '{}' and the ApiManager has no uid",
                                option.reference.secret
                            ),
                        );
                        continue;
                    }
                },
            };
            (option.set)(&mut options, value);
        }
        underivable.into_result()?;

        self.set_resource_requirements(&mut options);
        self.set_replicas(&mut options);

        options.validate()?;
        debug!("Backend options resolved");
        Ok(options)
    }

    fn set_resource_requirements(&self, options: &mut BackendOptions) {
        if self.apimanager.spec.resource_requirements_enabled {
            options.listener_resource_requirements = resources::backend_listener();
            options.worker_resource_requirements = resources::backend_worker();
            options.cron_resource_requirements = resources::backend_cron();
        } else {
            options.listener_resource_requirements = resources::unspecified();
            options.worker_resource_requirements = resources::unspecified();
            options.cron_resource_requirements = resources::unspecified();
        }
    }

    fn set_replicas(&self, options: &mut BackendOptions) {
        let backend = &self.apimanager.spec.backend;
        options.listener_replicas = backend.listener_spec.replicas;
        options.worker_replicas = backend.worker_spec.replicas;
        options.cron_replicas = backend.cron_spec.replicas;
    }
}
