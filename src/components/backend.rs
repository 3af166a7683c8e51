// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{component_labels, container_port, env_from_secret, env_value, DeploymentConfigTemplate};
use crate::constants::backend_secrets::*;
use crate::options::BackendOptions;
use crate::types::DeploymentConfig;
use k8s_openapi::api::core::v1::EnvVar;

pub const LISTENER_NAME: &str = "backend-listener";
pub const WORKER_NAME: &str = "backend-worker";
pub const CRON_NAME: &str = "backend-cron";

const COMPONENT: &str = "backend";

/// Listener, worker and cron of the backend tier
pub struct Backend {
    options: BackendOptions,
}

impl Backend {
    pub fn new(options: BackendOptions) -> Self {
        Self { options }
    }

    fn image_stream_tag(&self) -> String {
        format!("amp-backend:{}", self.options.image_tag)
    }

    fn redis_env() -> Vec<EnvVar> {
        vec![
            env_from_secret("CONFIG_REDIS_PROXY", REDIS, REDIS_STORAGE_URL, false),
            env_from_secret(
                "CONFIG_REDIS_SENTINEL_HOSTS",
                REDIS,
                REDIS_STORAGE_SENTINEL_HOSTS,
                true,
            ),
            env_from_secret("CONFIG_REDIS_SENTINEL_ROLE", REDIS, REDIS_STORAGE_SENTINEL_ROLE, true),
            env_from_secret("CONFIG_QUEUES_MASTER_NAME", REDIS, REDIS_QUEUES_URL, false),
            env_from_secret(
                "CONFIG_QUEUES_SENTINEL_HOSTS",
                REDIS,
                REDIS_QUEUES_SENTINEL_HOSTS,
                true,
            ),
            env_from_secret("CONFIG_QUEUES_SENTINEL_ROLE", REDIS, REDIS_QUEUES_SENTINEL_ROLE, true),
            env_value("RACK_ENV", "production"),
        ]
    }

    pub fn deployment_configs(&self) -> Vec<DeploymentConfig> {
        vec![
            self.listener_deployment_config(),
            self.worker_deployment_config(),
            self.cron_deployment_config(),
        ]
    }

    pub fn listener_deployment_config(&self) -> DeploymentConfig {
        let mut env = Self::redis_env();
        env.push(env_value("PUMA_WORKERS", "16"));
        env.push(env_from_secret(
            "CONFIG_INTERNAL_API_USER",
            INTERNAL_API,
            INTERNAL_API_USERNAME,
            false,
        ));
        env.push(env_from_secret(
            "CONFIG_INTERNAL_API_PASSWORD",
            INTERNAL_API,
            INTERNAL_API_PASSWORD,
            false,
        ));

        DeploymentConfigTemplate {
            name: LISTENER_NAME,
            labels: component_labels(&self.options.app_label, COMPONENT, Some("listener")),
            replicas: self.options.listener_replicas,
            image_stream_tag: self.image_stream_tag(),
            args: [
                "bin/3scale_backend",
                "start",
                "-e",
                "production",
                "-p",
                "3000",
                "-x",
                "/dev/stdout",
            ]
            .map(String::from)
            .to_vec(),
            env,
            ports: vec![container_port("http", 3000)],
            resources: self.options.listener_resource_requirements.clone(),
        }
        .build()
    }

    pub fn worker_deployment_config(&self) -> DeploymentConfig {
        let mut env = Self::redis_env();
        env.push(env_from_secret("CONFIG_EVENTS_HOOK", "system-events-hook", "URL", false));
        env.push(env_from_secret(
            "CONFIG_EVENTS_HOOK_SHARED_SECRET",
            "system-events-hook",
            "PASSWORD",
            false,
        ));

        DeploymentConfigTemplate {
            name: WORKER_NAME,
            labels: component_labels(&self.options.app_label, COMPONENT, Some("worker")),
            replicas: self.options.worker_replicas,
            image_stream_tag: self.image_stream_tag(),
            args: ["bin/3scale_backend_worker", "run"].map(String::from).to_vec(),
            env,
            ports: Vec::new(),
            resources: self.options.worker_resource_requirements.clone(),
        }
        .build()
    }

    pub fn cron_deployment_config(&self) -> DeploymentConfig {
        DeploymentConfigTemplate {
            name: CRON_NAME,
            labels: component_labels(&self.options.app_label, COMPONENT, Some("cron")),
            replicas: self.options.cron_replicas,
            image_stream_tag: self.image_stream_tag(),
            args: ["backend-cron"].map(String::from).to_vec(),
            env: Self::redis_env(),
            ports: Vec::new(),
            resources: self.options.cron_resource_requirements.clone(),
        }
        .build()
    }
}
