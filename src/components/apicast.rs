// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{component_labels, container_port, env_value, object_meta, DeploymentConfigTemplate};
use crate::constants::labels;
use crate::options::ApicastOptions;
use crate::types::service_monitor::Endpoint;
use crate::types::{DeploymentConfig, ServiceMonitor, ServiceMonitorSpec};
use k8s_openapi::api::core::v1::EnvVar;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;

pub const STAGING_NAME: &str = "apicast-staging";
pub const PRODUCTION_NAME: &str = "apicast-production";
pub const SERVICE_MONITOR_NAME: &str = "apicast";

const COMPONENT: &str = "apicast";

/// Staging and production gateways
pub struct Apicast {
    options: ApicastOptions,
}

impl Apicast {
    pub fn new(options: ApicastOptions) -> Self {
        Self { options }
    }

    fn image_stream_tag(&self) -> String {
        format!("amp-apicast:{}", self.options.image_tag)
    }

    fn env(&self, environment: &str, loader: &str, cache_ttl: &str) -> Vec<EnvVar> {
        vec![
            env_value("THREESCALE_DEPLOYMENT_ENV", environment),
            env_value("APICAST_CONFIGURATION_LOADER", loader),
            env_value("APICAST_CONFIGURATION_CACHE", cache_ttl),
            env_value("APICAST_MANAGEMENT_API", &self.options.management_api),
            env_value("OPENSSL_VERIFY", &self.options.openssl_verify),
            env_value("APICAST_RESPONSE_CODES", &self.options.response_codes),
        ]
    }

    pub fn staging_deployment_config(&self) -> DeploymentConfig {
        DeploymentConfigTemplate {
            name: STAGING_NAME,
            labels: component_labels(&self.options.app_label, COMPONENT, Some("staging")),
            replicas: self.options.staging_replicas,
            image_stream_tag: self.image_stream_tag(),
            args: Vec::new(),
            env: self.env("staging", "lazy", "0"),
            ports: vec![
                container_port("proxy", 8080),
                container_port("management", 8090),
                container_port("metrics", 9421),
            ],
            resources: self.options.staging_resource_requirements.clone(),
        }
        .build()
    }

    pub fn production_deployment_config(&self) -> DeploymentConfig {
        DeploymentConfigTemplate {
            name: PRODUCTION_NAME,
            labels: component_labels(&self.options.app_label, COMPONENT, Some("production")),
            replicas: self.options.production_replicas,
            image_stream_tag: self.image_stream_tag(),
            args: Vec::new(),
            env: self.env("production", "boot", "300"),
            ports: vec![
                container_port("proxy", 8080),
                container_port("management", 8090),
                container_port("metrics", 9421),
            ],
            resources: self.options.production_resource_requirements.clone(),
        }
        .build()
    }

    /// One monitor scraping both gateways
    pub fn service_monitor(&self) -> ServiceMonitor {
        let mut meta_labels = BTreeMap::from([(
            labels::MONITORING_KEY.to_string(),
            labels::MONITORING_KEY_VALUE.to_string(),
        )]);
        meta_labels.insert(labels::APP.to_string(), self.options.app_label.clone());

        ServiceMonitor {
            metadata: object_meta(SERVICE_MONITOR_NAME, meta_labels),
            spec: ServiceMonitorSpec {
                endpoints: vec![Endpoint {
                    port: Some("metrics".to_string()),
                    path: Some("/metrics".to_string()),
                    interval: Some("10s".to_string()),
                    scheme: Some("http".to_string()),
                    extra: BTreeMap::new(),
                }],
                selector: LabelSelector {
                    match_labels: Some(component_labels(&self.options.app_label, COMPONENT, None)),
                    match_expressions: None,
                },
                extra: BTreeMap::new(),
            },
        }
    }
}
