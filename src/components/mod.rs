// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Desired state of the objects managed for an ApiManager.
//!
//! Every generator is a pure function of its Options: the same Options always
//! produce byte-for-byte identical objects.

pub mod apicast;
pub mod backend;
pub mod images;

pub use apicast::Apicast;
pub use backend::Backend;
pub use images::{AmpImages, DatabaseImages, RedisImages};

use crate::constants::labels;
use crate::types::{DeploymentConfig, DeploymentConfigSpec, DeploymentTriggerPolicy};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec, ResourceRequirements,
    SecretKeySelector,
};
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

pub(crate) fn component_labels(
    app_label: &str,
    component: &str,
    element: Option<&str>,
) -> BTreeMap<String, String> {
    let mut result = BTreeMap::from([
        (labels::APP.to_string(), app_label.to_string()),
        (labels::COMPONENT.to_string(), component.to_string()),
    ]);
    if let Some(element) = element {
        result.insert(labels::COMPONENT_ELEMENT.to_string(), element.to_string());
    }
    result
}

pub(crate) fn object_meta(name: &str, labels: BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        labels: Some(labels),
        ..Default::default()
    }
}

pub(crate) fn env_value(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        value_from: None,
    }
}

/// An env var read from `secret`; `optional` keys may be absent from the secret
pub(crate) fn env_from_secret(name: &str, secret: &str, key: &str, optional: bool) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret.to_string(),
                key: key.to_string(),
                optional: optional.then_some(true),
            }),
            ..Default::default()
        }),
    }
}

pub(crate) fn container_port(name: &str, port: i32) -> ContainerPort {
    ContainerPort {
        name: Some(name.to_string()),
        container_port: port,
        protocol: Some("TCP".to_string()),
        ..Default::default()
    }
}

/// Everything that differs between the generated DeploymentConfigs
pub(crate) struct DeploymentConfigTemplate<'a> {
    pub name: &'a str,
    pub labels: BTreeMap<String, String>,
    pub replicas: i32,
    pub image_stream_tag: String,
    pub args: Vec<String>,
    pub env: Vec<EnvVar>,
    pub ports: Vec<ContainerPort>,
    pub resources: ResourceRequirements,
}

impl DeploymentConfigTemplate<'_> {
    /// A single-container DeploymentConfig rolled out on config and image changes
    pub fn build(self) -> DeploymentConfig {
        let selector = BTreeMap::from([(
            labels::DEPLOYMENT_CONFIG.to_string(),
            self.name.to_string(),
        )]);
        let mut pod_labels = self.labels.clone();
        pod_labels.extend(selector.clone());

        let container = Container {
            name: self.name.to_string(),
            // Resolved by the image change trigger
            image: Some(self.image_stream_tag.clone()),
            image_pull_policy: Some("IfNotPresent".to_string()),
            args: (!self.args.is_empty()).then_some(self.args),
            env: (!self.env.is_empty()).then_some(self.env),
            ports: (!self.ports.is_empty()).then_some(self.ports),
            resources: Some(self.resources),
            ..Default::default()
        };

        DeploymentConfig {
            metadata: object_meta(self.name, self.labels),
            spec: DeploymentConfigSpec {
                replicas: self.replicas,
                selector: Some(selector),
                strategy: None,
                template: Some(PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(pod_labels),
                        ..Default::default()
                    }),
                    spec: Some(PodSpec {
                        containers: vec![container],
                        ..Default::default()
                    }),
                }),
                triggers: vec![
                    DeploymentTriggerPolicy::config_change(),
                    DeploymentTriggerPolicy::image_change(&[self.name], &self.image_stream_tag),
                ],
                extra: BTreeMap::new(),
            },
        }
    }
}
