// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::{ObjectReference, PodTemplateSpec};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const TRIGGER_IMAGE_CHANGE: &str = "ImageChange";
pub const TRIGGER_CONFIG_CHANGE: &str = "ConfigChange";

/// OpenShift DeploymentConfig (apps.openshift.io/v1).
///
/// Only the fields the operator reads or writes are typed, the rest of the
/// spec is carried in `extra` so a read-modify-replace cycle keeps it intact.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "apps.openshift.io",
    version = "v1",
    kind = "DeploymentConfig",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    #[serde(default)]
    pub replicas: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PodTemplateSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<DeploymentTriggerPolicy>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerPolicy {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change_params: Option<DeploymentTriggerImageChangeParams>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl DeploymentTriggerPolicy {
    pub fn config_change() -> Self {
        Self {
            type_: TRIGGER_CONFIG_CHANGE.to_string(),
            ..Default::default()
        }
    }

    /// Trigger a rollout of `containers` whenever `image_stream_tag` moves
    pub fn image_change(containers: &[&str], image_stream_tag: &str) -> Self {
        Self {
            type_: TRIGGER_IMAGE_CHANGE.to_string(),
            image_change_params: Some(DeploymentTriggerImageChangeParams {
                automatic: Some(true),
                container_names: containers.iter().map(|c| c.to_string()).collect(),
                from: ObjectReference {
                    kind: Some("ImageStreamTag".to_string()),
                    name: Some(image_stream_tag.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn is_image_change(&self) -> bool {
        self.type_ == TRIGGER_IMAGE_CHANGE
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerImageChangeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub container_names: Vec<String>,
    pub from: ObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered_image: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
