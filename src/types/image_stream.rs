// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::core::v1::ObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// OpenShift ImageStream (image.openshift.io/v1)
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "image.openshift.io",
    version = "v1",
    kind = "ImageStream",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagReference>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ImageStream {
    pub fn tag(&self, name: &str) -> Option<&TagReference> {
        self.spec.tags.iter().find(|t| t.name == name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_policy: Option<TagImportPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_policy: Option<TagReferencePolicy>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TagReference {
    /// A tag importing `image` from an external registry
    pub fn docker_image(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            annotations: Some(BTreeMap::from([(
                "openshift.io/display-name".to_string(),
                format!("{} {}", image.split(':').next().unwrap_or(image), name),
            )])),
            from: Some(ObjectReference {
                kind: Some("DockerImage".to_string()),
                name: Some(image.to_string()),
                ..Default::default()
            }),
            import_policy: None,
            reference_policy: Some(TagReferencePolicy {
                type_: "Source".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn source_kind(&self) -> Option<&str> {
        self.from.as_ref().and_then(|f| f.kind.as_deref())
    }

    pub fn source_name(&self) -> Option<&str> {
        self.from.as_ref().and_then(|f| f.name.as_deref())
    }

    /// An absent import policy imports over TLS
    pub fn is_insecure(&self) -> bool {
        self.import_policy.as_ref().is_some_and(|p| p.insecure)
    }

    pub fn reference_policy_type(&self) -> Option<&str> {
        self.reference_policy.as_ref().map(|p| p.type_.as_str())
    }
}

/// The API server omits false flags, so both default to false when absent
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagImportPolicy {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub scheduled: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TagReferencePolicy {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
