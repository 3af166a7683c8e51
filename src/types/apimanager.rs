// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Declared intent for one API-management platform installation
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(
    group = "apps.3scale.net",
    version = "v1alpha1",
    kind = "APIManager",
    shortname = "apimanager",
    derive = "PartialEq"
)]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ApiManagerSpec {
    #[serde(default = "default_app_label")]
    pub app_label: String,
    #[serde(default = "default_tenant_name")]
    pub tenant_name: String,
    pub wildcard_domain: String,
    #[serde(default = "default_true")]
    pub resource_requirements_enabled: bool,
    #[serde(default)]
    pub apicast: ApicastSpec,
    #[serde(default)]
    pub backend: BackendSpec,
    #[serde(default)]
    pub system: SystemSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_availability: Option<HighAvailabilitySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<MonitoringSpec>,
}

pub type ApiManager = APIManager;

impl ApiManager {
    /// External databases are used when high availability is enabled
    pub fn is_external_database_enabled(&self) -> bool {
        self.spec
            .high_availability
            .as_ref()
            .is_some_and(|ha| ha.enabled)
    }

    pub fn is_monitoring_enabled(&self) -> bool {
        self.spec.monitoring.as_ref().is_some_and(|m| m.enabled)
    }

    /// PostgreSQL when requested explicitly, MySQL otherwise
    pub fn system_database(&self) -> SystemDatabase {
        match self.spec.system.database.as_ref() {
            Some(db) if db.postgresql.is_some() => SystemDatabase::PostgreSql,
            _ => SystemDatabase::MySql,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemDatabase {
    MySql,
    PostgreSql,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApicastSpec {
    #[serde(default = "default_management_api")]
    pub apicast_management_api: String,
    #[serde(default)]
    pub open_ssl_verify: bool,
    #[serde(default = "default_true")]
    pub include_response_codes: bool,
    #[serde(default)]
    pub staging_spec: ReplicasSpec,
    #[serde(default)]
    pub production_spec: ReplicasSpec,
}

impl Default for ApicastSpec {
    fn default() -> Self {
        Self {
            apicast_management_api: default_management_api(),
            open_ssl_verify: false,
            include_response_codes: true,
            staging_spec: ReplicasSpec::default(),
            production_spec: ReplicasSpec::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackendSpec {
    #[serde(default)]
    pub listener_spec: ReplicasSpec,
    #[serde(default)]
    pub worker_spec: ReplicasSpec,
    #[serde(default)]
    pub cron_spec: ReplicasSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicasSpec {
    #[serde(default = "default_replicas")]
    pub replicas: i32,
}

impl Default for ReplicasSpec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<SystemDatabaseSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemDatabaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mysql: Option<DatabaseImageSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgresql: Option<DatabaseImageSpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseImageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighAvailabilitySpec {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSpec {
    #[serde(default)]
    pub enabled: bool,
}

fn default_app_label() -> String {
    "3scale-api".to_string()
}

fn default_tenant_name() -> String {
    "3scale".to_string()
}

fn default_management_api() -> String {
    "status".to_string()
}

fn default_replicas() -> i32 {
    1
}

fn default_true() -> bool {
    true
}
