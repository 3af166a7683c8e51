// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Apicast gateway options

use crate::constants::THREESCALE_RELEASE;
use crate::error::{Result, ValidationErrors};
use crate::options::resources;
use crate::types::ApiManager;
use k8s_openapi::api::core::v1::ResourceRequirements;

pub const MANAGEMENT_API_VALUES: [&str; 3] = ["disabled", "status", "debug"];

/// Fully resolved configuration of the staging and production gateways
#[derive(Debug, Clone, PartialEq)]
pub struct ApicastOptions {
    pub app_label: String,
    pub tenant_name: String,
    pub wildcard_domain: String,
    pub image_tag: String,
    pub management_api: String,
    pub openssl_verify: String,
    pub response_codes: String,
    pub staging_resource_requirements: ResourceRequirements,
    pub production_resource_requirements: ResourceRequirements,
    pub staging_replicas: i32,
    pub production_replicas: i32,
}

/// Collects Apicast settings; unset resource requirements get the fixed defaults.
#[derive(Debug, Clone, Default)]
pub struct ApicastOptionsBuilder {
    app_label: Option<String>,
    tenant_name: Option<String>,
    wildcard_domain: Option<String>,
    image_tag: Option<String>,
    management_api: Option<String>,
    openssl_verify: Option<String>,
    response_codes: Option<String>,
    staging_resource_requirements: Option<ResourceRequirements>,
    production_resource_requirements: Option<ResourceRequirements>,
    staging_replicas: Option<i32>,
    production_replicas: Option<i32>,
}

impl ApicastOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_label(mut self, value: impl Into<String>) -> Self {
        self.app_label = Some(value.into());
        self
    }

    pub fn tenant_name(mut self, value: impl Into<String>) -> Self {
        self.tenant_name = Some(value.into());
        self
    }

    pub fn wildcard_domain(mut self, value: impl Into<String>) -> Self {
        self.wildcard_domain = Some(value.into());
        self
    }

    pub fn image_tag(mut self, value: impl Into<String>) -> Self {
        self.image_tag = Some(value.into());
        self
    }

    pub fn management_api(mut self, value: impl Into<String>) -> Self {
        self.management_api = Some(value.into());
        self
    }

    pub fn openssl_verify(mut self, value: bool) -> Self {
        self.openssl_verify = Some(value.to_string());
        self
    }

    pub fn response_codes(mut self, value: bool) -> Self {
        self.response_codes = Some(value.to_string());
        self
    }

    pub fn staging_resource_requirements(mut self, value: ResourceRequirements) -> Self {
        self.staging_resource_requirements = Some(value);
        self
    }

    pub fn production_resource_requirements(mut self, value: ResourceRequirements) -> Self {
        self.production_resource_requirements = Some(value);
        self
    }

    pub fn staging_replicas(mut self, value: i32) -> Self {
        self.staging_replicas = Some(value);
        self
    }

    pub fn production_replicas(mut self, value: i32) -> Self {
        self.production_replicas = Some(value);
        self
    }

    pub fn build(self) -> Result<ApicastOptions> {
        let mut errors = ValidationErrors::new();
        let mut required = |field: &'static str, value: Option<String>| match value {
            Some(v) => {
                errors.require_non_empty(field, &v);
                v
            }
            None => {
                errors.push(field, "is required");
                String::new()
            }
        };

        let app_label = required("app_label", self.app_label);
        let tenant_name = required("tenant_name", self.tenant_name);
        let wildcard_domain = required("wildcard_domain", self.wildcard_domain);
        let image_tag = required("image_tag", self.image_tag);
        let management_api = required("management_api", self.management_api);
        let openssl_verify = required("openssl_verify", self.openssl_verify);
        let response_codes = required("response_codes", self.response_codes);

        if !management_api.is_empty() {
            errors.require_one_of("management_api", &management_api, &MANAGEMENT_API_VALUES);
        }

        let staging_replicas = self.staging_replicas.unwrap_or_else(|| {
            errors.push("staging_replicas", "is required");
            0
        });
        errors.require_non_negative("staging_replicas", staging_replicas);
        let production_replicas = self.production_replicas.unwrap_or_else(|| {
            errors.push("production_replicas", "is required");
            0
        });
        errors.require_non_negative("production_replicas", production_replicas);

        errors.into_result()?;

        Ok(ApicastOptions {
            app_label,
            tenant_name,
            wildcard_domain,
            image_tag,
            management_api,
            openssl_verify,
            response_codes,
            staging_resource_requirements: self
                .staging_resource_requirements
                .unwrap_or_else(resources::apicast_staging),
            production_resource_requirements: self
                .production_resource_requirements
                .unwrap_or_else(resources::apicast_production),
            staging_replicas,
            production_replicas,
        })
    }
}

/// Builds [`ApicastOptions`] from an ApiManager
pub struct ApicastOptionsProvider<'a> {
    apimanager: &'a ApiManager,
}

impl<'a> ApicastOptionsProvider<'a> {
    pub fn new(apimanager: &'a ApiManager) -> Self {
        Self { apimanager }
    }

    pub fn get_apicast_options(&self) -> Result<ApicastOptions> {
        let spec = &self.apimanager.spec;
        let mut builder = ApicastOptionsBuilder::new()
            .app_label(&spec.app_label)
            .tenant_name(&spec.tenant_name)
            .wildcard_domain(&spec.wildcard_domain)
            .image_tag(THREESCALE_RELEASE)
            .management_api(&spec.apicast.apicast_management_api)
            .openssl_verify(spec.apicast.open_ssl_verify)
            .response_codes(spec.apicast.include_response_codes)
            .staging_replicas(spec.apicast.staging_spec.replicas)
            .production_replicas(spec.apicast.production_spec.replicas);

        if !spec.resource_requirements_enabled {
            builder = builder
                .staging_resource_requirements(resources::unspecified())
                .production_resource_requirements(resources::unspecified());
        }

        builder.build()
    }
}
