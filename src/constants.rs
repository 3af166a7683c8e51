// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The operator name used as field manager
pub const OPERATOR_NAME: &str = "amp-operator";

/// Product release the operator installs and upgrades to
pub const THREESCALE_RELEASE: &str = "2.7";

/// Label keys set on generated objects
pub mod labels {
    pub const APP: &str = "app";
    pub const COMPONENT: &str = "threescale_component";
    pub const COMPONENT_ELEMENT: &str = "threescale_component_element";
    pub const DEPLOYMENT_CONFIG: &str = "deploymentConfig";
    pub const MONITORING_KEY: &str = "monitoring-key";
    pub const MONITORING_KEY_VALUE: &str = "middleware";
}

/// Secrets and keys holding backend configuration
pub mod backend_secrets {
    pub const INTERNAL_API: &str = "backend-internal-api";
    pub const INTERNAL_API_USERNAME: &str = "username";
    pub const INTERNAL_API_PASSWORD: &str = "password";

    pub const LISTENER: &str = "backend-listener";
    pub const LISTENER_SERVICE_ENDPOINT: &str = "service_endpoint";
    pub const LISTENER_ROUTE_ENDPOINT: &str = "route_endpoint";

    pub const REDIS: &str = "backend-redis";
    pub const REDIS_STORAGE_URL: &str = "REDIS_STORAGE_URL";
    pub const REDIS_QUEUES_URL: &str = "REDIS_QUEUES_URL";
    pub const REDIS_STORAGE_SENTINEL_HOSTS: &str = "REDIS_STORAGE_SENTINEL_HOSTS";
    pub const REDIS_STORAGE_SENTINEL_ROLE: &str = "REDIS_STORAGE_SENTINEL_ROLE";
    pub const REDIS_QUEUES_SENTINEL_HOSTS: &str = "REDIS_QUEUES_SENTINEL_HOSTS";
    pub const REDIS_QUEUES_SENTINEL_ROLE: &str = "REDIS_QUEUES_SENTINEL_ROLE";
}

/// Container images for the current release
pub mod images {
    pub const APICAST: &str = "quay.io/3scale/apicast:3scale-2.7.0";
    pub const BACKEND: &str = "quay.io/3scale/apisonator:3scale-2.7.0";
    pub const SYSTEM: &str = "quay.io/3scale/porta:3scale-2.7.0";
    pub const ZYNC: &str = "quay.io/3scale/zync:3scale-2.7.0";
    pub const BACKEND_REDIS: &str = "registry.redhat.io/rhscl/redis-32-rhel7:3.2";
    pub const SYSTEM_REDIS: &str = "registry.redhat.io/rhscl/redis-32-rhel7:3.2";
    pub const SYSTEM_MYSQL: &str = "registry.redhat.io/rhscl/mysql-57-rhel7:5.7";
    pub const SYSTEM_POSTGRESQL: &str = "registry.redhat.io/rhscl/postgresql-10-rhel7";
}

/// API discovery polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for the OpenShift APIs
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
