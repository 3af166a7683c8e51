// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The ApiManager custom resource and the OpenShift/Prometheus resources it manages.

pub mod apimanager;
pub mod deployment_config;
pub mod image_stream;
pub mod service_monitor;

pub use apimanager::{ApiManager, ApiManagerSpec, SystemDatabase};
pub use deployment_config::{DeploymentConfig, DeploymentConfigSpec, DeploymentTriggerPolicy};
pub use image_stream::{ImageStream, ImageStreamSpec, TagReference};
pub use service_monitor::{ServiceMonitor, ServiceMonitorSpec};
