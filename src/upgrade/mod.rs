// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Staged convergence of an ApiManager's objects to the current release.
//!
//! Stages run in [`UpgradeStage::ORDER`]. A stage that changed something its
//! successors depend on reports [`StageResult::Requeue`] and the tick stops
//! there; the next tick starts again from the first stage.

pub mod converge;
pub mod deployment_config;
pub mod image_stream;
pub mod service_monitor;

use crate::components::{AmpImages, Apicast, Backend, DatabaseImages, RedisImages};
use crate::error::Result;
use crate::kubernetes::identity::object_info;
use crate::kubernetes::secrets::SecretStore;
use crate::kubernetes::store::ObjectStore;
use crate::options::{ApicastOptionsProvider, BackendOptionsProvider, ImagesOptionsProvider};
use crate::types::ApiManager;
use converge::converge;
use deployment_config::ensure_image_change_trigger;
use image_stream::ensure_image_stream_tags;
use service_monitor::ensure_service_monitor;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResult {
    Done,
    Requeue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStage {
    Images,
    DatabaseImages,
    DeploymentConfigs,
    ServiceMonitors,
}

impl UpgradeStage {
    pub const ORDER: [UpgradeStage; 4] = [
        UpgradeStage::Images,
        UpgradeStage::DatabaseImages,
        UpgradeStage::DeploymentConfigs,
        UpgradeStage::ServiceMonitors,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UpgradeStage::Images => "images",
            UpgradeStage::DatabaseImages => "dependentDatabaseImages",
            UpgradeStage::DeploymentConfigs => "deploymentObjects",
            UpgradeStage::ServiceMonitors => "serviceMonitors",
        }
    }
}

/// One upgrade tick for one ApiManager
pub struct UpgradeApiManager<'a, O, S> {
    cr: &'a ApiManager,
    objects: &'a O,
    secrets: &'a S,
}

impl<'a, O: ObjectStore, S: SecretStore> UpgradeApiManager<'a, O, S> {
    pub fn new(cr: &'a ApiManager, objects: &'a O, secrets: &'a S) -> Self {
        Self { cr, objects, secrets }
    }

    /// The stages that apply to this ApiManager, in execution order
    pub fn stages(&self) -> Vec<UpgradeStage> {
        UpgradeStage::ORDER
            .into_iter()
            .filter(|stage| match stage {
                UpgradeStage::DatabaseImages => !self.cr.is_external_database_enabled(),
                UpgradeStage::ServiceMonitors => self.cr.is_monitoring_enabled(),
                UpgradeStage::Images | UpgradeStage::DeploymentConfigs => true,
            })
            .collect()
    }

    #[instrument(skip(self), fields(apimanager = %object_info(self.cr)))]
    pub async fn upgrade(&self) -> Result<StageResult> {
        for stage in self.stages() {
            let result = self
                .run_stage(stage)
                .await
                .map_err(|e| e.in_stage(stage.name()))?;
            if result == StageResult::Requeue {
                info!("Stage '{}' made changes, requeueing", stage.name());
                return Ok(StageResult::Requeue);
            }
            debug!("Stage '{}' done", stage.name());
        }
        Ok(StageResult::Done)
    }

    async fn run_stage(&self, stage: UpgradeStage) -> Result<StageResult> {
        match stage {
            UpgradeStage::Images => self.upgrade_images().await,
            UpgradeStage::DatabaseImages => self.upgrade_database_images().await,
            UpgradeStage::DeploymentConfigs => self.upgrade_deployment_configs().await,
            UpgradeStage::ServiceMonitors => self.upgrade_service_monitors().await,
        }
    }

    /// Every AMP image stream is converged before deciding on a requeue
    async fn upgrade_images(&self) -> Result<StageResult> {
        let options = ImagesOptionsProvider::new(self.cr).get_images_options()?;
        let mut changed = false;
        for stream in AmpImages::new(options).image_streams() {
            changed |= converge(self.objects, self.cr, stream, ensure_image_stream_tags)
                .await?
                .changed();
        }
        Ok(if changed {
            StageResult::Requeue
        } else {
            StageResult::Done
        })
    }

    async fn upgrade_database_images(&self) -> Result<StageResult> {
        let options = ImagesOptionsProvider::new(self.cr).get_images_options()?;
        let redis = RedisImages::new(options.clone());
        let database = DatabaseImages::new(options, self.cr.system_database());

        for stream in [
            redis.backend_image_stream(),
            redis.system_image_stream(),
            database.image_stream(),
        ] {
            converge(self.objects, self.cr, stream, ensure_image_stream_tags).await?;
        }
        Ok(StageResult::Done)
    }

    /// Stops at the first DeploymentConfig that had to be created or updated
    async fn upgrade_deployment_configs(&self) -> Result<StageResult> {
        let apicast = Apicast::new(ApicastOptionsProvider::new(self.cr).get_apicast_options()?);
        let backend = Backend::new(
            BackendOptionsProvider::new(self.cr, self.secrets)
                .get_backend_options()
                .await?,
        );

        let mut desired = vec![
            apicast.staging_deployment_config(),
            apicast.production_deployment_config(),
        ];
        desired.extend(backend.deployment_configs());

        for dc in desired {
            if converge(self.objects, self.cr, dc, ensure_image_change_trigger)
                .await?
                .changed()
            {
                return Ok(StageResult::Requeue);
            }
        }
        Ok(StageResult::Done)
    }

    async fn upgrade_service_monitors(&self) -> Result<StageResult> {
        let apicast = Apicast::new(ApicastOptionsProvider::new(self.cr).get_apicast_options()?);
        converge(self.objects, self.cr, apicast.service_monitor(), ensure_service_monitor).await?;
        Ok(StageResult::Done)
    }
}
