// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::THREESCALE_RELEASE;
use crate::error::{Result, ValidationErrors};
use crate::types::ApiManager;

/// Labels and tag shared by every generated ImageStream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagesOptions {
    pub app_label: String,
    pub image_tag: String,
}

impl ImagesOptions {
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();
        errors.require_non_empty("app_label", &self.app_label);
        errors.require_non_empty("image_tag", &self.image_tag);
        errors.into_result()
    }
}

pub struct ImagesOptionsProvider<'a> {
    apimanager: &'a ApiManager,
}

impl<'a> ImagesOptionsProvider<'a> {
    pub fn new(apimanager: &'a ApiManager) -> Self {
        Self { apimanager }
    }

    pub fn get_images_options(&self) -> Result<ImagesOptions> {
        let options = ImagesOptions {
            app_label: self.apimanager.spec.app_label.clone(),
            image_tag: THREESCALE_RELEASE.to_string(),
        };
        options.validate()?;
        Ok(options)
    }
}
