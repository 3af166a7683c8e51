// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{component_labels, object_meta};
use crate::constants::images;
use crate::options::ImagesOptions;
use crate::types::{ImageStream, ImageStreamSpec, SystemDatabase, TagReference};

fn image_stream(options: &ImagesOptions, name: &str, component: &str, image: &str) -> ImageStream {
    ImageStream {
        metadata: object_meta(name, component_labels(&options.app_label, component, None)),
        spec: ImageStreamSpec {
            tags: vec![TagReference::docker_image(&options.image_tag, image)],
            ..Default::default()
        },
    }
}

/// ImageStreams of the platform's own components
pub struct AmpImages {
    options: ImagesOptions,
}

impl AmpImages {
    pub fn new(options: ImagesOptions) -> Self {
        Self { options }
    }

    /// In the order they are converged
    pub fn image_streams(&self) -> Vec<ImageStream> {
        vec![
            self.apicast_image_stream(),
            self.backend_image_stream(),
            self.system_image_stream(),
            self.zync_image_stream(),
        ]
    }

    pub fn apicast_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "amp-apicast", "apicast", images::APICAST)
    }

    pub fn backend_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "amp-backend", "backend", images::BACKEND)
    }

    pub fn system_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "amp-system", "system", images::SYSTEM)
    }

    pub fn zync_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "amp-zync", "zync", images::ZYNC)
    }
}

pub struct RedisImages {
    options: ImagesOptions,
}

impl RedisImages {
    pub fn new(options: ImagesOptions) -> Self {
        Self { options }
    }

    pub fn backend_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "backend-redis", "backend", images::BACKEND_REDIS)
    }

    pub fn system_image_stream(&self) -> ImageStream {
        image_stream(&self.options, "system-redis", "system", images::SYSTEM_REDIS)
    }
}

/// The system database image, MySQL or PostgreSQL
pub struct DatabaseImages {
    options: ImagesOptions,
    database: SystemDatabase,
}

impl DatabaseImages {
    pub fn new(options: ImagesOptions, database: SystemDatabase) -> Self {
        Self { options, database }
    }

    pub fn image_stream(&self) -> ImageStream {
        match self.database {
            SystemDatabase::MySql => {
                image_stream(&self.options, "system-mysql", "system", images::SYSTEM_MYSQL)
            }
            SystemDatabase::PostgreSql => image_stream(
                &self.options,
                "system-postgresql",
                "system",
                images::SYSTEM_POSTGRESQL,
            ),
        }
    }
}
