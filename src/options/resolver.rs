// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Secret-backed option values.
//!
//! A value found in its secret always wins. When it is missing the default is
//! persisted on first resolution, so later ticks keep returning the same value
//! even if the default itself changes in a newer operator release.

use crate::error::Result;
use crate::kubernetes::secrets::SecretStore;
use tracing::{debug, info, instrument};

/// Where a single option value is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretRef {
    pub secret: &'static str,
    pub field: &'static str,
}

impl SecretRef {
    pub const fn new(secret: &'static str, field: &'static str) -> Self {
        Self { secret, field }
    }
}

pub struct SecretSource<'a, S> {
    store: &'a S,
}

impl<'a, S: SecretStore> SecretSource<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The stored value of `reference`, never writing
    pub async fn stored(&self, reference: SecretRef) -> Result<Option<String>> {
        self.store
            .read_field(reference.secret, reference.field)
            .await
    }

    /// The stored value of `reference`, writing `default` first when it is absent
    #[instrument(skip(self, default), fields(secret = reference.secret, field = reference.field))]
    pub async fn resolve(&self, reference: SecretRef, default: &str) -> Result<String> {
        if let Some(value) = self.stored(reference).await? {
            debug!("Using stored value");
            return Ok(value);
        }

        info!(
            "Field '{}' missing in Secret '{}', persisting default",
            reference.field, reference.secret
        );
        self.store
            .write_field(reference.secret, reference.field, default)
            .await?;
        Ok(default.to_string())
    }
}
