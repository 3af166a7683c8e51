// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fully resolved, validated configuration for each subcomponent.
//!
//! Options are rebuilt on every reconcile from the ApiManager spec, the
//! persisted secrets, and the defaults below. They are never cached.

pub mod apicast;
pub mod backend;
pub mod images;
pub mod resolver;
pub mod resources;

pub use apicast::{ApicastOptions, ApicastOptionsBuilder, ApicastOptionsProvider};
pub use backend::{BackendOptions, BackendOptionsProvider};
pub use images::{ImagesOptions, ImagesOptionsProvider};
pub use resolver::{SecretRef, SecretSource};
