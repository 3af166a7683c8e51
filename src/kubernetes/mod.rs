// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for API discovery, object and secret storage, and ownership.

pub mod crd;
pub mod identity;
pub mod ownership;
pub mod secrets;
pub mod store;

pub use crd::wait_for_openshift_apis;
pub use identity::object_info;
pub use secrets::{KubeSecretStore, SecretStore};
pub use store::{KubeObjectStore, ObjectStore};
