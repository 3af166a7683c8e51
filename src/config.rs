// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Namespace to watch for ApiManager resources, all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Delay before the next tick when a tick reported requeue
    pub requeue_after: Duration,
    /// Periodic resync once everything has converged
    pub resync_interval: Duration,
    /// Delay before retrying a tick that failed with a retryable error
    pub error_requeue: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        Ok(Config {
            watch_namespace,
            requeue_after: secs(&lookup, "REQUEUE_AFTER_SECS", 5)?,
            resync_interval: secs(&lookup, "RESYNC_INTERVAL_SECS", 300)?,
            error_requeue: secs(&lookup, "ERROR_REQUEUE_SECS", 60)?,
        })
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{} must be a number of seconds, got '{}'", key, value)),
        None => Ok(Duration::from_secs(default)),
    }
}
