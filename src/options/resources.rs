// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed CPU/memory policies applied when resource requirements are enabled

use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

fn quantities(cpu: &str, memory: &str) -> BTreeMap<String, Quantity> {
    BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ])
}

fn requirements(limits: (&str, &str), requests: (&str, &str)) -> ResourceRequirements {
    ResourceRequirements {
        limits: Some(quantities(limits.0, limits.1)),
        requests: Some(quantities(requests.0, requests.1)),
        ..Default::default()
    }
}

/// No requests or limits, the scheduler decides
pub fn unspecified() -> ResourceRequirements {
    ResourceRequirements::default()
}

pub fn backend_listener() -> ResourceRequirements {
    requirements(("1", "700Mi"), ("500m", "550Mi"))
}

pub fn backend_worker() -> ResourceRequirements {
    requirements(("1", "300Mi"), ("150m", "50Mi"))
}

pub fn backend_cron() -> ResourceRequirements {
    requirements(("150m", "150Mi"), ("50m", "40Mi"))
}

pub fn apicast_production() -> ResourceRequirements {
    requirements(("1", "128Mi"), ("500m", "64Mi"))
}

pub fn apicast_staging() -> ResourceRequirements {
    requirements(("100m", "128Mi"), ("50m", "64Mi"))
}
