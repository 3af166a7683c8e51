// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use crate::kubernetes::identity::object_info;
use crate::types::service_monitor::Endpoint;
use crate::types::ServiceMonitor;
use tracing::info;

/// Converge the selector and endpoints, leaving other fields as found
pub fn ensure_service_monitor(
    desired: &ServiceMonitor,
    existing: &mut ServiceMonitor,
) -> Result<bool> {
    let mut changed = false;

    if existing.spec.selector != desired.spec.selector {
        info!("{} selector changed", object_info(existing));
        existing.spec.selector = desired.spec.selector.clone();
        changed = true;
    }

    let endpoints_match = existing.spec.endpoints.len() == desired.spec.endpoints.len()
        && existing
            .spec
            .endpoints
            .iter()
            .zip(&desired.spec.endpoints)
            .all(|(e, d)| e.same_target(d));
    if !endpoints_match {
        info!(
            "{} endpoints changed: {:?} -> {:?}",
            object_info(existing),
            existing.spec.endpoints,
            desired.spec.endpoints
        );
        let mut current = std::mem::take(&mut existing.spec.endpoints).into_iter();
        existing.spec.endpoints = desired
            .spec
            .endpoints
            .iter()
            .map(|wanted| Endpoint {
                extra: current.next().map(|e| e.extra).unwrap_or_default(),
                ..wanted.clone()
            })
            .collect();
        changed = true;
    }

    Ok(changed)
}
