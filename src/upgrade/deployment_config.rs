// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Image change trigger drift on DeploymentConfigs

use crate::error::{OperatorError, Result};
use crate::kubernetes::identity::object_info;
use crate::types::DeploymentConfig;
use tracing::info;

/// Position of the one ImageChange trigger with parameters
pub fn find_image_change_trigger(dc: &DeploymentConfig) -> Result<usize> {
    let mut found = dc
        .spec
        .triggers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_image_change())
        .map(|(i, _)| i);

    let position = match (found.next(), found.next()) {
        (Some(position), None) => position,
        (None, _) => {
            return Err(OperatorError::MalformedTemplate(format!(
                "no ImageChange trigger found in {}",
                object_info(dc)
            )))
        }
        (Some(_), Some(_)) => {
            return Err(OperatorError::MalformedTemplate(format!(
                "more than one ImageChange trigger found in {}",
                object_info(dc)
            )))
        }
    };

    if dc.spec.triggers[position].image_change_params.is_none() {
        return Err(OperatorError::MalformedTemplate(format!(
            "ImageChange trigger without imageChangeParams in {}",
            object_info(dc)
        )));
    }
    Ok(position)
}

/// Point the existing ImageChange trigger at the desired ImageStreamTag
pub fn ensure_image_change_trigger(
    desired: &DeploymentConfig,
    existing: &mut DeploymentConfig,
) -> Result<bool> {
    let desired_position = find_image_change_trigger(desired)?;
    let existing_position = find_image_change_trigger(existing)?;
    let info = object_info(existing);

    let desired_from = desired.spec.triggers[desired_position]
        .image_change_params
        .as_ref()
        .map(|p| &p.from);
    let existing_params = existing.spec.triggers[existing_position]
        .image_change_params
        .as_mut();

    let (Some(desired_from), Some(existing_params)) = (desired_from, existing_params) else {
        return Err(OperatorError::MalformedTemplate(format!(
            "ImageChange trigger without imageChangeParams in {}",
            info
        )));
    };

    if existing_params.from.name == desired_from.name {
        return Ok(false);
    }

    info!(
        "{} ImageStream tag name in imageChangeParams trigger changed: '{}' -> '{}'",
        info,
        existing_params.from.name.as_deref().unwrap_or_default(),
        desired_from.name.as_deref().unwrap_or_default()
    );
    existing_params.from.name = desired_from.name.clone();
    Ok(true)
}
