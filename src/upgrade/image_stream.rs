// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use crate::kubernetes::identity::object_info;
use crate::types::{ImageStream, TagReference};
use tracing::info;

fn source(tag: &TagReference) -> &str {
    tag.source_name().unwrap_or("<none>")
}

/// Compares only the fields the operator sets on a tag
fn tag_matches(existing: &TagReference, desired: &TagReference) -> bool {
    existing.source_kind() == desired.source_kind()
        && existing.source_name() == desired.source_name()
        && existing.reference_policy_type() == desired.reference_policy_type()
        && existing.is_insecure() == desired.is_insecure()
}

/// Overwrite the owned fields, keeping whatever the server added to the tag
fn apply_tag(existing: &mut TagReference, desired: &TagReference) {
    existing.from = desired.from.clone();
    match (&mut existing.reference_policy, &desired.reference_policy) {
        (Some(current), Some(wanted)) => current.type_ = wanted.type_.clone(),
        (current, wanted) => *current = wanted.clone(),
    }
    let insecure = desired.is_insecure();
    match existing.import_policy.as_mut() {
        Some(policy) => policy.insecure = insecure,
        None if insecure => existing.import_policy = desired.import_policy.clone(),
        None => {}
    }
}

/// Add or correct every desired tag. Tags only present on the existing stream are kept.
pub fn ensure_image_stream_tags(
    desired: &ImageStream,
    existing: &mut ImageStream,
) -> Result<bool> {
    let info = object_info(existing);
    let mut changed = false;

    for tag in &desired.spec.tags {
        match existing.spec.tags.iter().position(|t| t.name == tag.name) {
            Some(i) if tag_matches(&existing.spec.tags[i], tag) => {}
            Some(i) => {
                info!(
                    "{} tag '{}' changed: '{}' -> '{}'",
                    info,
                    tag.name,
                    source(&existing.spec.tags[i]),
                    source(tag)
                );
                apply_tag(&mut existing.spec.tags[i], tag);
                changed = true;
            }
            None => {
                info!("{} tag '{}' added pointing at '{}'", info, tag.name, source(tag));
                existing.spec.tags.push(tag.clone());
                changed = true;
            }
        }
    }
    Ok(changed)
}
