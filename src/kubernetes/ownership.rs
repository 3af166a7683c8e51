// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Owner references linking generated objects to their ApiManager

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{api::ObjectMeta, Resource};
use tracing::debug;

/// Controller owner reference pointing at `owner`, None when it has no uid yet
pub fn as_owner<K>(owner: &K) -> Option<OwnerReference>
where
    K: Resource<DynamicType = ()>,
{
    owner.controller_owner_ref(&()).map(|reference| OwnerReference {
        block_owner_deletion: Some(true),
        ..reference
    })
}

/// Append an owner reference to `meta`. Existing references are kept.
pub fn with_owner<K>(meta: ObjectMeta, owner: &K) -> ObjectMeta
where
    K: Resource<DynamicType = ()>,
{
    match as_owner(owner) {
        Some(reference) => with_owner_reference(meta, reference),
        None => {
            debug!("Owner has no uid, not adding an owner reference");
            meta
        }
    }
}

pub fn with_owner_reference(mut meta: ObjectMeta, reference: OwnerReference) -> ObjectMeta {
    let references = meta.owner_references.get_or_insert_with(Vec::new);
    if !references.iter().any(|r| r.uid == reference.uid) {
        references.push(reference);
    }
    meta
}
