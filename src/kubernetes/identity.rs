// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Human readable object identities for log lines

use kube::Resource;

/// Render `Kind namespace/name`, falling back gracefully on missing metadata
pub fn object_info<K>(obj: &K) -> String
where
    K: Resource<DynamicType = ()>,
{
    let kind = K::kind(&());
    let kind = if kind.is_empty() { "<unknown kind>" } else { kind.as_ref() };
    let meta = obj.meta();
    let name = meta
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(meta.generate_name.as_deref().filter(|n| !n.is_empty()))
        .unwrap_or("<unnamed>");

    match meta.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        Some(namespace) => format!("{} {}/{}", kind, namespace, name),
        None => format!("{} {}", kind, name),
    }
}
