// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use crate::kubernetes::identity::object_info;
use crate::kubernetes::ownership::with_owner;
use crate::kubernetes::store::{ManagedResource, ObjectStore};
use kube::{Resource, ResourceExt};
use tracing::{debug, info};

/// What [`converge`] did to the stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Created,
    Updated,
    Unchanged,
}

impl Convergence {
    pub fn changed(self) -> bool {
        self != Convergence::Unchanged
    }
}

/// Bring the stored object named like `desired` in line with it.
///
/// A missing object is created from `desired`, owned by `owner`. An existing
/// one is handed to `ensure` together with `desired`; `ensure` mutates the
/// existing object in place and returns whether it did, in which case the
/// object is written back.
pub async fn converge<K, O, S, F>(
    objects: &S,
    owner: &O,
    desired: K,
    ensure: F,
) -> Result<Convergence>
where
    K: ManagedResource,
    O: Resource<DynamicType = ()> + Sync,
    S: ObjectStore,
    F: FnOnce(&K, &mut K) -> Result<bool> + Send,
{
    let name = desired.name_any();
    match objects.get::<K>(&name).await? {
        None => {
            let mut desired = desired;
            let meta = std::mem::take(desired.meta_mut());
            *desired.meta_mut() = with_owner(meta, owner);
            if desired.meta().namespace.is_none() {
                desired.meta_mut().namespace = owner.namespace();
            }
            info!("Create object {}", object_info(&desired));
            objects.create(&desired).await?;
            Ok(Convergence::Created)
        }
        Some(mut existing) => {
            if ensure(&desired, &mut existing)? {
                info!("Update object {}", object_info(&existing));
                objects.update(&existing).await?;
                Ok(Convergence::Updated)
            } else {
                debug!("Object {} is up to date", object_info(&existing));
                Ok(Convergence::Unchanged)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apimanager, InMemoryObjectStore};
    use crate::types::{ImageStream, ImageStreamSpec, TagReference};
    use kube::api::ObjectMeta;

    fn stream(tag: &str) -> ImageStream {
        ImageStream {
            metadata: ObjectMeta {
                name: Some("amp-apicast".to_string()),
                ..Default::default()
            },
            spec: ImageStreamSpec {
                tags: vec![TagReference::docker_image(tag, "quay.io/3scale/apicast")],
                ..Default::default()
            },
        }
    }

    fn replace_tags(desired: &ImageStream, existing: &mut ImageStream) -> Result<bool> {
        if desired.spec.tags == existing.spec.tags {
            return Ok(false);
        }
        existing.spec.tags = desired.spec.tags.clone();
        Ok(true)
    }

    #[tokio::test]
    async fn test_missing_object_is_created_with_owner() {
        let objects = InMemoryObjectStore::new("3scale");
        let owner = apimanager("acme", "example.com");

        let result = converge(&objects, &owner, stream("2.7"), replace_tags).await.unwrap();

        assert_eq!(result, Convergence::Created);
        let created: ImageStream = objects.object("amp-apicast").unwrap();
        let references = created.owner_references();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].kind, "APIManager");
        assert_eq!(references[0].controller, Some(true));
        assert_eq!(created.namespace().as_deref(), Some("3scale"));
    }

    #[tokio::test]
    async fn test_equal_object_is_not_written() {
        let objects = InMemoryObjectStore::new("3scale");
        objects.insert(stream("2.7"));
        let owner = apimanager("acme", "example.com");

        let result = converge(&objects, &owner, stream("2.7"), replace_tags).await.unwrap();

        assert_eq!(result, Convergence::Unchanged);
        assert!(!result.changed());
        assert_eq!(objects.writes(), 0);
    }

    #[tokio::test]
    async fn test_drifted_object_is_updated_once() {
        let objects = InMemoryObjectStore::new("3scale");
        objects.insert(stream("2.6"));
        let owner = apimanager("acme", "example.com");

        let result = converge(&objects, &owner, stream("2.7"), replace_tags).await.unwrap();
        assert_eq!(result, Convergence::Updated);
        assert_eq!(objects.writes(), 1);

        let again = converge(&objects, &owner, stream("2.7"), replace_tags).await.unwrap();
        assert_eq!(again, Convergence::Unchanged);
        assert_eq!(objects.writes(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let objects = InMemoryObjectStore::new("3scale");
        objects.insert(stream("2.6"));
        objects.fail_on("update", "ImageStream");
        let owner = apimanager("acme", "example.com");

        let err = converge(&objects, &owner, stream("2.7"), replace_tags).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
