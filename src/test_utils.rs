// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mock Kubernetes API service and in-memory stores.

use crate::error::{OperatorError, Result};
use crate::kubernetes::secrets::SecretStore;
use crate::kubernetes::store::{ManagedResource, ObjectStore};
use crate::types::{ApiManager, ImageStream, ImageStreamSpec, TagReference};
use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::client::Body;
use kube::{api::ObjectMeta, Client, ResourceExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use tracing_subscriber::fmt::MakeWriter;

/// A request seen by the [`MockService`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();
        responses
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<
            dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>>
                + Send,
        >,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);
        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = req
                .into_body()
                .collect()
                .await
                .map_err(Into::<tower::BoxError>::into)?
                .to_bytes();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path: path.clone(),
                query,
                body: body.to_vec(),
            });

            // Unmatched requests get a 404
            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("object", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a mock Secret JSON response holding `fields`
pub fn secret_json(name: &str, fields: &[(&str, &str)]) -> String {
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("3scale".to_string()),
            uid: Some(format!("{}-uid", name)),
            ..Default::default()
        },
        data: Some(
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), ByteString(v.as_bytes().to_vec())))
                .collect(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    };
    serde_json::to_string(&secret).unwrap()
}

/// Create a mock ImageStream JSON response with one tag
pub fn image_stream_json(name: &str, tag: &str) -> String {
    let stream = ImageStream {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("3scale".to_string()),
            resource_version: Some("7".to_string()),
            ..Default::default()
        },
        spec: ImageStreamSpec {
            tags: vec![TagReference::docker_image(
                tag,
                &format!("quay.io/3scale/{}:{}", name, tag),
            )],
            ..Default::default()
        },
    };
    serde_json::to_string(&stream).unwrap()
}

/// An ApiManager in namespace "3scale" with a uid, as the API server would return it
pub fn apimanager(tenant: &str, wildcard_domain: &str) -> ApiManager {
    let mut apimanager = ApiManager::new(
        "example",
        serde_json::from_value(serde_json::json!({
            "tenantName": tenant,
            "wildcardDomain": wildcard_domain,
        }))
        .unwrap(),
    );
    apimanager.metadata.namespace = Some("3scale".to_string());
    apimanager.metadata.uid = Some("6d0e1c44-8f5e-4a8c-9d61-1b2a3c4d5e6f".to_string());
    apimanager
}

/// A call made against the [`InMemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: &'static str,
    pub kind: String,
    pub name: String,
}

/// Object store keeping serialized objects in memory and recording every call
pub struct InMemoryObjectStore {
    namespace: String,
    objects: Mutex<BTreeMap<(String, String), serde_json::Value>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<Vec<(&'static str, String)>>,
    resource_version: AtomicU64,
}

impl InMemoryObjectStore {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            objects: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            resource_version: AtomicU64::new(1),
        }
    }

    /// Seed an object without recording a call
    pub fn insert<K: ManagedResource>(&self, mut obj: K) {
        self.stamp(&mut obj);
        let key = (K::kind(&()).to_string(), obj.name_any());
        let value = serde_json::to_value(&obj).unwrap();
        self.objects.lock().unwrap().insert(key, value);
    }

    /// Peek at a stored object without recording a call
    pub fn object<K: ManagedResource>(&self, name: &str) -> Option<K> {
        self.objects
            .lock()
            .unwrap()
            .get(&(K::kind(&()).to_string(), name.to_string()))
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    /// Make every `op` ("get", "create", "update", "list") on `kind` fail
    pub fn fail_on(&self, op: &'static str, kind: &str) {
        self.failures.lock().unwrap().push((op, kind.to_string()));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for_kind(&self, kind: &str) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }

    /// Number of creates and updates
    pub fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.op == "create" || c.op == "update")
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn stamp<K: ManagedResource>(&self, obj: &mut K) {
        let version = self.resource_version.fetch_add(1, Ordering::SeqCst);
        let meta = obj.meta_mut();
        meta.resource_version = Some(version.to_string());
        if meta.namespace.is_none() {
            meta.namespace = Some(self.namespace.clone());
        }
    }

    fn record<K: ManagedResource>(&self, op: &'static str, name: &str) -> Result<()> {
        let kind = K::kind(&()).to_string();
        self.calls.lock().unwrap().push(StoreCall {
            op,
            kind: kind.clone(),
            name: name.to_string(),
        });
        let failing = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .any(|(o, k)| *o == op && *k == kind);
        if failing {
            return Err(OperatorError::StorageUnavailable(format!(
                "injected {} failure for {} {}",
                op, kind, name
            )));
        }
        Ok(())
    }
}

fn matches_selector(value: &serde_json::Value, selector: &str) -> bool {
    selector
        .split(',')
        .filter(|s| !s.is_empty())
        .all(|requirement| match requirement.split_once('=') {
            Some((key, expected)) => value["metadata"]["labels"][key] == expected,
            None => false,
        })
}

impl ObjectStore for InMemoryObjectStore {
    async fn get<K: ManagedResource>(&self, name: &str) -> Result<Option<K>> {
        self.record::<K>("get", name)?;
        let stored = self
            .objects
            .lock()
            .unwrap()
            .get(&(K::kind(&()).to_string(), name.to_string()))
            .cloned();
        match stored {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn create<K: ManagedResource>(&self, obj: &K) -> Result<K> {
        let name = obj.name_any();
        self.record::<K>("create", &name)?;
        let key = (K::kind(&()).to_string(), name.clone());
        if self.objects.lock().unwrap().contains_key(&key) {
            return Err(OperatorError::StorageUnavailable(format!(
                "{} {} already exists",
                key.0, name
            )));
        }
        let mut created = obj.clone();
        self.stamp(&mut created);
        self.objects
            .lock()
            .unwrap()
            .insert(key, serde_json::to_value(&created)?);
        Ok(created)
    }

    async fn update<K: ManagedResource>(&self, obj: &K) -> Result<K> {
        let name = obj.name_any();
        self.record::<K>("update", &name)?;
        let key = (K::kind(&()).to_string(), name.clone());
        if !self.objects.lock().unwrap().contains_key(&key) {
            return Err(OperatorError::StorageUnavailable(format!(
                "{} {} not found",
                key.0, name
            )));
        }
        let mut updated = obj.clone();
        self.stamp(&mut updated);
        self.objects
            .lock()
            .unwrap()
            .insert(key, serde_json::to_value(&updated)?);
        Ok(updated)
    }

    async fn list<K: ManagedResource>(&self, label_selector: &str) -> Result<Vec<K>> {
        self.record::<K>("list", label_selector)?;
        let kind = K::kind(&()).to_string();
        let values: Vec<serde_json::Value> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((k, _), v)| *k == kind && matches_selector(v, label_selector))
            .map(|(_, v)| v.clone())
            .collect();
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(OperatorError::from))
            .collect()
    }
}

/// Secret store keeping fields in memory
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a field without counting it as a write
    pub fn with_field(self, secret: &str, field: &str, value: &str) -> Self {
        self.secrets
            .lock()
            .unwrap()
            .entry(secret.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        self
    }

    pub fn field(&self, secret: &str, field: &str) -> Option<String> {
        self.secrets
            .lock()
            .unwrap()
            .get(secret)
            .and_then(|s| s.get(field))
            .cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self, secret: &str) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OperatorError::StorageUnavailable(format!(
                "secret store unreachable while accessing {}",
                secret
            )));
        }
        Ok(())
    }
}

impl SecretStore for InMemorySecretStore {
    async fn read_field(&self, secret: &str, field: &str) -> Result<Option<String>> {
        self.check_available(secret)?;
        Ok(self.field(secret, field))
    }

    async fn write_field(&self, secret: &str, field: &str, value: &str) -> Result<()> {
        self.check_available(secret)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .lock()
            .unwrap()
            .entry(secret.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }
}

/// Captures formatted log output so tests can assert on it
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled_stream(name: &str, component: &str) -> ImageStream {
        ImageStream {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(BTreeMap::from([
                    ("app".to_string(), "3scale-api".to_string()),
                    ("threescale_component".to_string(), component.to_string()),
                ])),
                ..Default::default()
            },
            spec: ImageStreamSpec::default(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_list_filters_by_every_label() {
        let store = InMemoryObjectStore::new("3scale");
        store.insert(labelled_stream("amp-apicast", "apicast"));
        store.insert(labelled_stream("amp-backend", "backend"));
        store.insert(labelled_stream("backend-redis", "backend"));

        let backend: Vec<ImageStream> = store
            .list("app=3scale-api,threescale_component=backend")
            .await
            .unwrap();
        let mut names: Vec<String> = backend.iter().map(|s| s.name_any()).collect();
        names.sort();
        assert_eq!(names, vec!["amp-backend", "backend-redis"]);

        let all: Vec<ImageStream> = store.list("app=3scale-api").await.unwrap();
        assert_eq!(all.len(), 3);
        let none: Vec<ImageStream> = store.list("app=other").await.unwrap();
        assert!(none.is_empty());
        assert_eq!(store.calls_for_kind("ImageStream"), 3);
        assert_eq!(store.writes(), 0);
    }
}
