// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles: a recording cluster, a scripted confirmation and a mock API server.

use crate::error::{ManifestError, Result};
use crate::kubernetes::ClusterClient;
use crate::manifests::ResourceDocument;
use crate::orchestration::Confirmation;
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A call observed by [`FakeCluster`]; documents are identified by file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Apply(String),
    Delete(String),
    DeleteNamespace(String),
    NamespaceExists(String),
    DeleteNamespaceDetached(String),
}

/// In-memory cluster that records every call and fails on request
#[derive(Default)]
pub struct FakeCluster {
    calls: Mutex<Vec<Call>>,
    failing_documents: HashSet<String>,
    failing_namespaces: HashSet<String>,
    /// Answers for successive existence checks; `exists_default` once drained
    exists_answers: Mutex<VecDeque<bool>>,
    exists_default: bool,
    unavailable: bool,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply and delete of this file name fail
    pub fn failing_document(mut self, file_name: &str) -> Self {
        self.failing_documents.insert(file_name.to_string());
        self
    }

    /// Delete by name of this namespace fails
    pub fn failing_namespace(mut self, name: &str) -> Self {
        self.failing_namespaces.insert(name.to_string());
        self
    }

    pub fn exists_answers(self, answers: &[bool]) -> Self {
        self.exists_answers.lock().unwrap().extend(answers);
        self
    }

    pub fn exists_by_default(mut self, exists: bool) -> Self {
        self.exists_default = exists;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change cluster state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::NamespaceExists(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn document_call(&self, document: &ResourceDocument, call: fn(String) -> Call) -> Result<()> {
        let file_name = document.file_name();
        self.record(call(file_name.clone()));
        if self.failing_documents.contains(&file_name) {
            return Err(ManifestError::CommandFailed {
                command: format!("kubectl -f {}", file_name),
                status: "exit status: 1".into(),
                stderr: "simulated failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn preflight(&self) -> Result<()> {
        if self.unavailable {
            return Err(ManifestError::MissingCollaborator("kubectl".into()));
        }
        Ok(())
    }

    async fn apply(&self, document: &ResourceDocument) -> Result<()> {
        self.document_call(document, Call::Apply)
    }

    async fn delete(&self, document: &ResourceDocument) -> Result<()> {
        self.document_call(document, Call::Delete)
    }

    async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteNamespace(name.to_string()));
        if self.failing_namespaces.contains(name) {
            return Err(ManifestError::CommandFailed {
                command: format!("kubectl delete namespace {}", name),
                status: "exit status: 1".into(),
                stderr: "simulated failure".into(),
            });
        }
        Ok(())
    }

    async fn namespace_exists(&self, name: &str) -> bool {
        self.record(Call::NamespaceExists(name.to_string()));
        self.exists_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.exists_default)
    }

    async fn delete_namespace_detached(&self, name: &str) {
        self.record(Call::DeleteNamespaceDetached(name.to_string()));
    }
}

/// Confirmation that always gives the same answer and counts prompts
pub struct ScriptedConfirmation {
    answer: bool,
    asked: AtomicUsize,
}

impl ScriptedConfirmation {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, _root: &Path) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

/// Write `files` into `root/group`, creating the group directory
pub fn write_group(root: &Path, group: &str, files: &[(&str, &str)]) {
    let dir = root.join(group);
    std::fs::create_dir_all(&dir).unwrap();
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

/// A mock API server answering by exact (method, path) and recording requests
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Requests received so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client whose default namespace is `default`
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let key = (req.method().to_string(), req.uri().path().to_string());
        self.requests.lock().unwrap().push(key.clone());

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| (404, not_found_json(&key.1)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

pub fn not_found_json(path: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} not found", path),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Core `v1` discovery document listing namespaces and configmaps
pub fn api_resource_list_json() -> String {
    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "v1",
        "resources": [
            {
                "name": "namespaces",
                "singularName": "namespace",
                "namespaced": false,
                "kind": "Namespace",
                "verbs": ["create", "delete", "get", "list", "patch"]
            },
            {
                "name": "configmaps",
                "singularName": "configmap",
                "namespaced": true,
                "kind": "ConfigMap",
                "verbs": ["create", "delete", "get", "list", "patch"]
            }
        ]
    })
    .to_string()
}
