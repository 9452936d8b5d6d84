// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client talking to the API server directly, using server-side apply

use crate::constants::FIELD_MANAGER;
use crate::error::{ManifestError, Result};
use crate::kubernetes::ClusterClient;
use crate::manifests::ResourceDocument;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{DeleteParams, DynamicObject, Patch, PatchParams},
    config::KubeConfigOptions,
    core::GroupVersionKind,
    discovery::{pinned_kind, Scope},
    Api, Client, Config as KConfig, ResourceExt,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the kubeconfig (optionally a named context) or in-cluster config
    pub async fn connect(context: Option<&str>) -> Result<Self> {
        let config = match context {
            Some(context) => {
                let options = KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..Default::default()
                };
                KConfig::from_kubeconfig(&options).await.map_err(|e| {
                    ManifestError::MissingCollaborator(format!(
                        "Failed to load kubeconfig context {}: {}",
                        context, e
                    ))
                })?
            }
            None => KConfig::infer().await.map_err(|e| {
                ManifestError::MissingCollaborator(format!("Failed to infer config: {}", e))
            })?,
        };

        let client = Client::try_from(config).map_err(|e| {
            ManifestError::MissingCollaborator(format!("Failed to create client: {}", e))
        })?;
        Ok(Self::new(client))
    }

    fn namespaces(&self) -> Api<Namespace> {
        Api::all(self.client.clone())
    }

    /// Resolve the API endpoint and name of one object read from a document
    async fn api_for(&self, object: &DynamicObject) -> Result<(Api<DynamicObject>, String)> {
        let types = object
            .types
            .as_ref()
            .ok_or_else(|| ManifestError::InvalidDocument("missing apiVersion/kind".into()))?;
        let gvk = GroupVersionKind::try_from(types)
            .map_err(|e| ManifestError::InvalidDocument(format!("bad apiVersion: {}", e)))?;
        let name = object.metadata.name.clone().ok_or_else(|| {
            ManifestError::InvalidDocument(format!("{} without metadata.name", gvk.kind))
        })?;

        let (resource, capabilities) = pinned_kind(&self.client, &gvk).await?;
        let api = match capabilities.scope {
            Scope::Cluster => Api::all_with(self.client.clone(), &resource),
            Scope::Namespaced => match object.namespace() {
                Some(ns) => Api::namespaced_with(self.client.clone(), &ns, &resource),
                None => Api::default_namespaced_with(self.client.clone(), &resource),
            },
        };
        Ok((api, name))
    }

    /// Run `op` on every object in the document; the first failure is returned after all ran
    async fn for_each_object<F, Fut>(&self, document: &ResourceDocument, op: F) -> Result<()>
    where
        F: Fn(Api<DynamicObject>, String, DynamicObject) -> Fut,
        Fut: std::future::Future<Output = Result<()>> + Send,
    {
        let objects = parse_documents(&document.read()?)?;
        if objects.is_empty() {
            return Err(ManifestError::InvalidDocument(format!(
                "{} contains no objects",
                document.path.display()
            )));
        }

        let mut first_error = None;
        for object in objects {
            let outcome = match self.api_for(&object).await {
                Ok((api, name)) => op(api, name, object).await,
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Split a YAML or JSON file into objects, skipping empty documents
fn parse_documents(content: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        objects.push(serde_yaml::from_value(value)?);
    }
    Ok(objects)
}

#[async_trait]
impl ClusterClient for ApiClient {
    async fn preflight(&self) -> Result<()> {
        let version = self.client.apiserver_version().await.map_err(|e| {
            ManifestError::MissingCollaborator(format!("API server unreachable: {}", e))
        })?;
        debug!("Connected to API server {}", version.git_version);
        Ok(())
    }

    #[instrument(skip(self, document), fields(document = %document.path.display()))]
    async fn apply(&self, document: &ResourceDocument) -> Result<()> {
        self.for_each_object(document, |api, name, object| async move {
            let pp = PatchParams::apply(FIELD_MANAGER).force();
            api.patch(&name, &pp, &Patch::Apply(&object)).await?;
            info!("{} {} configured", object.types.map(|t| t.kind).unwrap_or_default(), name);
            Ok::<_, ManifestError>(())
        })
        .await
    }

    #[instrument(skip(self, document), fields(document = %document.path.display()))]
    async fn delete(&self, document: &ResourceDocument) -> Result<()> {
        self.for_each_object(document, |api, name, object| async move {
            api.delete(&name, &DeleteParams::default()).await?;
            info!("{} {} deleted", object.types.map(|t| t.kind).unwrap_or_default(), name);
            Ok::<_, ManifestError>(())
        })
        .await
    }

    async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.namespaces()
            .delete(name, &DeleteParams::default())
            .await?;
        Ok(())
    }

    async fn namespace_exists(&self, name: &str) -> bool {
        match self.namespaces().get_opt(name).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!("Namespace lookup for {} failed: {}", name, e);
                false
            }
        }
    }

    async fn delete_namespace_detached(&self, name: &str) {
        // background propagation returns once the API server accepted the request
        if let Err(e) = self
            .namespaces()
            .delete(name, &DeleteParams::background())
            .await
        {
            debug!("Background delete of namespace {} not accepted: {}", name, e);
        }
    }
}
