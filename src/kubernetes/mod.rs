// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster collaborators that carry out apply, delete and existence checks.

pub mod api;
pub mod kubectl;

pub use api::ApiClient;
pub use kubectl::KubectlClient;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::manifests::ResourceDocument;
use async_trait::async_trait;

/// Operations the orchestrator needs from a cluster
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Check the collaborator is usable before any group is touched
    async fn preflight(&self) -> Result<()>;

    async fn apply(&self, document: &ResourceDocument) -> Result<()>;

    async fn delete(&self, document: &ResourceDocument) -> Result<()>;

    async fn delete_namespace(&self, name: &str) -> Result<()>;

    async fn namespace_exists(&self, name: &str) -> bool;

    /// Start a namespace delete without waiting for it. The outcome is never reported.
    async fn delete_namespace_detached(&self, name: &str);
}

/// Build the collaborator selected by the configuration
pub async fn connect(config: &Config) -> Result<Box<dyn ClusterClient>> {
    match config.backend {
        Backend::Kubectl => Ok(Box::new(KubectlClient::new(
            config.kubectl.clone(),
            config.context.clone(),
        ))),
        Backend::Api => Ok(Box::new(ApiClient::connect(config.context.as_deref()).await?)),
    }
}
