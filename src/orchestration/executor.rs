// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Applying or deleting the documents of one workload group.
//!
//! Apply runs the namespace document first and waits for the namespace to
//! appear. Delete runs the namespace document last, falling back to a delete
//! by name and then a detached delete, and waits for the namespace to go.
//! No failure stops the group; each one is logged and counted.

use crate::config::ActionKind;
use crate::kubernetes::ClusterClient;
use crate::manifests::{ResourceDocument, WorkloadGroup};
use crate::orchestration::poller::{wait_until, Convergence, RetryPolicy};
use tracing::{debug, info, instrument, warn};

/// What happened to one workload group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupReport {
    pub name: String,
    /// At least one namespace or resource document was found
    pub had_documents: bool,
    /// Failed cluster calls, each already logged
    pub failures: usize,
}

pub struct ActionExecutor<'a> {
    cluster: &'a dyn ClusterClient,
    retry: RetryPolicy,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(cluster: &'a dyn ClusterClient, retry: RetryPolicy) -> Self {
        Self { cluster, retry }
    }

    #[instrument(skip_all, fields(group = %group.name()))]
    pub async fn execute(&self, group: &WorkloadGroup, action: ActionKind) -> GroupReport {
        let mut report = GroupReport {
            name: group.name(),
            had_documents: group.has_documents(),
            failures: 0,
        };

        if !report.had_documents {
            info!("No documents in {}, skipping", group.path.display());
            return report;
        }

        info!(
            "Running {} on {} ({} documents{})",
            action,
            group.name(),
            group.resource_documents.len(),
            if group.namespace_document.is_some() {
                " + namespace"
            } else {
                ""
            }
        );

        match action {
            ActionKind::Apply => self.apply_group(group, &mut report).await,
            ActionKind::Delete => self.delete_group(group, &mut report).await,
        }

        report
    }

    async fn apply_group(&self, group: &WorkloadGroup, report: &mut GroupReport) {
        if let Some(namespace_document) = &group.namespace_document {
            info!("Applying namespace {}", namespace_document.file_name());
            match self.cluster.apply(namespace_document).await {
                Ok(()) => match &group.namespace_name {
                    Some(name) => {
                        self.wait_for_namespace(name, true).await;
                    }
                    None => warn!(
                        "No name found in {}, not waiting for the namespace",
                        namespace_document.path.display()
                    ),
                },
                Err(e) => {
                    report.failures += 1;
                    warn!(
                        "Failed to apply namespace {}: {}",
                        namespace_document.path.display(),
                        e
                    );
                }
            }
        }

        for document in &group.resource_documents {
            info!("Applying {}", document.file_name());
            if let Err(e) = self.cluster.apply(document).await {
                report.failures += 1;
                warn!("Failed to apply {}: {}", document.path.display(), e);
            }
        }
    }

    async fn delete_group(&self, group: &WorkloadGroup, report: &mut GroupReport) {
        for document in &group.resource_documents {
            info!("Deleting {}", document.file_name());
            if let Err(e) = self.cluster.delete(document).await {
                report.failures += 1;
                warn!("Failed to delete {}: {}", document.path.display(), e);
            }
        }

        if let Some(namespace_document) = &group.namespace_document {
            self.delete_namespace(namespace_document, group.namespace_name.as_deref(), report)
                .await;
        }
    }

    /// Delete by document, then by name, then detached; finally wait for it to disappear
    async fn delete_namespace(
        &self,
        document: &ResourceDocument,
        name: Option<&str>,
        report: &mut GroupReport,
    ) {
        info!("Deleting namespace {}", document.file_name());
        let by_document = self.cluster.delete(document).await;
        if let Err(e) = &by_document {
            report.failures += 1;
            warn!(
                "Failed to delete namespace {}: {}",
                document.path.display(),
                e
            );
        }

        let Some(name) = name else {
            warn!(
                "No name found in {}, skipping namespace fallback and wait",
                document.path.display()
            );
            return;
        };

        if by_document.is_err() {
            if self.cluster.namespace_exists(name).await {
                info!("Deleting namespace {} by name", name);
                if let Err(e) = self.cluster.delete_namespace(name).await {
                    report.failures += 1;
                    warn!("Failed to delete namespace {} by name: {}", name, e);
                    self.cluster.delete_namespace_detached(name).await;
                    warn!("Requested background delete of namespace {}", name);
                }
            } else {
                debug!("Namespace {} is already gone", name);
            }
        }

        self.wait_for_namespace(name, false).await;
    }

    async fn wait_for_namespace(&self, name: &str, present: bool) -> Convergence {
        let goal = if present { "exist" } else { "be removed" };
        info!("Waiting for namespace {} to {}", name, goal);

        let cluster = self.cluster;
        let outcome = wait_until(&self.retry, present, || cluster.namespace_exists(name)).await;
        match outcome {
            Convergence::Reached { checks } => {
                debug!("Namespace {} reached state after {} checks", name, checks)
            }
            Convergence::TimedOut { .. } => warn!(
                "Namespace {} did not {} within {:?}, continuing",
                name,
                goal,
                self.retry.total_wait()
            ),
        }
        outcome
    }
}
