// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drives one run over every workload group under the root.

use crate::config::Config;
use crate::error::Result;
use crate::kubernetes::ClusterClient;
use crate::manifests::discover_groups;
use crate::orchestration::confirm::Confirmation;
use crate::orchestration::executor::{ActionExecutor, GroupReport};
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::block_in_place;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups: Vec<GroupReport>,
}

impl RunSummary {
    /// Any group contributed at least one document
    pub fn found_any(&self) -> bool {
        self.groups.iter().any(|g| g.had_documents)
    }

    pub fn failures(&self) -> usize {
        self.groups.iter().map(|g| g.failures).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Declined at the confirmation prompt; nothing was touched
    Cancelled,
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    cluster: &'a dyn ClusterClient,
    confirmation: &'a dyn Confirmation,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        cluster: &'a dyn ClusterClient,
        confirmation: &'a dyn Confirmation,
    ) -> Self {
        Self {
            config,
            cluster,
            confirmation,
        }
    }

    /// Ask the confirmation gate, off the async worker when the runtime allows it
    fn confirm(&self) -> bool {
        let ask = || self.confirmation.confirm(&self.config.root);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                block_in_place(ask)
            }
            _ => ask(),
        }
    }

    /// Run the configured action over every group. Only a missing collaborator or
    /// an unreadable root is an error; per-document failures are logged and counted.
    #[instrument(skip(self), fields(root = %self.config.root.display(), action = %self.config.action))]
    pub async fn run(&self) -> Result<RunOutcome> {
        self.cluster.preflight().await?;

        let groups = discover_groups(&self.config.root)?;
        info!("Found {} workload groups", groups.len());

        if self.config.needs_confirmation() && !self.confirm() {
            info!("Cancelled, nothing was deleted");
            return Ok(RunOutcome::Cancelled);
        }

        let executor = ActionExecutor::new(self.cluster, self.config.retry);
        let mut summary = RunSummary::default();
        for group in &groups {
            summary
                .groups
                .push(executor.execute(group, self.config.action).await);
        }

        if !summary.found_any() {
            info!(
                "No documents found under {}",
                self.config.root.display()
            );
        } else if summary.failures() > 0 {
            warn!(
                "Finished {} with {} failed calls",
                self.config.action,
                summary.failures()
            );
        } else {
            info!("Finished {}", self.config.action);
        }

        Ok(RunOutcome::Completed(summary))
    }
}
