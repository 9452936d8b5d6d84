// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line surface. Unset flags fall back to environment variables in `Config`.

use crate::config::Backend;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "manifest-orchestrator", version)]
#[command(about = "Apply or remove groups of Kubernetes manifests, namespace first")]
pub struct Cli {
    /// Root directory; each immediate subdirectory is a workload group [env: MANIFEST_ROOT]
    pub root: Option<PathBuf>,

    /// Apply every group (default) [env: MANIFEST_ACTION=apply]
    #[arg(long, conflicts_with = "delete")]
    pub apply: bool,

    /// Delete every group, namespace last [env: MANIFEST_ACTION=delete]
    #[arg(short = 'd', long, visible_alias = "remove")]
    pub delete: bool,

    /// Skip the confirmation prompt on delete [env: MANIFEST_ASSUME_YES]
    #[arg(short = 'y', long = "yes")]
    pub assume_yes: bool,

    /// Cluster backend [env: MANIFEST_BACKEND]
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Path to the kubectl binary [env: KUBECTL]
    #[arg(long)]
    pub kubectl: Option<PathBuf>,

    /// Kubeconfig context to use [env: KUBE_CONTEXT]
    #[arg(long)]
    pub context: Option<String>,
}
