// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// File layout of a manifest root
pub mod layout {
    /// Extensions (without dot) recognized as resource documents
    pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];
    /// Namespace document file names, in lookup priority order
    pub const NAMESPACE_FILES: [&str; 2] = ["namespace.yaml", "namespace.yml"];
}

/// Environment variables that override unset CLI flags
pub mod env {
    pub const ACTION: &str = "MANIFEST_ACTION";
    pub const ASSUME_YES: &str = "MANIFEST_ASSUME_YES";
    pub const ROOT: &str = "MANIFEST_ROOT";
    pub const BACKEND: &str = "MANIFEST_BACKEND";
    pub const KUBECTL: &str = "KUBECTL";
    pub const CONTEXT: &str = "KUBE_CONTEXT";
    pub const POLL_ATTEMPTS: &str = "MANIFEST_POLL_ATTEMPTS";
    pub const POLL_INTERVAL_SECS: &str = "MANIFEST_POLL_INTERVAL_SECS";
}

/// Convergence polling schedule
pub mod poll {
    /// Number of predicate checks before giving up
    pub const MAX_ATTEMPTS: u32 = 6;
    /// Seconds between two checks
    pub const INTERVAL_SECS: u64 = 5;
}

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "manifest-orchestrator";

/// Default kubectl binary, resolved through PATH
pub const DEFAULT_KUBECTL: &str = "kubectl";
