// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Locating resource documents inside workload group directories

use crate::constants::layout::{DOCUMENT_EXTENSIONS, NAMESPACE_FILES};
use crate::error::{ManifestError, Result};
use crate::manifests::names::extract_name;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A manifest file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDocument {
    pub path: PathBuf,
}

impl ResourceDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File name for log lines
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| ManifestError::io(&self.path, e))
    }
}

/// One immediate subdirectory of the root and the documents it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadGroup {
    pub path: PathBuf,
    pub namespace_document: Option<ResourceDocument>,
    /// Name read from the namespace document, if one could be found
    pub namespace_name: Option<String>,
    pub resource_documents: Vec<ResourceDocument>,
}

impl WorkloadGroup {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn has_documents(&self) -> bool {
        self.namespace_document.is_some() || !self.resource_documents.is_empty()
    }
}

/// List the workload groups under `root`, in name order. Unreadable groups are skipped.
pub fn discover_groups(root: &Path) -> Result<Vec<WorkloadGroup>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| ManifestError::io(root, e))? {
        let entry = entry.map_err(|e| ManifestError::io(root, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    let mut groups = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match locate_documents(&dir) {
            Ok(group) => groups.push(group),
            Err(e) => warn!("Skipping unreadable group {}: {}", dir.display(), e),
        }
    }
    Ok(groups)
}

/// Classify the documents of one group directory
pub fn locate_documents(dir: &Path) -> Result<WorkloadGroup> {
    let namespace_document = NAMESPACE_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .map(ResourceDocument::new);

    let mut resource_documents = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ManifestError::io(dir, e))? {
        let path = entry.map_err(|e| ManifestError::io(dir, e))?.path();
        if !path.is_file() || !has_document_extension(&path) {
            continue;
        }
        if namespace_document.as_ref().is_some_and(|ns| ns.path == path) {
            continue;
        }
        resource_documents.push(ResourceDocument::new(path));
    }
    resource_documents.sort_by(|a, b| a.path.cmp(&b.path));

    let namespace_name = match &namespace_document {
        Some(doc) => match doc.read() {
            Ok(content) => extract_name(&content),
            Err(e) => {
                warn!("Could not read {}: {}", doc.path.display(), e);
                None
            }
        },
        None => None,
    };

    debug!(
        "Group {}: namespace={:?}, {} resource documents",
        dir.display(),
        namespace_name,
        resource_documents.len()
    );

    Ok(WorkloadGroup {
        path: dir.to_path_buf(),
        namespace_document,
        namespace_name,
        resource_documents,
    })
}

fn has_document_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
}
