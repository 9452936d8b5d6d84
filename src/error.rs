// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("I/O error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid document {0}")]
    InvalidDocument(String),

    #[error("Command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Required collaborator unavailable: {0}")]
    MissingCollaborator(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ManifestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::IoError {
            path: path.into(),
            source,
        }
    }

    /// Process exit code reported when this error ends a run
    pub fn exit_code(&self) -> u8 {
        match self {
            ManifestError::InvalidConfig(_) => 2,
            ManifestError::MissingCollaborator(_) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
