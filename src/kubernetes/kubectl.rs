// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `kubectl` backed cluster client

use crate::error::{ManifestError, Result};
use crate::kubernetes::ClusterClient;
use crate::manifests::ResourceDocument;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

pub struct KubectlClient {
    binary: PathBuf,
    context: Option<String>,
}

impl KubectlClient {
    pub fn new(binary: impl Into<PathBuf>, context: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            context,
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args(args));
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Full argument list, with the context flag first when one is set
    fn args<I, S>(&self, args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut all = Vec::new();
        if let Some(context) = &self.context {
            all.push(OsString::from("--context"));
            all.push(OsString::from(context));
        }
        all.extend(args.into_iter().map(Into::into));
        all
    }

    fn describe(command: &Command) -> String {
        let std = command.as_std();
        let mut parts = vec![std.get_program().to_string_lossy().into_owned()];
        parts.extend(std.get_args().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Run to completion, failing on a non-zero exit status
    async fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut cmd = self.command(args);
        let command = Self::describe(&cmd);
        debug!("Running {}", command);

        let output = cmd
            .output()
            .await
            .map_err(|e| ManifestError::io(&self.binary, e))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
                debug!("{}", line);
            }
            Ok(())
        } else {
            Err(ManifestError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    async fn preflight(&self) -> Result<()> {
        let status = self
            .command(["version", "--client"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(_) => Ok(()),
            Err(e) => Err(ManifestError::MissingCollaborator(format!(
                "{} could not be started: {}",
                self.binary.display(),
                e
            ))),
        }
    }

    #[instrument(skip(self, document), fields(document = %document.path.display()))]
    async fn apply(&self, document: &ResourceDocument) -> Result<()> {
        self.run([OsString::from("apply"), "-f".into(), document.path.clone().into()])
            .await
    }

    #[instrument(skip(self, document), fields(document = %document.path.display()))]
    async fn delete(&self, document: &ResourceDocument) -> Result<()> {
        self.run([OsString::from("delete"), "-f".into(), document.path.clone().into()])
            .await
    }

    async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.run(["delete", "namespace", name]).await
    }

    async fn namespace_exists(&self, name: &str) -> bool {
        self.command(["get", "namespace", name])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    async fn delete_namespace_detached(&self, name: &str) {
        let spawned = self
            .command(["delete", "namespace", name, "--wait=false"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        // the child is dropped without being awaited
        if let Err(e) = spawned {
            warn!("Could not start background delete of namespace {}: {}", name, e);
        }
    }
}
