// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use manifest_orchestrator::cli::Cli;
use manifest_orchestrator::config::Config;
use manifest_orchestrator::error::ManifestError;
use manifest_orchestrator::kubernetes;
use manifest_orchestrator::orchestration::{AssumeYes, Confirmation, Orchestrator, Prompt, RunOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(RunOutcome::Completed(_)) | Ok(RunOutcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<ManifestError>()
                .map_or(1, ManifestError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let config = Config::from_env(cli)?;
    info!(
        "Configuration loaded: root={}, action={}, backend={:?}",
        config.root.display(),
        config.action,
        config.backend
    );

    let cluster = kubernetes::connect(&config).await?;

    let confirmation: Box<dyn Confirmation> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(Prompt::stdio())
    };

    let outcome = Orchestrator::new(&config, cluster.as_ref(), confirmation.as_ref())
        .run()
        .await?;
    Ok(outcome)
}
