// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::cli::Cli;
use crate::constants::{env as vars, DEFAULT_KUBECTL};
use crate::error::{ManifestError, Result};
use crate::orchestration::RetryPolicy;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// What a run does to every workload group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Apply,
    Delete,
}

impl FromStr for ActionKind {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(ActionKind::Apply),
            "delete" | "remove" => Ok(ActionKind::Delete),
            other => Err(ManifestError::InvalidConfig(format!(
                "unknown action '{}', expected apply or delete",
                other
            ))),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Apply => f.write_str("apply"),
            ActionKind::Delete => f.write_str("delete"),
        }
    }
}

/// Which cluster collaborator carries out the calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Shell out to the kubectl binary
    #[default]
    Kubectl,
    /// Talk to the API server directly
    Api,
}

impl FromStr for Backend {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kubectl" => Ok(Backend::Kubectl),
            "api" => Ok(Backend::Api),
            other => Err(ManifestError::InvalidConfig(format!(
                "unknown backend '{}', expected kubectl or api",
                other
            ))),
        }
    }
}

/// Run configuration, built once from CLI flags and environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose immediate subdirectories are workload groups
    pub root: PathBuf,
    pub action: ActionKind,
    /// Skip the confirmation prompt on delete
    pub assume_yes: bool,
    pub backend: Backend,
    pub kubectl: PathBuf,
    pub context: Option<String>,
    pub retry: RetryPolicy,
}

impl Config {
    /// Resolve configuration from parsed flags, falling back to the process environment
    pub fn from_env(cli: Cli) -> Result<Self> {
        Self::resolve(cli, |key| env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup. Flags win over variables.
    pub fn resolve(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let action = if cli.delete {
            ActionKind::Delete
        } else if cli.apply {
            ActionKind::Apply
        } else {
            match lookup(vars::ACTION) {
                Some(value) if !value.trim().is_empty() => value.parse()?,
                _ => ActionKind::Apply,
            }
        };

        let assume_yes = cli.assume_yes
            || match lookup(vars::ASSUME_YES) {
                Some(value) => parse_bool(vars::ASSUME_YES, &value)?,
                None => false,
            };

        let root = cli
            .root
            .or_else(|| lookup(vars::ROOT).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        if !root.is_dir() {
            return Err(ManifestError::InvalidConfig(format!(
                "root path {} is not a directory",
                root.display()
            )));
        }

        let backend = match cli.backend {
            Some(backend) => backend,
            None => match lookup(vars::BACKEND) {
                Some(value) if !value.trim().is_empty() => value.parse()?,
                _ => Backend::default(),
            },
        };

        let kubectl = cli
            .kubectl
            .or_else(|| lookup(vars::KUBECTL).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KUBECTL));

        let context = cli
            .context
            .or_else(|| lookup(vars::CONTEXT).filter(|v| !v.is_empty()));

        let mut retry = RetryPolicy::default();
        if let Some(value) = lookup(vars::POLL_ATTEMPTS) {
            retry.max_attempts = parse_number(vars::POLL_ATTEMPTS, &value)?;
            if retry.max_attempts == 0 {
                return Err(ManifestError::InvalidConfig(format!(
                    "{} must be at least 1",
                    vars::POLL_ATTEMPTS
                )));
            }
        }
        if let Some(value) = lookup(vars::POLL_INTERVAL_SECS) {
            retry.interval = Duration::from_secs(parse_number(vars::POLL_INTERVAL_SECS, &value)?);
        }

        Ok(Config {
            root,
            action,
            assume_yes,
            backend,
            kubectl,
            context,
            retry,
        })
    }

    /// Whether the confirmation gate guards this run
    pub fn needs_confirmation(&self) -> bool {
        self.action == ActionKind::Delete && !self.assume_yes
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "" | "0" | "false" | "no" | "n" => Ok(false),
        other => Err(ManifestError::InvalidConfig(format!(
            "{} has invalid boolean value '{}'",
            key, other
        ))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ManifestError::InvalidConfig(format!("{} has invalid numeric value '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn cli_with_root(root: &std::path::Path) -> Cli {
        Cli {
            root: Some(root.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(cli_with_root(dir.path()), lookup_from(&[])).unwrap();

        assert_eq!(config.action, ActionKind::Apply);
        assert!(!config.assume_yes);
        assert_eq!(config.backend, Backend::Kubectl);
        assert_eq!(config.kubectl, PathBuf::from("kubectl"));
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(!config.needs_confirmation());
    }

    #[test]
    fn test_env_overrides_apply_when_flags_absent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let config = Config::resolve(
            Cli::default(),
            lookup_from(&[
                (vars::ACTION, "Delete"),
                (vars::ASSUME_YES, "true"),
                (vars::ROOT, &root),
                (vars::BACKEND, "api"),
                (vars::CONTEXT, "lab"),
                (vars::POLL_ATTEMPTS, "2"),
                (vars::POLL_INTERVAL_SECS, "1"),
            ]),
        )
        .unwrap();

        assert_eq!(config.action, ActionKind::Delete);
        assert!(config.assume_yes);
        assert_eq!(config.root, dir.path());
        assert_eq!(config.backend, Backend::Api);
        assert_eq!(config.context.as_deref(), Some("lab"));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.interval, Duration::from_secs(1));
    }

    #[test]
    fn test_flags_win_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            apply: true,
            backend: Some(Backend::Kubectl),
            ..cli_with_root(dir.path())
        };
        let config = Config::resolve(
            cli,
            lookup_from(&[(vars::ACTION, "delete"), (vars::BACKEND, "api"), (vars::ROOT, "/nope")]),
        )
        .unwrap();

        assert_eq!(config.action, ActionKind::Apply);
        assert_eq!(config.backend, Backend::Kubectl);
        assert_eq!(config.root, dir.path());
    }

    #[test]
    fn test_delete_without_yes_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            delete: true,
            ..cli_with_root(dir.path())
        };
        let config = Config::resolve(cli, lookup_from(&[(vars::ASSUME_YES, "no")])).unwrap();
        assert!(config.needs_confirmation());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        for pairs in [
            [(vars::ACTION, "destroy")],
            [(vars::ASSUME_YES, "maybe")],
            [(vars::BACKEND, "helm")],
            [(vars::POLL_ATTEMPTS, "0")],
            [(vars::POLL_ATTEMPTS, "4294967297")],
            [(vars::POLL_INTERVAL_SECS, "-5")],
            [(vars::POLL_INTERVAL_SECS, "soon")],
        ] {
            let err = Config::resolve(cli_with_root(dir.path()), lookup_from(&pairs)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?}", pairs);
        }
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_with_root(&dir.path().join("absent"));
        let err = Config::resolve(cli, lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ManifestError::InvalidConfig(_)));
    }
}
