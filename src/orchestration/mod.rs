// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Applying and removing workload groups against a cluster.

pub mod confirm;
pub mod executor;
pub mod orchestrator;
pub mod poller;

pub use confirm::{AssumeYes, Confirmation, Prompt};
pub use executor::{ActionExecutor, GroupReport};
pub use orchestrator::{Orchestrator, RunOutcome, RunSummary};
pub use poller::{wait_until, Convergence, RetryPolicy};
