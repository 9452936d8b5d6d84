// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Bounded, fixed-interval polling of a cluster predicate

use crate::constants::poll::{INTERVAL_SECS, MAX_ATTEMPTS};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// How often and how long to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Longest time spent sleeping before giving up
    pub fn total_wait(&self) -> Duration {
        self.interval
            .checked_mul(self.max_attempts.saturating_sub(1))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, Duration::from_secs(INTERVAL_SECS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The predicate matched on check number `checks`
    Reached { checks: u32 },
    /// Every check was spent without a match
    TimedOut { checks: u32 },
}

impl Convergence {
    pub fn is_reached(&self) -> bool {
        matches!(self, Convergence::Reached { .. })
    }
}

/// Check `probe` until it returns `target` or the policy runs out.
/// Sleeps between checks only, never after the last one.
pub async fn wait_until<F, Fut>(policy: &RetryPolicy, target: bool, mut probe: F) -> Convergence
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 1..=policy.max_attempts {
        if probe().await == target {
            return Convergence::Reached { checks: attempt };
        }
        if attempt < policy.max_attempts {
            debug!(
                "Check {}/{} did not match, waiting {:?}",
                attempt, policy.max_attempts, policy.interval
            );
            sleep(policy.interval).await;
        }
    }

    Convergence::TimedOut {
        checks: policy.max_attempts,
    }
}
