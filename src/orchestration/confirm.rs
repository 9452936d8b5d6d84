// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Interactive confirmation before destructive runs

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Asks whether a delete run may proceed
pub trait Confirmation: Send + Sync {
    fn confirm(&self, root: &Path) -> bool;
}

/// Non-interactive confirmation that always proceeds
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _root: &Path) -> bool {
        true
    }
}

/// Line-based prompt; only `y` or `yes` (any case) proceeds
pub struct Prompt<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R, W> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }
}

impl Prompt<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> Confirmation for Prompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, root: &Path) -> bool {
        let (Ok(mut input), Ok(mut output)) = (self.input.lock(), self.output.lock()) else {
            return false;
        };

        if let Err(e) = write!(
            output,
            "This deletes every resource under {}. Continue? [y/N] ",
            root.display()
        )
        .and_then(|_| output.flush())
        {
            warn!("Could not write confirmation prompt: {}", e);
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
