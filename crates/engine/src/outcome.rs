// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// The single transition an `advance()` call made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Step was already Finished or Failed; nothing changed
    Terminal,
    /// A stage's task was started
    Started { stage: String },
    /// The active stage's task is still pending or running
    InProgress { stage: String },
    /// The last stage finished, or every remaining stage was skipped
    Finished,
    /// The active stage's task reported failure
    Failed { stage: String },
    /// The active stage ran longer than the configured maximum
    TimedOut { stage: String },
}

impl Outcome {
    /// Whether the step is terminal after this outcome
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Outcome::Terminal | Outcome::Finished | Outcome::Failed { .. } | Outcome::TimedOut { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Terminal => write!(f, "terminal"),
            Outcome::Started { stage } => write!(f, "started {}", stage),
            Outcome::InProgress { stage } => write!(f, "{} in progress", stage),
            Outcome::Finished => write!(f, "finished"),
            Outcome::Failed { stage } => write!(f, "{} failed", stage),
            Outcome::TimedOut { stage } => write!(f, "{} timed out", stage),
        }
    }
}
