// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline step record
//!
//! A step is created once per deployment attempt and mutated only by the
//! engine's driver. Once Finished or Failed it never moves again; retrying
//! means creating a new step.

use crate::clock::Clock;
use crate::config::StepConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Unique identifier for a step
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub String);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        StepId(s)
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        StepId(s.to_string())
    }
}

/// Overall status of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    NotStarted,
    Started,
    Failed,
    Finished,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Failed | StepStatus::Finished)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::NotStarted => "NotStarted",
            StepStatus::Started => "Started",
            StepStatus::Failed => "Failed",
            StepStatus::Finished => "Finished",
        };
        write!(f, "{}", s)
    }
}

/// Why a step ended up Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The active stage ran past the configured maximum duration
    TimedOut,
    /// The service reported the active stage's task as failed
    TaskFailed,
}

/// One deployment attempt driven through the stage table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: StepId,
    /// Display name used as the log prefix, e.g. `DeployStep`
    pub name: String,
    pub status: StepStatus,
    /// Name of the stage being executed or awaited
    pub active_stage: Option<String>,
    pub config: StepConfig,
    /// When the active stage started; reset whenever a new stage starts
    pub started_at: Option<DateTime<Utc>>,
    pub failure: Option<FailureKind>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineStep {
    pub fn new(
        id: impl Into<StepId>,
        name: impl Into<String>,
        config: StepConfig,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: StepStatus::NotStarted,
            active_stage: None,
            config,
            started_at: None,
            failure: None,
            created_at: clock.now(),
            finished_at: None,
        }
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn active_stage_name(&self) -> Option<&str> {
        self.active_stage.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// True only when the step failed because a stage ran too long
    pub fn is_timed_out(&self) -> bool {
        self.status == StepStatus::Failed && self.failure == Some(FailureKind::TimedOut)
    }

    /// Time spent in the active stage so far.
    ///
    /// A clock that reads earlier than the start time yields zero.
    pub fn stage_elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let started = self.started_at?;
        Some((now - started).to_std().unwrap_or(Duration::ZERO))
    }

    /// Whether the active stage has run longer than the configured maximum
    pub fn stage_overdue(&self, now: DateTime<Utc>) -> bool {
        self.stage_elapsed(now)
            .is_some_and(|elapsed| elapsed > self.config.max_duration())
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
