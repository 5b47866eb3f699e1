// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task references
//!
//! A task reference is a handle to one externally-executed unit of work
//! (a database snapshot or a deployment). The service that created the
//! task owns its status; the pipeline only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// What kind of work a task performs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Snapshot,
    Deployment,
    /// Work started by a custom stage appended to the stage table
    Custom(String),
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Snapshot => write!(f, "snapshot"),
            TaskKind::Deployment => write!(f, "deployment"),
            TaskKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Status reported by the service executing a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Queued but not picked up yet
    Pending,
    /// Being worked on
    InProgress,
    /// Completed successfully
    Finished,
    /// Completed unsuccessfully
    Failed,
}

impl TaskStatus {
    /// Pending or in progress
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }

    /// Finished or failed
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Finished => "Finished",
            TaskStatus::Failed => "Failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown task status: {0} (expected pending, in-progress, finished or failed)")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "inprogress" | "running" => Ok(TaskStatus::InProgress),
            "finished" | "done" => Ok(TaskStatus::Finished),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

/// A handle to an externally-executed unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: TaskId,
    pub kind: TaskKind,
    /// Status as last reported by the owning service
    pub status: TaskStatus,
    /// Identity of whoever initiated the task; never changes
    pub owner: String,
    pub started_at: DateTime<Utc>,
}

impl TaskRef {
    /// Create a freshly queued task reference
    pub fn new(
        id: impl Into<TaskId>,
        kind: TaskKind,
        owner: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            status: TaskStatus::Pending,
            owner: owner.into(),
            started_at,
        }
    }

    /// Copy of this reference with a newer status
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
