// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from snapshot and deployment services

use naut_core::TaskId;
use thiserror::Error;

/// Errors from service calls.
///
/// These never describe the outcome of a task; a task that ran and failed
/// reports `TaskStatus::Failed`. A `ServiceError` means the call itself did
/// not go through.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether the same call may succeed later. A missing, rejected or
    /// unreadable task stays that way.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_) | ServiceError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_outages_are_transient() {
        assert!(ServiceError::Unavailable("snapshot service down".into()).is_transient());
        assert!(ServiceError::Io(std::io::Error::other("disk busy")).is_transient());
        assert!(!ServiceError::TaskNotFound(TaskId::from("task-1")).is_transient());
        assert!(!ServiceError::Rejected("no pending build".into()).is_transient());

        let bad_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ServiceError::Json(bad_json).is_transient());
    }
}
