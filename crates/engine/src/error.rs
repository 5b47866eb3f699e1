// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use naut_adapters::ServiceError;
use naut_storage::StorageError;
use thiserror::Error;

/// Errors from a single `advance()` call.
///
/// The step and context are left exactly as they were before the call.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// A snapshot or deployment service call did not go through
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("stage table is empty")]
    EmptyStageTable,
    #[error("step is at unknown stage: {0}")]
    UnknownStage(String),
}

impl AdvanceError {
    /// Whether calling `advance()` again later might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AdvanceError::Service(e) => e.is_transient(),
            AdvanceError::EmptyStageTable | AdvanceError::UnknownStage(_) => false,
        }
    }
}

/// Errors that stop a poll loop
#[derive(Debug, Error)]
pub enum PollError {
    #[error("advance error: {0}")]
    Advance(#[from] AdvanceError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
