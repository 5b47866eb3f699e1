// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake snapshot service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::SnapshotService;
use crate::board::{FakeTaskBoard, ServiceCall};
use crate::error::ServiceError;
use async_trait::async_trait;
use naut_core::{Environment, FakeClock, TaskId, TaskKind, TaskRef, TaskStatus};

/// Fake snapshot service with call recording and controllable task status
#[derive(Clone)]
pub struct FakeSnapshotService {
    board: FakeTaskBoard,
}

impl Default for FakeSnapshotService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSnapshotService {
    pub fn new() -> Self {
        Self::with_clock(FakeClock::new())
    }

    /// Stamp created tasks with times from `clock`
    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            board: FakeTaskBoard::new("snapshot", clock),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.board.calls()
    }

    pub fn clear_calls(&self) {
        self.board.clear_calls()
    }

    /// Number of snapshots requested so far
    pub fn begin_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::BeginSnapshot { .. }))
            .count()
    }

    pub fn task(&self, id: &TaskId) -> Option<TaskRef> {
        self.board.task(id)
    }

    pub fn tasks(&self) -> Vec<TaskRef> {
        self.board.tasks()
    }

    pub fn mark_in_progress(&self, id: &TaskId) -> bool {
        self.board.set_status(id, TaskStatus::InProgress)
    }

    pub fn mark_finished(&self, id: &TaskId) -> bool {
        self.board.set_status(id, TaskStatus::Finished)
    }

    pub fn mark_failed(&self, id: &TaskId) -> bool {
        self.board.set_status(id, TaskStatus::Failed)
    }

    /// Make every subsequent call fail with `ServiceError::Unavailable`
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        self.board.set_unavailable(Some(reason.into()))
    }

    pub fn set_available(&self) {
        self.board.set_unavailable(None)
    }
}

#[async_trait]
impl SnapshotService for FakeSnapshotService {
    async fn begin_snapshot(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        self.board.record(ServiceCall::BeginSnapshot {
            environment: environment.name.clone(),
            initiator: initiator.to_string(),
        })?;
        Ok(self.board.create(TaskKind::Snapshot, initiator))
    }

    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        self.board.record(ServiceCall::Status { id: id.clone() })?;
        self.board.status(id)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
