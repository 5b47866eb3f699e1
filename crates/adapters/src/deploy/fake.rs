// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake deployment service for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{pending_build, DeployService};
use crate::board::{FakeTaskBoard, ServiceCall};
use crate::error::ServiceError;
use async_trait::async_trait;
use naut_core::{Environment, FakeClock, TaskId, TaskKind, TaskRef, TaskStatus};

/// Fake deployment service with call recording and controllable task status
#[derive(Clone)]
pub struct FakeDeployService {
    board: FakeTaskBoard,
}

impl Default for FakeDeployService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDeployService {
    pub fn new() -> Self {
        Self::with_clock(FakeClock::new())
    }

    /// Stamp created tasks with times from `clock`
    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            board: FakeTaskBoard::new("deploy", clock),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.board.calls()
    }

    pub fn clear_calls(&self) {
        self.board.clear_calls()
    }

    /// Number of deployments requested so far
    pub fn begin_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServiceCall::BeginDeployment { .. }))
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
impl DeployService for FakeDeployService {
    async fn begin_deployment(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        let build = pending_build(environment)?;
        self.board.record(ServiceCall::BeginDeployment {
            environment: environment.name.clone(),
            build: build.full_name().to_string(),
            initiator: initiator.to_string(),
        })?;
        Ok(self.board.create(TaskKind::Deployment, initiator))
    }

    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        self.board.record(ServiceCall::Status { id: id.clone() })?;
        self.board.status(id)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
