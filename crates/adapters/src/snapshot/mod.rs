// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database snapshot services

mod spool;

pub use spool::SpoolSnapshotService;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSnapshotService;

use crate::error::ServiceError;
use async_trait::async_trait;
use naut_core::{Environment, TaskId, TaskRef, TaskStatus};

/// Service that snapshots an environment's database
#[async_trait]
pub trait SnapshotService: Clone + Send + Sync + 'static {
    /// Begin a snapshot of the environment's current database.
    ///
    /// Returns as soon as the work is queued; the task starts out Pending.
    async fn begin_snapshot(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError>;

    /// Current status of a snapshot started by this service
    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError>;
}
