// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment services

mod spool;

pub use spool::SpoolDeployService;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDeployService;

use crate::error::ServiceError;
use async_trait::async_trait;
use naut_core::{BuildName, Environment, TaskId, TaskRef, TaskStatus};

/// Service that deploys builds to environments
#[async_trait]
pub trait DeployService: Clone + Send + Sync + 'static {
    /// Begin deploying the environment's pending build.
    ///
    /// The returned task is owned by `initiator`.
    async fn begin_deployment(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError>;

    /// Current status of a deployment started by this service
    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError>;
}

/// The build a deployment request targets
pub(crate) fn pending_build(environment: &Environment) -> Result<&BuildName, ServiceError> {
    environment.pending_build.as_ref().ok_or_else(|| {
        ServiceError::Rejected(format!(
            "environment {} has no pending build to deploy",
            environment.name
        ))
    })
}
