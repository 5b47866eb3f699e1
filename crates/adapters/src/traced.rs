// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced service wrappers for consistent observability

use crate::deploy::DeployService;
use crate::error::ServiceError;
use crate::snapshot::SnapshotService;
use async_trait::async_trait;
use naut_core::{Environment, TaskId, TaskRef, TaskStatus};
use tracing::Instrument;

/// Wrapper that adds tracing to any SnapshotService
#[derive(Clone)]
pub struct TracedSnapshotService<S> {
    inner: S,
}

impl<S> TracedSnapshotService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SnapshotService> SnapshotService for TracedSnapshotService<S> {
    async fn begin_snapshot(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        let span = tracing::info_span!(
            "snapshot.begin",
            environment = %environment.name,
            initiator
        );

        async {
            tracing::info!(
                build = environment.current_build_identifier().unwrap_or("-"),
                "requesting snapshot"
            );

            let start = std::time::Instant::now();
            let result = self.inner.begin_snapshot(environment, initiator).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(task) => tracing::info!(
                    task_id = %task.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "snapshot queued"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "snapshot request failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        let result = self.inner.status(id).await;
        match &result {
            Ok(status) => tracing::debug!(task_id = %id, %status, "snapshot status"),
            Err(e) => tracing::warn!(task_id = %id, error = %e, "snapshot status failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any DeployService
#[derive(Clone)]
pub struct TracedDeployService<D> {
    inner: D,
}

impl<D> TracedDeployService<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

#[async_trait]
impl<D: DeployService> DeployService for TracedDeployService<D> {
    async fn begin_deployment(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        let span = tracing::info_span!(
            "deploy.begin",
            environment = %environment.name,
            initiator
        );

        async {
            // Precondition: something to deploy
            let Some(build) = environment.pending_build.as_ref() else {
                tracing::error!("no pending build");
                return Err(ServiceError::Rejected(format!(
                    "environment {} has no pending build to deploy",
                    environment.name
                )));
            };
            tracing::info!(build = %build, "requesting deployment");

            let start = std::time::Instant::now();
            let result = self.inner.begin_deployment(environment, initiator).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(task) => tracing::info!(
                    task_id = %task.id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "deployment queued"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "deployment request failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        let result = self.inner.status(id).await;
        match &result {
            Ok(status) => tracing::debug!(task_id = %id, %status, "deployment status"),
            Err(e) => tracing::warn!(task_id = %id, error = %e, "deployment status failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
