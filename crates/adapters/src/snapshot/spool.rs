// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot service backed by the task spool

use super::SnapshotService;
use crate::error::ServiceError;
use crate::spool::TaskSpool;
use async_trait::async_trait;
use naut_core::{Clock, Environment, IdGen, TaskId, TaskKind, TaskRef, TaskStatus};

/// Queues snapshot requests as spool records for an external worker
#[derive(Clone)]
pub struct SpoolSnapshotService<C: Clock, G: IdGen> {
    spool: TaskSpool<C, G>,
}

impl<C: Clock, G: IdGen> SpoolSnapshotService<C, G> {
    pub fn new(spool: TaskSpool<C, G>) -> Self {
        Self { spool }
    }
}

#[async_trait]
impl<C, G> SnapshotService for SpoolSnapshotService<C, G>
where
    C: Clock + 'static,
    G: IdGen + 'static,
{
    async fn begin_snapshot(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        if environment.current_build.is_none() {
            return Err(ServiceError::Rejected(format!(
                "environment {} has no current build to snapshot",
                environment.name
            )));
        }
        self.spool
            .enqueue(
                TaskKind::Snapshot,
                &environment.name,
                environment.current_build.as_ref(),
                initiator,
            )
            .await
    }

    async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        self.spool.status(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naut_core::{BuildName, FakeClock, SequentialIdGen};
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> SpoolSnapshotService<FakeClock, SequentialIdGen> {
        SpoolSnapshotService::new(TaskSpool::with_parts(
            dir.path(),
            FakeClock::new(),
            SequentialIdGen::new("snapshot"),
        ))
    }

    #[tokio::test]
    async fn queues_snapshot_of_current_build() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let env = Environment::new("uat").with_current_build(BuildName::new("mysite-abc"));

        let task = service.begin_snapshot(&env, "author").await.unwrap();
        assert_eq!(task.kind, TaskKind::Snapshot);
        assert_eq!(task.owner, "author");
        assert_eq!(service.status(&task.id).await.unwrap(), TaskStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_environment_without_build() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let err = service
            .begin_snapshot(&Environment::new("uat"), "author")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
    }
}
