// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment service backed by the task spool

use super::{pending_build, DeployService};
use crate::error::ServiceError;
use crate::spool::TaskSpool;
use async_trait::async_trait;
use naut_core::{Clock, Environment, IdGen, TaskId, TaskKind, TaskRef, TaskStatus};

/// Queues deployment requests as spool records for an external worker
#[derive(Clone)]
pub struct SpoolDeployService<C: Clock, G: IdGen> {
    spool: TaskSpool<C, G>,
}

impl<C: Clock, G: IdGen> SpoolDeployService<C, G> {
    pub fn new(spool: TaskSpool<C, G>) -> Self {
        Self { spool }
    }
}

#[async_trait]
impl<C, G> DeployService for SpoolDeployService<C, G>
where
    C: Clock + 'static,
    G: IdGen + 'static,
{
    async fn begin_deployment(
        &self,
        environment: &Environment,
        initiator: &str,
    ) -> Result<TaskRef, ServiceError> {
        let build = pending_build(environment)?;
        self.spool
            .enqueue(
                TaskKind::Deployment,
                &environment.name,
                Some(build),
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

    fn service(dir: &TempDir) -> SpoolDeployService<FakeClock, SequentialIdGen> {
        SpoolDeployService::new(TaskSpool::with_parts(
            dir.path(),
            FakeClock::new(),
            SequentialIdGen::new("deploy"),
        ))
    }

    #[tokio::test]
    async fn queues_deployment_of_pending_build() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let env = Environment::new("uat").with_pending_build(BuildName::new("mysite-def"));

        let task = service.begin_deployment(&env, "deployer").await.unwrap();
        assert_eq!(task.kind, TaskKind::Deployment);
        assert_eq!(task.owner, "deployer");
        assert_eq!(service.status(&task.id).await.unwrap(), TaskStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_environment_without_pending_build() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let err = service
            .begin_deployment(&Environment::new("uat"), "deployer")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
    }
}
