// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage definitions and the ordered stage table
//!
//! The driver only sees stages through the [`Stage`] trait, so appending a
//! stage to a [`StageTable`] extends a pipeline without touching the driver.

use async_trait::async_trait;
use naut_adapters::{DeployService, ServiceError, Services, SnapshotService};
use naut_core::{PipelineContext, TaskRef, TaskStatus};

/// One named unit of work within a pipeline step
#[async_trait]
pub trait Stage<S: Services>: Send + Sync {
    fn name(&self) -> &str;

    /// Why this stage should be bypassed, or `None` to run it
    fn skip_reason(&self, ctx: &PipelineContext) -> Option<String>;

    /// Log line written once the task is started, after the `<step>:<stage>` prefix
    fn start_message(&self) -> String;

    /// Begin the stage's external task
    async fn start(&self, ctx: &PipelineContext, services: &S) -> Result<TaskRef, ServiceError>;

    /// Current status of a task this stage started
    async fn status(&self, task: &TaskRef, services: &S) -> Result<TaskStatus, ServiceError>;

    /// The task this stage has started in `ctx`, if any.
    ///
    /// Defaults to the context's per-stage slot keyed by stage name.
    fn task<'a>(&self, ctx: &'a PipelineContext) -> Option<&'a TaskRef> {
        ctx.stage_tasks.get(self.name())
    }

    /// Store a task in the stage's context slot, replacing any earlier copy
    fn record(&self, ctx: &mut PipelineContext, task: TaskRef) {
        ctx.stage_tasks.insert(self.name().to_string(), task);
    }
}

/// Snapshots the environment's database before anything is deployed
pub struct SnapshotStage;

impl SnapshotStage {
    pub const NAME: &'static str = "Snapshot";
}

#[async_trait]
impl<S: Services> Stage<S> for SnapshotStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn skip_reason(&self, ctx: &PipelineContext) -> Option<String> {
        if ctx.environment.current_build_identifier().is_none() {
            Some("No current build, skipping snapshot".to_string())
        } else if ctx.skip_snapshot {
            Some("Snapshot skipped by user request".to_string())
        } else {
            None
        }
    }

    fn start_message(&self) -> String {
        "creating snapshot of database".to_string()
    }

    async fn start(&self, ctx: &PipelineContext, services: &S) -> Result<TaskRef, ServiceError> {
        services
            .snapshots()
            .begin_snapshot(&ctx.environment, &ctx.initiator)
            .await
    }

    async fn status(&self, task: &TaskRef, services: &S) -> Result<TaskStatus, ServiceError> {
        services.snapshots().status(&task.id).await
    }

    fn task<'a>(&self, ctx: &'a PipelineContext) -> Option<&'a TaskRef> {
        ctx.previous_snapshot.as_ref()
    }

    fn record(&self, ctx: &mut PipelineContext, task: TaskRef) {
        ctx.previous_snapshot = Some(task);
    }
}

/// Deploys the environment's pending build
pub struct DeploymentStage;

impl DeploymentStage {
    pub const NAME: &'static str = "Deployment";
}

#[async_trait]
impl<S: Services> Stage<S> for DeploymentStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn skip_reason(&self, _ctx: &PipelineContext) -> Option<String> {
        None
    }

    fn start_message(&self) -> String {
        "starting deployment".to_string()
    }

    async fn start(&self, ctx: &PipelineContext, services: &S) -> Result<TaskRef, ServiceError> {
        services
            .deployments()
            .begin_deployment(&ctx.environment, &ctx.initiator)
            .await
    }

    async fn status(&self, task: &TaskRef, services: &S) -> Result<TaskStatus, ServiceError> {
        services.deployments().status(&task.id).await
    }

    fn task<'a>(&self, ctx: &'a PipelineContext) -> Option<&'a TaskRef> {
        ctx.current_deployment.as_ref()
    }

    fn record(&self, ctx: &mut PipelineContext, task: TaskRef) {
        ctx.current_deployment = Some(task);
    }
}

/// Ordered stages of a pipeline. The last stage finishes the step.
pub struct StageTable<S: Services> {
    stages: Vec<Box<dyn Stage<S>>>,
}

impl<S: Services> Default for StageTable<S> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: Services> StageTable<S> {
    /// Snapshot then Deployment
    pub fn standard() -> Self {
        Self::empty()
            .with_stage(SnapshotStage)
            .with_stage(DeploymentStage)
    }

    pub fn empty() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage after the current last stage
    pub fn with_stage(mut self, stage: impl Stage<S> + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl Stage<S> + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn get(&self, index: usize) -> Option<&dyn Stage<S>> {
        self.stages.get(index).map(|s| s.as_ref())
    }

    /// Index of the stage called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name() == name)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.stages.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
