// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline step driver
//!
//! `advance()` makes at most one logical transition per call: start a
//! stage, report progress, detect a timeout, detect failure, or finish.
//! Work happens on copies of the step and context; they are written back
//! and the buffered log lines flushed only once every service call in the
//! transition has succeeded.

use crate::error::AdvanceError;
use crate::outcome::Outcome;
use crate::stage::{Stage, StageTable};
use chrono::{DateTime, Utc};
use naut_adapters::Services;
use naut_core::log::{checking_message, skipped_message, stage_message};
use naut_core::{Clock, FailureKind, LogSink, PipelineContext, PipelineStep, StepStatus, TaskStatus};
use tracing::Instrument;

const FINISHED_MESSAGE: &str = "Step finished successfully!";

/// Drives pipeline steps through a stage table
pub struct Driver<S: Services, C: Clock, L: LogSink> {
    services: S,
    clock: C,
    log: L,
    stages: StageTable<S>,
}

/// Pending changes for one `advance()` call
struct Transition {
    step: PipelineStep,
    ctx: PipelineContext,
    lines: Vec<String>,
    now: DateTime<Utc>,
}

impl Transition {
    fn log(&mut self, line: String) {
        self.lines.push(line);
    }

    fn finish(&mut self) -> Outcome {
        self.step.status = StepStatus::Finished;
        self.step.finished_at = Some(self.now);
        self.log(FINISHED_MESSAGE.to_string());
        Outcome::Finished
    }

    fn fail(&mut self, kind: FailureKind) {
        self.step.status = StepStatus::Failed;
        self.step.failure = Some(kind);
        self.step.finished_at = Some(self.now);
    }
}

impl<S: Services, C: Clock, L: LogSink> Driver<S, C, L> {
    /// Driver over the standard Snapshot, Deployment table
    pub fn new(services: S, clock: C, log: L) -> Self {
        Self {
            services,
            clock,
            log,
            stages: StageTable::standard(),
        }
    }

    /// Replace the stage table
    pub fn with_stages(self, stages: StageTable<S>) -> Self {
        Self { stages, ..self }
    }

    pub fn stages(&self) -> &StageTable<S> {
        &self.stages
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Advance the step by one transition.
    ///
    /// Terminal steps are left alone. On error, `step` and `ctx` are
    /// unchanged and nothing is written to the log sink.
    pub async fn advance(
        &self,
        step: &mut PipelineStep,
        ctx: &mut PipelineContext,
    ) -> Result<Outcome, AdvanceError> {
        if step.is_terminal() {
            tracing::debug!(step = %step.id, status = %step.status, "step is terminal");
            return Ok(Outcome::Terminal);
        }

        let span = tracing::info_span!(
            "step.advance",
            step = %step.id,
            stage = step.active_stage_name().unwrap_or("-")
        );

        async {
            let mut tx = Transition {
                step: step.clone(),
                ctx: ctx.clone(),
                lines: Vec::new(),
                now: self.clock.now(),
            };

            let outcome = match self.transition(&mut tx).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, "advance failed, state unchanged");
                    return Err(e);
                }
            };

            *step = tx.step;
            *ctx = tx.ctx;
            for line in &tx.lines {
                self.log.append(line);
            }
            tracing::info!(%outcome, status = %step.status, "advanced");
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    async fn transition(&self, tx: &mut Transition) -> Result<Outcome, AdvanceError> {
        let index = match tx.step.active_stage.clone() {
            None => {
                if self.stages.is_empty() {
                    return Err(AdvanceError::EmptyStageTable);
                }
                match self.skip_from(0, tx) {
                    Some(index) => index,
                    None => return Ok(tx.finish()),
                }
            }
            Some(name) => self
                .stages
                .position(&name)
                .ok_or(AdvanceError::UnknownStage(name))?,
        };

        let stage = self.stage(index)?;
        let Some(task) = stage.task(&tx.ctx).cloned() else {
            return self.start(index, tx).await;
        };

        let status = stage.status(&task, &self.services).await?;
        let name = stage.name().to_string();
        tx.log(checking_message(&tx.step.name, &name));
        // Keep the persisted copy in step with the service's answer
        if task.status != status {
            stage.record(&mut tx.ctx, task.with_status(status));
        }

        match status {
            // Only a task still running can time out; a late poll of a
            // finished or failed task reports what the task did
            TaskStatus::Pending | TaskStatus::InProgress if tx.step.stage_overdue(tx.now) => {
                let secs = tx.step.config.max_duration_secs();
                tx.log(stage_message(
                    &tx.step.name,
                    &name,
                    &format!("took longer than {} seconds to run and has timed out", secs),
                ));
                tx.fail(FailureKind::TimedOut);
                Ok(Outcome::TimedOut { stage: name })
            }
            TaskStatus::Pending | TaskStatus::InProgress => {
                tx.log(stage_message(&tx.step.name, &name, "is still in progress"));
                Ok(Outcome::InProgress { stage: name })
            }
            TaskStatus::Failed => {
                tx.log(stage_message(
                    &tx.step.name,
                    &name,
                    &format!("failed with task status {}", status),
                ));
                tx.fail(FailureKind::TaskFailed);
                Ok(Outcome::Failed { stage: name })
            }
            TaskStatus::Finished => {
                if self.stages.is_last(index) {
                    return Ok(tx.finish());
                }
                match self.skip_from(index + 1, tx) {
                    Some(next) => self.start(next, tx).await,
                    None => Ok(tx.finish()),
                }
            }
        }
    }

    /// Make `index` the active stage and skip forward past every stage whose
    /// skip predicate holds. Returns `None` once the last stage is skipped.
    fn skip_from(&self, mut index: usize, tx: &mut Transition) -> Option<usize> {
        while let Some(stage) = self.stages.get(index) {
            tx.step.active_stage = Some(stage.name().to_string());
            match stage.skip_reason(&tx.ctx) {
                None => return Some(index),
                Some(reason) => {
                    tracing::debug!(stage = stage.name(), %reason, "stage skipped");
                    tx.log(skipped_message(&reason));
                    if self.stages.is_last(index) {
                        return None;
                    }
                    index += 1;
                }
            }
        }
        None
    }

    async fn start(&self, index: usize, tx: &mut Transition) -> Result<Outcome, AdvanceError> {
        let stage = self.stage(index)?;
        let task = stage.start(&tx.ctx, &self.services).await?;
        let name = stage.name().to_string();

        tracing::info!(stage = %name, task_id = %task.id, "stage started");
        tx.log(stage_message(&tx.step.name, &name, &stage.start_message()));
        stage.record(&mut tx.ctx, task);
        tx.step.active_stage = Some(name.clone());
        tx.step.status = StepStatus::Started;
        tx.step.started_at = Some(tx.now);
        Ok(Outcome::Started { stage: name })
    }

    fn stage(&self, index: usize) -> Result<&dyn Stage<S>, AdvanceError> {
        self.stages
            .get(index)
            .ok_or_else(|| AdvanceError::UnknownStage(format!("#{}", index)))
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
