// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run pipeline context shared across stages

use crate::config::ConfigError;
use crate::environment::Environment;
use crate::task::TaskRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable state of one pipeline run.
///
/// Task slots are filled when their stage starts and never cleared; later
/// calls only refresh the status copied from the owning service.
/// A retry needs a fresh context and step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineContext {
    pub environment: Environment,
    /// Deployer identity, recorded as the owner of every task started
    pub initiator: String,
    /// User opted out of the pre-deploy snapshot
    #[serde(default)]
    pub skip_snapshot: bool,
    pub previous_snapshot: Option<TaskRef>,
    pub current_deployment: Option<TaskRef>,
    /// Task slots for stages appended to the standard table, keyed by stage name
    #[serde(default)]
    pub stage_tasks: BTreeMap<String, TaskRef>,
}

impl PipelineContext {
    pub fn new(environment: Environment, initiator: impl Into<String>) -> Self {
        Self {
            environment,
            initiator: initiator.into(),
            skip_snapshot: false,
            previous_snapshot: None,
            current_deployment: None,
            stage_tasks: BTreeMap::new(),
        }
    }

    pub fn with_skip_snapshot(self, skip_snapshot: bool) -> Self {
        Self {
            skip_snapshot,
            ..self
        }
    }

    /// Check the context can drive a full run.
    ///
    /// Called when a step is created so a missing build surfaces before
    /// anything is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.pending_build.is_none() {
            return Err(ConfigError::NoPendingBuild(self.environment.name.clone()));
        }
        if self.initiator.trim().is_empty() {
            return Err(ConfigError::MissingInitiator);
        }
        Ok(())
    }

    /// All task references recorded so far, in stage order for the built-in slots
    pub fn tasks(&self) -> Vec<&TaskRef> {
        self.previous_snapshot
            .iter()
            .chain(self.current_deployment.iter())
            .chain(self.stage_tasks.values())
            .collect()
    }
}
