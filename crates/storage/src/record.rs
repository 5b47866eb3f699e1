// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step records and the store contract

use crate::error::StorageError;
use naut_core::{PipelineContext, PipelineStep, StepId};
use serde::{Deserialize, Serialize};

/// A step persisted together with the context it runs against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: PipelineStep,
    pub context: PipelineContext,
}

impl StepRecord {
    pub fn new(step: PipelineStep, context: PipelineContext) -> Self {
        Self { step, context }
    }

    pub fn id(&self) -> &StepId {
        &self.step.id
    }
}

/// Load/save contract for step records.
///
/// `save` replaces the whole record, so a reader sees either the state
/// before an `advance()` or the state after it.
pub trait StepStore: Send + Sync {
    fn load(&self, id: &StepId) -> Result<StepRecord, StorageError>;

    fn save(&self, record: &StepRecord) -> Result<(), StorageError>;

    /// All records, oldest first
    fn list(&self) -> Result<Vec<StepRecord>, StorageError>;

    /// Find a record by exact id or unique id prefix (like git commit hashes)
    fn resolve(&self, id_or_prefix: &str) -> Result<StepRecord, StorageError> {
        if id_or_prefix.is_empty() {
            return Err(StorageError::InvalidId(String::new()));
        }
        match self.load(&StepId::from(id_or_prefix)) {
            Ok(record) => return Ok(record),
            Err(StorageError::NotFound { .. }) | Err(StorageError::InvalidId(_)) => {}
            Err(e) => return Err(e),
        }

        let mut matches: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|r| r.id().0.starts_with(id_or_prefix))
            .collect();

        match matches.len() {
            0 => Err(StorageError::step_not_found(id_or_prefix)),
            1 => Ok(matches.remove(0)),
            n => Err(StorageError::Ambiguous {
                prefix: id_or_prefix.to_string(),
                matches: n,
            }),
        }
    }
}

/// Oldest first, ties broken by id
pub(crate) fn sort_records(records: &mut [StepRecord]) {
    records.sort_by(|a, b| {
        a.step
            .created_at
            .cmp(&b.step.created_at)
            .then_with(|| a.id().cmp(b.id()))
    });
}
