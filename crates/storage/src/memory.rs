// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory step store

use crate::error::StorageError;
use crate::record::{sort_records, StepRecord, StepStore};
use naut_core::StepId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared in-memory store; clones see the same records
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<StepId, StepRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StepStore for MemoryStore {
    fn load(&self, id: &StepId) -> Result<StepRecord, StorageError> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::step_not_found(&id.0))
    }

    fn save(&self, record: &StepRecord) -> Result<(), StorageError> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.id().clone(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<StepRecord>, StorageError> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        sort_records(&mut records);
        Ok(records)
    }
}
