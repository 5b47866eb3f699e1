// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based storage

use crate::error::StorageError;
use crate::record::{sort_records, StepRecord, StepStore};
use naut_core::{FileLog, StepId};
use std::fs;
use std::path::{Path, PathBuf};

const STEPS_DIR: &str = "steps";
const LOGS_DIR: &str = "logs";

/// Step records as pretty-printed JSON under `<root>/steps/<id>.json`
#[derive(Clone, Debug)]
pub struct JsonStore {
    base_path: PathBuf,
}

impl JsonStore {
    /// Open a store at the given path, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn root(&self) -> &Path {
        &self.base_path
    }

    /// Check if a step exists
    pub fn exists(&self, id: &StepId) -> bool {
        self.path_for(id).map(|p| p.exists()).unwrap_or(false)
    }

    /// Delete a step record; deleting a missing record is not an error
    pub fn delete(&self, id: &StepId) -> Result<(), StorageError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Operator-facing step log kept next to the record
    pub fn log_for(&self, id: &StepId) -> FileLog {
        FileLog::new(
            self.base_path
                .join(LOGS_DIR)
                .join(format!("{}.log", id.0)),
        )
    }

    fn path_for(&self, id: &StepId) -> Result<PathBuf, StorageError> {
        if id.0.is_empty() || id.0.contains(['/', '\\']) || id.0.starts_with('.') {
            return Err(StorageError::InvalidId(id.0.clone()));
        }
        Ok(self
            .base_path
            .join(STEPS_DIR)
            .join(format!("{}.json", id.0)))
    }
}

impl StepStore for JsonStore {
    fn load(&self, id: &StepId) -> Result<StepRecord, StorageError> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::step_not_found(&id.0))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self, record: &StepRecord) -> Result<(), StorageError> {
        let path = self.path_for(record.id())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        // Rename over the old record so readers never see a partial write
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<StepRecord>, StorageError> {
        let dir = self.base_path.join(STEPS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let json = fs::read_to_string(&path)?;
                match serde_json::from_str::<StepRecord>(&json) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable step record")
                    }
                }
            }
        }
        sort_records(&mut records);
        Ok(records)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
