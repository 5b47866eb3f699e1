// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed task spool
//!
//! Each task is a JSON record under `<root>/tasks/<id>.json`. Services
//! enqueue Pending records; whatever worker executes the task rewrites the
//! status. Readers always go back to the file so they see the worker's
//! latest word.

use crate::error::ServiceError;
use naut_core::{BuildName, Clock, IdGen, SystemClock, TaskId, TaskKind, TaskRef, TaskStatus, UuidIdGen};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const TASKS_DIR: &str = "tasks";

/// A spooled task with the request that created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(flatten)]
    pub task: TaskRef,
    pub environment: String,
    /// Build being snapshotted or deployed
    pub build: Option<String>,
}

/// Directory of task records shared by the spool services
#[derive(Clone)]
pub struct TaskSpool<C: Clock, G: IdGen> {
    root: PathBuf,
    clock: C,
    ids: G,
}

impl TaskSpool<SystemClock, UuidIdGen> {
    /// Open a spool rooted at `root` using wall-clock time and random ids
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_parts(root, SystemClock, UuidIdGen::new("task"))
    }
}

impl<C: Clock, G: IdGen> TaskSpool<C, G> {
    pub fn with_parts(root: impl Into<PathBuf>, clock: C, ids: G) -> Self {
        Self {
            root: root.into(),
            clock,
            ids,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a Pending task record
    pub async fn enqueue(
        &self,
        kind: TaskKind,
        environment: &str,
        build: Option<&BuildName>,
        owner: &str,
    ) -> Result<TaskRef, ServiceError> {
        let task = TaskRef::new(self.ids.next(), kind, owner, self.clock.now());
        let record = TaskRecord {
            task: task.clone(),
            environment: environment.to_string(),
            build: build.map(|b| b.full_name().to_string()),
        };
        self.write(&record).await?;
        Ok(task)
    }

    pub async fn load(&self, id: &TaskId) -> Result<TaskRecord, ServiceError> {
        let path = self.path_for(id)?;
        let json = match fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ServiceError::TaskNotFound(id.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    pub async fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        Ok(self.load(id).await?.task.status)
    }

    /// Overwrite the status of an existing task
    pub async fn set_status(&self, id: &TaskId, status: TaskStatus) -> Result<TaskRef, ServiceError> {
        let mut record = self.load(id).await?;
        record.task.status = status;
        self.write(&record).await?;
        Ok(record.task)
    }

    /// All task records, oldest first
    pub async fn list(&self) -> Result<Vec<TaskRecord>, ServiceError> {
        let dir = self.root.join(TASKS_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let json = fs::read_to_string(&path).await?;
                match serde_json::from_str::<TaskRecord>(&json) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable task record")
                    }
                }
            }
        }
        records.sort_by(|a, b| {
            a.task
                .started_at
                .cmp(&b.task.started_at)
                .then_with(|| a.task.id.cmp(&b.task.id))
        });
        Ok(records)
    }

    async fn write(&self, record: &TaskRecord) -> Result<(), ServiceError> {
        let path = self.path_for(&record.task.id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(record)?;
        // Write then rename so a concurrent reader never sees a torn record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn path_for(&self, id: &TaskId) -> Result<PathBuf, ServiceError> {
        if id.0.is_empty() || id.0.contains(['/', '\\']) || id.0.starts_with('.') {
            return Err(ServiceError::TaskNotFound(id.clone()));
        }
        Ok(self.root.join(TASKS_DIR).join(format!("{}.json", id.0)))
    }
}

#[cfg(test)]
#[path = "spool_tests.rs"]
mod tests;
