// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not found: {kind}/{id}")]
    NotFound { kind: String, id: String },
    #[error("ambiguous id {prefix}: matches {matches} steps")]
    Ambiguous { prefix: String, matches: usize },
    #[error("invalid id: {0:?}")]
    InvalidId(String),
}

impl StorageError {
    pub(crate) fn step_not_found(id: &str) -> Self {
        StorageError::NotFound {
            kind: "steps".to_string(),
            id: id.to_string(),
        }
    }
}
