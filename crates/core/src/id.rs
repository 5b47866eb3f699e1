// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier generation for steps and tasks
//!
//! Every id is `<prefix>-<suffix>`: the prefix says what kind of record it
//! names (`step`, `task`, ...), the suffix makes it unique.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Hands out fresh identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Random ids with a 12 hex digit suffix, short enough to type at the CLI
#[derive(Clone)]
pub struct UuidIdGen {
    prefix: String,
}

impl UuidIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", self.prefix, &hex[..12])
    }
}

/// Counting ids (`snapshot-1`, `snapshot-2`, ...) for deterministic tests.
/// Clones draw from the same counter.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}", self.prefix, n)
    }
}
