// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step log sinks and message formatting
//!
//! The step log is the operator-facing record of a run. Every line that
//! concerns a stage is prefixed `<StepName>:<StageName>`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receives human-readable progress and failure messages, in call order
pub trait LogSink: Send + Sync {
    fn append(&self, message: &str);
}

impl<L: LogSink + ?Sized> LogSink for Arc<L> {
    fn append(&self, message: &str) {
        (**self).append(message)
    }
}

/// `<step>:<stage>` label used in step log lines
pub fn stage_label(step: &str, stage: &str) -> String {
    format!("{}:{}", step, stage)
}

/// `<step>:<stage> <message>`
pub fn stage_message(step: &str, stage: &str, message: &str) -> String {
    format!("{} {}", stage_label(step, stage), message)
}

/// `Checking status of <step>:<stage>...`
pub fn checking_message(step: &str, stage: &str) -> String {
    format!("Checking status of {}...", stage_label(step, stage))
}

/// `[Skipped] <reason>`
pub fn skipped_message(reason: &str) -> String {
    format!("[Skipped] {}", reason)
}

/// In-memory sink for tests and for echoing one call's output
#[derive(Clone, Default)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages appended so far
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether any appended message equals `message` exactly
    pub fn has_message(&self, message: &str) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|line| line == message)
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemoryLog {
    fn append(&self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

/// Append-only step log on disk, one message per line
#[derive(Clone, Debug)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written so far; a missing file reads as empty
    pub fn read_lines(&self) -> std::io::Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn write_line(&self, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", message)
    }
}

impl LogSink for FileLog {
    fn append(&self, message: &str) {
        if let Err(e) = self.write_line(message) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write step log");
        }
    }
}

/// Sends every message to two sinks
#[derive(Clone)]
pub struct TeeLog<A, B> {
    first: A,
    second: B,
}

impl<A: LogSink, B: LogSink> TeeLog<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: LogSink, B: LogSink> LogSink for TeeLog<A, B> {
    fn append(&self, message: &str) {
        self.first.append(message);
        self.second.append(message);
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
