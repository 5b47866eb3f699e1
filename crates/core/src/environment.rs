// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment environments and build archives

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Name of a build archive.
///
/// Builds ship as `<project>-<ref>.tar.gz`. The full name drops the
/// archive extension; the simple name also drops the project prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildName {
    full: String,
}

impl BuildName {
    /// Create from an already-stripped build name such as `project-abc123`
    pub fn new(full: impl Into<String>) -> Self {
        Self { full: full.into() }
    }

    /// Derive the build name from an archive path
    pub fn from_filename(path: impl AsRef<Path>) -> Self {
        let base = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let full = base.strip_suffix(".tar.gz").unwrap_or(&base).to_string();
        Self { full }
    }

    /// Build name including the project prefix
    pub fn full_name(&self) -> &str {
        &self.full
    }

    /// Build name without the project prefix
    pub fn simple_name(&self) -> &str {
        match self.full.split_once('-') {
            Some((_, rest)) => rest,
            None => &self.full,
        }
    }
}

impl fmt::Display for BuildName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full)
    }
}

/// A target deployment environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    /// Build currently live on the environment, if anything was ever deployed
    pub current_build: Option<BuildName>,
    /// Build this pipeline will deploy
    pub pending_build: Option<BuildName>,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_build: None,
            pending_build: None,
        }
    }

    pub fn with_current_build(self, build: BuildName) -> Self {
        Self {
            current_build: Some(build),
            ..self
        }
    }

    pub fn with_pending_build(self, build: BuildName) -> Self {
        Self {
            pending_build: Some(build),
            ..self
        }
    }

    /// Identifier of the live build; `None` means there is nothing to snapshot
    pub fn current_build_identifier(&self) -> Option<&str> {
        self.current_build.as_ref().map(BuildName::full_name)
    }
}
