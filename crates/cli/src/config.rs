// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI settings

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE: &str = "naut.toml";

/// Settings read from `naut.toml`; command-line flags win over file values
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub state_dir: PathBuf,
    /// Log prefix for new steps
    pub step_name: String,
    /// Default per-stage limit for new steps
    #[serde(with = "humantime_serde")]
    pub max_duration: Duration,
    /// Default delay between `step poll` calls
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            step_name: "DeployStep".to_string(),
            max_duration: Duration::from_secs(3600),
            poll_interval: Duration::from_secs(5),
        }
    }
}

impl Settings {
    /// Load settings from `config`, or from `naut.toml` in the state
    /// directory when it exists. A missing default file means defaults.
    pub fn load(config: Option<&Path>, state_dir: Option<PathBuf>) -> Result<Self> {
        let mut settings = match config {
            Some(path) => Self::from_file(path)?,
            None => {
                let dir = state_dir.clone().unwrap_or_else(default_state_dir);
                let path = dir.join(SETTINGS_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(dir) = state_dir {
            settings.state_dir = dir;
        }
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("naut"))
        .unwrap_or_else(|| PathBuf::from(".naut"))
}
