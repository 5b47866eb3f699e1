// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step configuration
//!
//! Configuration is validated when it is built, so a step can never be
//! created with a missing or unusable maximum duration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Option name used by the string-keyed configuration mapping
pub const MAX_DURATION_OPTION: &str = "MaxDuration";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option: {0}")]
    MissingOption(String),
    #[error("invalid value for {option}: {value:?}")]
    InvalidDuration { option: String, value: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(String),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("environment {0} has no pending build to deploy")]
    NoPendingBuild(String),
    #[error("initiator must not be empty")]
    MissingInitiator,
}

/// Validated configuration for a pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStepConfig")]
pub struct StepConfig {
    /// Time allowed per stage before the step times out
    #[serde(with = "humantime_serde")]
    max_duration: Duration,
}

#[derive(Deserialize)]
struct RawStepConfig {
    #[serde(default, with = "humantime_serde")]
    max_duration: Option<Duration>,
}

impl TryFrom<RawStepConfig> for StepConfig {
    type Error = ConfigError;

    fn try_from(raw: RawStepConfig) -> Result<Self, Self::Error> {
        let max_duration = raw
            .max_duration
            .ok_or_else(|| ConfigError::MissingOption("max_duration".to_string()))?;
        StepConfig::new(max_duration)
    }
}

impl StepConfig {
    pub fn new(max_duration: Duration) -> Result<Self, ConfigError> {
        if max_duration.is_zero() {
            return Err(ConfigError::ZeroDuration("max_duration".to_string()));
        }
        Ok(Self { max_duration })
    }

    /// Parse a TOML document such as `max_duration = "1h"`
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Build from a string-keyed option mapping, e.g. `{"MaxDuration": "3600"}`.
    ///
    /// Plain integers are seconds; humantime strings (`"90m"`) are accepted too.
    pub fn from_options(options: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let value = options
            .get(MAX_DURATION_OPTION)
            .ok_or_else(|| ConfigError::MissingOption(MAX_DURATION_OPTION.to_string()))?;
        let max_duration = parse_duration(value).ok_or_else(|| ConfigError::InvalidDuration {
            option: MAX_DURATION_OPTION.to_string(),
            value: value.clone(),
        })?;
        if max_duration.is_zero() {
            return Err(ConfigError::ZeroDuration(MAX_DURATION_OPTION.to_string()));
        }
        Ok(Self { max_duration })
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Whole seconds, as reported in timeout messages
    pub fn max_duration_secs(&self) -> u64 {
        self.max_duration.as_secs()
    }
}

fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    humantime::parse_duration(value).ok()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
