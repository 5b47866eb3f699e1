// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn new_rejects_zero_duration() {
    assert!(matches!(
        StepConfig::new(Duration::ZERO),
        Err(ConfigError::ZeroDuration(_))
    ));
}

#[parameterized(
    seconds = { "3600", 3600 },
    padded = { " 120 ", 120 },
    humantime_hours = { "2h", 7200 },
    humantime_minutes = { "90m", 5400 },
)]
fn from_options_parses_max_duration(value: &str, expected_secs: u64) {
    let config = StepConfig::from_options(&options(&[("MaxDuration", value)])).unwrap();
    assert_eq!(config.max_duration_secs(), expected_secs);
}

#[test]
fn from_options_requires_max_duration() {
    let err = StepConfig::from_options(&options(&[("Other", "1")])).unwrap_err();
    assert!(matches!(err, ConfigError::MissingOption(name) if name == "MaxDuration"));
}

#[test]
fn from_options_rejects_garbage() {
    let err = StepConfig::from_options(&options(&[("MaxDuration", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDuration { value, .. } if value == "soon"));
}

#[test]
fn from_options_rejects_zero() {
    let err = StepConfig::from_options(&options(&[("MaxDuration", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroDuration(_)));
}

#[test]
fn from_toml_reads_humantime() {
    let config = StepConfig::from_toml(r#"max_duration = "1h""#).unwrap();
    assert_eq!(config.max_duration(), Duration::from_secs(3600));
}

#[test]
fn from_toml_requires_max_duration() {
    assert!(StepConfig::from_toml("").is_err());
}

#[test]
fn from_toml_rejects_zero() {
    assert!(StepConfig::from_toml(r#"max_duration = "0s""#).is_err());
}
