// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Step timestamps are persisted between invocations, so the clock hands
//! out wall-clock UTC times rather than monotonic instants.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source of "now" for stage start times and timeout checks
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock; clones share the same instant
#[derive(Clone)]
pub struct FakeClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    /// Frozen at midnight UTC on 2026-01-01
    pub fn new() -> Self {
        Self::at(DateTime::<Utc>::from_timestamp(EPOCH_SECS, 0).unwrap_or_else(Utc::now))
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Move time forward, e.g. past a stage's maximum duration
    pub fn advance(&self, by: Duration) {
        let by = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
        let mut instant = self.instant.lock().unwrap_or_else(|e| e.into_inner());
        *instant = instant.checked_add_signed(by).unwrap_or(*instant);
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}

const EPOCH_SECS: i64 = 1_767_225_600;

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
