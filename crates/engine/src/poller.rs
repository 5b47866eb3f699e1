// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer-driven re-invocation of the driver

use crate::driver::Driver;
use crate::error::PollError;
use crate::outcome::Outcome;
use naut_adapters::Services;
use naut_core::{Clock, LogSink, StepId, StepStatus};
use naut_storage::StepStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// What a poll loop did before it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSummary {
    /// `advance()` calls made, successful or not
    pub polls: u32,
    /// Calls that failed with a retryable service error
    pub errors: u32,
    pub last: Option<Outcome>,
    pub status: StepStatus,
}

/// Advances one stored step on a fixed interval.
///
/// The record is loaded before and saved after every successful call, so
/// the store always holds the state after the last completed transition.
pub struct Poller<S: Services, C: Clock, L: LogSink> {
    driver: Driver<S, C, L>,
    interval: Duration,
    max_polls: Option<u32>,
    running: Arc<AtomicBool>,
}

impl<S: Services, C: Clock, L: LogSink> Poller<S, C, L> {
    pub fn new(driver: Driver<S, C, L>, interval: Duration) -> Self {
        Self {
            driver,
            interval,
            max_polls: None,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop after `max_polls` calls even if the step is still running
    pub fn with_max_polls(self, max_polls: u32) -> Self {
        Self {
            max_polls: Some(max_polls),
            ..self
        }
    }

    /// Flag that stops the loop before its next call when cleared
    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Poll until the step is terminal, `max_polls` is reached or the loop
    /// is stopped. Retryable service errors are logged and retried on the
    /// next tick; anything else ends the loop.
    pub async fn run(&self, store: &impl StepStore, id: &StepId) -> Result<PollSummary, PollError> {
        let mut ticker = interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = PollSummary {
            polls: 0,
            errors: 0,
            last: None,
            status: store.load(id)?.step.status,
        };

        loop {
            if !self.running.load(Ordering::SeqCst) {
                tracing::info!(step = %id, "poller stopped");
                break;
            }
            if self.max_polls.is_some_and(|max| summary.polls >= max) {
                break;
            }

            // First tick completes immediately
            ticker.tick().await;

            let mut record = store.load(id)?;
            summary.status = record.step.status;
            if record.step.is_terminal() {
                break;
            }

            summary.polls += 1;
            match self.driver.advance(&mut record.step, &mut record.context).await {
                Ok(outcome) => {
                    store.save(&record)?;
                    summary.status = record.step.status;
                    let done = outcome.is_terminal();
                    summary.last = Some(outcome);
                    if done {
                        break;
                    }
                }
                Err(e) if e.is_retryable() => {
                    summary.errors += 1;
                    tracing::warn!(step = %id, error = %e, "advance failed, retrying next tick");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
