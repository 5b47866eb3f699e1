// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! naut-core: records and capabilities for the naut deployment orchestrator
//!
//! This crate provides:
//! - Plain records for pipeline steps, contexts and task references
//! - Injectable clock and id generation
//! - Validated step configuration
//! - Step log sinks and message formatting

pub mod clock;
pub mod config;
pub mod context;
pub mod environment;
pub mod id;
pub mod log;
pub mod step;
pub mod task;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, StepConfig};
pub use context::PipelineContext;
pub use environment::{BuildName, Environment};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use log::{FileLog, LogSink, MemoryLog, TeeLog};
pub use step::{FailureKind, PipelineStep, StepId, StepStatus};
pub use task::{TaskId, TaskKind, TaskRef, TaskStatus};
