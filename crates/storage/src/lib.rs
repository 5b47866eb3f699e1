// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! naut-storage: persistence for pipeline steps
//!
//! A step and its context are saved together as one [`StepRecord`] so a
//! caller can persist the result of each `advance()` atomically.

mod error;
mod json;
mod memory;
mod record;

pub use error::StorageError;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use record::{StepRecord, StepStore};
