// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! naut deployment pipeline engine
//!
//! The [`Driver`] moves a step through its stage table one transition per
//! `advance()` call. The [`Poller`] repeats that on a timer, persisting
//! after every call.

mod driver;
mod error;
mod outcome;
mod poller;
pub mod stage;

pub use driver::Driver;
pub use error::{AdvanceError, PollError};
pub use outcome::Outcome;
pub use poller::{PollSummary, Poller};
pub use stage::{DeploymentStage, SnapshotStage, Stage, StageTable};
