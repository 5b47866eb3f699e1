// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Snapshot and deployment services consumed by the pipeline driver

pub mod deploy;
pub mod error;
pub mod services;
pub mod snapshot;
pub mod spool;
pub mod traced;

#[cfg(any(test, feature = "test-support"))]
mod board;

pub use deploy::{DeployService, SpoolDeployService};
pub use error::ServiceError;
pub use services::{ServiceSet, Services, SpoolServices};
pub use snapshot::{SnapshotService, SpoolSnapshotService};
pub use spool::{TaskRecord, TaskSpool};
pub use traced::{TracedDeployService, TracedSnapshotService};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use board::ServiceCall;
#[cfg(any(test, feature = "test-support"))]
pub use deploy::FakeDeployService;
#[cfg(any(test, feature = "test-support"))]
pub use services::FakeServices;
#[cfg(any(test, feature = "test-support"))]
pub use snapshot::FakeSnapshotService;
