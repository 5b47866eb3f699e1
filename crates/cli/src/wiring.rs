// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production wiring of store, services and driver

use crate::config::Settings;
use crate::output::StdoutLog;
use anyhow::Result;
use naut_adapters::{
    ServiceSet, SpoolDeployService, SpoolSnapshotService, TaskSpool, TracedDeployService,
    TracedSnapshotService,
};
use naut_core::{FileLog, StepId, SystemClock, TeeLog, UuidIdGen};
use naut_engine::Driver;
use naut_storage::JsonStore;

/// Spool-backed services with tracing
pub type CliServices = ServiceSet<
    TracedSnapshotService<SpoolSnapshotService<SystemClock, UuidIdGen>>,
    TracedDeployService<SpoolDeployService<SystemClock, UuidIdGen>>,
>;

/// Step log written to disk and echoed to stdout
pub type CliLog = TeeLog<FileLog, StdoutLog>;

pub type CliDriver = Driver<CliServices, SystemClock, CliLog>;

pub fn open_store(settings: &Settings) -> Result<JsonStore> {
    Ok(JsonStore::open(&settings.state_dir)?)
}

pub fn open_spool(settings: &Settings) -> TaskSpool<SystemClock, UuidIdGen> {
    TaskSpool::open(&settings.state_dir)
}

/// Driver for one step, logging to that step's log file
pub fn make_driver(settings: &Settings, store: &JsonStore, id: &StepId) -> CliDriver {
    let services = ServiceSet::spool(open_spool(settings)).traced();
    let log = TeeLog::new(store.log_for(id), StdoutLog);
    Driver::new(services, SystemClock, log)
}
