// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use yare::parameterized;

#[test]
fn new_task_is_pending() {
    let clock = FakeClock::new();
    let task = TaskRef::new("snapshot-1", TaskKind::Snapshot, "author", clock.now());
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.owner, "author");
    assert_eq!(task.started_at, clock.now());
}

#[test]
fn with_status_keeps_identity() {
    let clock = FakeClock::new();
    let task = TaskRef::new("deploy-1", TaskKind::Deployment, "author", clock.now());
    let finished = task.with_status(TaskStatus::Finished);
    assert_eq!(finished.id, task.id);
    assert_eq!(finished.owner, task.owner);
    assert_eq!(finished.status, TaskStatus::Finished);
}

#[parameterized(
    pending = { TaskStatus::Pending, true },
    in_progress = { TaskStatus::InProgress, true },
    finished = { TaskStatus::Finished, false },
    failed = { TaskStatus::Failed, false },
)]
fn active_statuses(status: TaskStatus, active: bool) {
    assert_eq!(status.is_active(), active);
    assert_eq!(status.is_terminal(), !active);
}

#[parameterized(
    pending = { "pending", TaskStatus::Pending },
    in_progress_dash = { "in-progress", TaskStatus::InProgress },
    in_progress_camel = { "InProgress", TaskStatus::InProgress },
    finished = { "Finished", TaskStatus::Finished },
    failed = { "FAILED", TaskStatus::Failed },
)]
fn parse_status(input: &str, expected: TaskStatus) {
    assert_eq!(input.parse::<TaskStatus>().unwrap(), expected);
}

#[test]
fn parse_unknown_status_fails() {
    let err = "exploded".parse::<TaskStatus>().unwrap_err();
    assert!(err.to_string().contains("exploded"));
}

#[test]
fn status_display_matches_log_wording() {
    assert_eq!(TaskStatus::Failed.to_string(), "Failed");
    assert_eq!(TaskStatus::InProgress.to_string(), "InProgress");
}

#[test]
fn custom_kind_displays_its_name() {
    assert_eq!(TaskKind::Custom("smoketest".into()).to_string(), "smoketest");
    assert_eq!(TaskKind::Snapshot.to_string(), "snapshot");
}
