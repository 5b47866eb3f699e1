// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use naut_core::{
    BuildName, Clock, Environment, FakeClock, LogSink, PipelineContext, PipelineStep, StepConfig,
    StepStatus, TaskKind, TaskRef,
};
use std::time::Duration;
use tempfile::TempDir;
use yare::parameterized;

fn record(id: &str, clock: &FakeClock) -> StepRecord {
    let config = StepConfig::new(Duration::from_secs(3600)).unwrap();
    let env = Environment::new("uat")
        .with_current_build(BuildName::new("mysite-abc123"))
        .with_pending_build(BuildName::new("mysite-def456"));
    StepRecord::new(
        PipelineStep::new(id, "DeployStep", config, clock),
        PipelineContext::new(env, "author"),
    )
}

#[test]
fn save_and_load_round_trips_started_step() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let clock = FakeClock::new();

    let mut rec = record("step-1", &clock);
    rec.step.status = StepStatus::Started;
    rec.step.active_stage = Some("Snapshot".to_string());
    rec.step.started_at = Some(clock.now());
    rec.context.previous_snapshot = Some(TaskRef::new(
        "snapshot-1",
        TaskKind::Snapshot,
        "author",
        clock.now(),
    ));
    store.save(&rec).unwrap();

    assert!(dir.path().join("steps/step-1.json").exists());
    assert_eq!(store.load(&StepId::from("step-1")).unwrap(), rec);
}

#[test]
fn load_missing_step_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.load(&StepId::from("ghost")),
        Err(StorageError::NotFound { kind, id }) if kind == "steps" && id == "ghost"
    ));
}

#[parameterized(
    empty = { "" },
    slash = { "../escape" },
    backslash = { "a\\b" },
    hidden = { ".hidden" },
)]
fn unsafe_ids_are_rejected(id: &str) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    assert!(matches!(
        store.load(&StepId::from(id)),
        Err(StorageError::InvalidId(_))
    ));
    assert!(!store.exists(&StepId::from(id)));
}

#[test]
fn list_returns_oldest_first() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let clock = FakeClock::new();

    let first = record("step-b", &clock);
    clock.advance(Duration::from_secs(60));
    let second = record("step-a", &clock);
    store.save(&second).unwrap();
    store.save(&first).unwrap();

    let ids: Vec<_> = store
        .list()
        .unwrap()
        .iter()
        .map(|r| r.id().0.clone())
        .collect();
    assert_eq!(ids, vec!["step-b", "step-a"]);
}

#[test]
fn unreadable_record_is_skipped_by_list_and_resolve() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let clock = FakeClock::new();
    store.save(&record("step-good", &clock)).unwrap();
    std::fs::write(store.root().join(STEPS_DIR).join("step-torn.json"), "{\"step\":").unwrap();

    let records = store.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), &StepId::from("step-good"));
    assert_eq!(store.resolve("step-g").unwrap().id(), &StepId::from("step-good"));
    assert!(matches!(store.load(&StepId::from("step-torn")), Err(StorageError::Json(_))));
}

#[test]
fn list_of_fresh_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path().join("nested")).unwrap();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn delete_removes_record() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let clock = FakeClock::new();
    store.save(&record("step-1", &clock)).unwrap();

    store.delete(&StepId::from("step-1")).unwrap();
    assert!(!store.exists(&StepId::from("step-1")));
    store.delete(&StepId::from("step-1")).unwrap();
}

#[test]
fn resolve_accepts_exact_id_or_prefix() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let clock = FakeClock::new();
    store.save(&record("step-1a2b", &clock)).unwrap();
    store.save(&record("step-9z", &clock)).unwrap();

    assert_eq!(store.resolve("step-9z").unwrap().id(), &StepId::from("step-9z"));
    assert_eq!(store.resolve("step-1").unwrap().id(), &StepId::from("step-1a2b"));
    assert!(matches!(
        store.resolve("step"),
        Err(StorageError::Ambiguous { .. })
    ));
}

#[test]
fn log_for_lives_under_logs_dir() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    let log = store.log_for(&StepId::from("step-1"));
    log.append("DeployStep:Snapshot creating snapshot of database");

    assert_eq!(log.path(), dir.path().join("logs/step-1.log"));
    assert_eq!(
        log.read_lines().unwrap(),
        vec!["DeployStep:Snapshot creating snapshot of database"]
    );
}
