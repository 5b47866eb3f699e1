// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error::AdvanceError;
use crate::stage::StageTable;
use naut_adapters::{FakeServices, ServiceError};
use naut_core::{
    BuildName, Clock, Environment, FakeClock, MemoryLog, PipelineContext, PipelineStep,
    StepConfig, TaskKind, TaskRef,
};
use naut_storage::{MemoryStore, StepRecord};

const TICK: Duration = Duration::from_millis(1);

fn setup() -> (Poller<FakeServices, FakeClock, MemoryLog>, FakeServices, MemoryStore) {
    let clock = FakeClock::new();
    let services = FakeServices::fake(clock.clone());
    let driver = Driver::new(services.clone(), clock.clone(), MemoryLog::new());

    let store = MemoryStore::new();
    let env = Environment::new("uat").with_pending_build(BuildName::new("mysite-def456"));
    let config = StepConfig::new(Duration::from_secs(3600)).unwrap();
    store
        .save(&StepRecord::new(
            PipelineStep::new("step-1", "DeployStep", config, &clock),
            PipelineContext::new(env, "author"),
        ))
        .unwrap();

    (Poller::new(driver, TICK), services, store)
}

fn step_id() -> StepId {
    StepId::from("step-1")
}

#[tokio::test]
async fn poller_saves_after_each_call() {
    let (poller, services, store) = setup();
    let poller = poller.with_max_polls(3);

    let summary = poller.run(&store, &step_id()).await.unwrap();
    assert_eq!(summary.polls, 3);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.status, StepStatus::Started);
    assert_eq!(
        summary.last,
        Some(Outcome::InProgress {
            stage: "Deployment".into()
        })
    );
    assert_eq!(services.deployments().begin_count(), 1);

    let record = store.load(&step_id()).unwrap();
    assert_eq!(record.step.active_stage_name(), Some("Deployment"));
    assert!(record.context.current_deployment.is_some());
}

#[tokio::test]
async fn poller_stops_at_terminal_step() {
    let (poller, services, store) = setup();
    let first = poller.with_max_polls(1);
    first.run(&store, &step_id()).await.unwrap();

    let record = store.load(&step_id()).unwrap();
    let deployment = record.context.current_deployment.unwrap();
    services.deployments().mark_finished(&deployment.id);

    let summary = first.run(&store, &step_id()).await.unwrap();
    assert_eq!(summary.polls, 1);
    assert_eq!(summary.last, Some(Outcome::Finished));
    assert_eq!(summary.status, StepStatus::Finished);

    let again = first.run(&store, &step_id()).await.unwrap();
    assert_eq!(again.polls, 0);
    assert_eq!(again.status, StepStatus::Finished);
}

#[tokio::test]
async fn poller_retries_service_errors_without_saving() {
    let (poller, services, store) = setup();
    services.deployments().set_unavailable("deploy host down");
    let before = store.load(&step_id()).unwrap();

    let summary = poller.with_max_polls(2).run(&store, &step_id()).await.unwrap();
    assert_eq!(summary.polls, 2);
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.last, None);
    assert_eq!(store.load(&step_id()).unwrap(), before);
}

#[tokio::test]
async fn poller_gives_up_on_non_retryable_errors() {
    let clock = FakeClock::new();
    let services = FakeServices::fake(clock.clone());
    let driver = Driver::new(services, clock, MemoryLog::new()).with_stages(StageTable::empty());
    let (_, _, store) = setup();

    let err = Poller::new(driver, TICK)
        .run(&store, &step_id())
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::Advance(AdvanceError::EmptyStageTable)));
}

#[tokio::test]
async fn poller_gives_up_when_the_task_is_gone() {
    let clock = FakeClock::new();
    let services = FakeServices::fake(clock.clone());
    let driver = Driver::new(services, clock.clone(), MemoryLog::new());
    let (_, _, store) = setup();

    // Step waiting on a deployment the service has no record of
    let mut record = store.load(&step_id()).unwrap();
    record.step.active_stage = Some("Deployment".into());
    record.step.status = StepStatus::Started;
    record.step.started_at = Some(clock.now());
    record.context.current_deployment =
        Some(TaskRef::new("gone-1", TaskKind::Deployment, "author", clock.now()));
    store.save(&record).unwrap();
    clock.advance(Duration::from_secs(7200));

    let err = Poller::new(driver, TICK)
        .with_max_polls(50)
        .run(&store, &step_id())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PollError::Advance(AdvanceError::Service(ServiceError::TaskNotFound(_)))
    ));
    assert_eq!(store.load(&step_id()).unwrap(), record);
}

#[tokio::test]
async fn stopped_poller_makes_no_calls() {
    let (poller, services, store) = setup();
    poller.stop();
    assert!(!poller.running().load(Ordering::SeqCst));

    let summary = poller.run(&store, &step_id()).await.unwrap();
    assert_eq!(summary.polls, 0);
    assert_eq!(summary.status, StepStatus::NotStarted);
    assert!(services.deployments().calls().is_empty());
}

#[tokio::test]
async fn missing_step_is_a_storage_error() {
    let (poller, _, store) = setup();
    let err = poller.run(&store, &StepId::from("ghost")).await.unwrap_err();
    assert!(matches!(err, PollError::Storage(_)));
}
