// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use naut_core::BuildName;

fn env() -> Environment {
    Environment::new("prod").with_pending_build(BuildName::new("mysite-def456"))
}

#[tokio::test]
async fn fake_deploy_records_owner_and_build() {
    let service = FakeDeployService::new();

    let task = service.begin_deployment(&env(), "author").await.unwrap();
    assert_eq!(task.id, TaskId::from("deploy-1"));
    assert_eq!(task.owner, "author");
    assert_eq!(
        service.calls(),
        vec![ServiceCall::BeginDeployment {
            environment: "prod".to_string(),
            build: "mysite-def456".to_string(),
            initiator: "author".to_string(),
        }]
    );
    assert_eq!(service.begin_count(), 1);
}

#[tokio::test]
async fn fake_deploy_requires_pending_build() {
    let service = FakeDeployService::new();
    let err = service
        .begin_deployment(&Environment::new("prod"), "author")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rejected(_)));
    assert_eq!(service.begin_count(), 0);
}

#[tokio::test]
async fn fake_deploy_status_follows_marks() {
    let service = FakeDeployService::new();
    let task = service.begin_deployment(&env(), "author").await.unwrap();

    service.mark_finished(&task.id);
    assert_eq!(service.status(&task.id).await.unwrap(), TaskStatus::Finished);
    assert_eq!(
        service.task(&task.id).map(|t| t.status),
        Some(TaskStatus::Finished)
    );
}

#[tokio::test]
async fn fake_deploy_unavailable_records_call() {
    let service = FakeDeployService::new();
    let task = service.begin_deployment(&env(), "author").await.unwrap();
    service.clear_calls();
    service.set_unavailable("timeout");

    assert!(matches!(
        service.status(&task.id).await,
        Err(ServiceError::Unavailable(reason)) if reason == "timeout"
    ));
    assert_eq!(service.calls().len(), 1);
}
