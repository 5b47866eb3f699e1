// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::deploy::FakeDeployService;
use crate::snapshot::FakeSnapshotService;
use naut_core::BuildName;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn live_env() -> Environment {
    Environment::new("uat")
        .with_current_build(BuildName::new("mysite-abc123"))
        .with_pending_build(BuildName::new("mysite-def456"))
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_deploy_rejects_missing_pending_build() {
    let fake = FakeDeployService::new();
    let traced = TracedDeployService::new(fake.clone());

    let err = traced
        .begin_deployment(&Environment::new("uat"), "author")
        .await
        .unwrap_err();

    assert!(
        err.to_string().contains("no pending build"),
        "Expected error about pending build, got: {}",
        err
    );
    assert!(fake.calls().is_empty(), "inner service must not be called");
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_snapshot_logs_request_and_task() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSnapshotService::new(FakeSnapshotService::new());
        traced.begin_snapshot(&live_env(), "author").await
    });

    assert!(result.is_ok(), "snapshot should succeed: {:?}", result);
    assert!(logs.contains("snapshot.begin"), "span name missing:\n{}", logs);
    assert!(logs.contains("mysite-abc123"), "build missing:\n{}", logs);
    assert!(logs.contains("snapshot queued"), "completion missing:\n{}", logs);
    assert!(logs.contains("snapshot-1"), "task id missing:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "timing missing:\n{}", logs);
}

#[test]
fn traced_snapshot_logs_failures() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeSnapshotService::new();
        fake.set_unavailable("connection refused");
        let traced = TracedSnapshotService::new(fake);
        traced.begin_snapshot(&live_env(), "author").await
    });

    assert!(result.is_err());
    assert!(logs.contains("snapshot request failed"), "logs:\n{}", logs);
    assert!(logs.contains("connection refused"), "logs:\n{}", logs);
}

#[test]
fn traced_deploy_logs_request_and_status() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeDeployService::new();
        let traced = TracedDeployService::new(fake.clone());
        let task = traced.begin_deployment(&live_env(), "author").await.unwrap();
        fake.mark_in_progress(&task.id);
        traced.status(&task.id).await
    });

    assert_eq!(result.unwrap(), TaskStatus::InProgress);
    assert!(logs.contains("deploy.begin"), "logs:\n{}", logs);
    assert!(logs.contains("mysite-def456"), "logs:\n{}", logs);
    assert!(logs.contains("deployment queued"), "logs:\n{}", logs);
    assert!(logs.contains("deployment status"), "logs:\n{}", logs);
}

#[test]
fn traced_status_failure_is_a_warning() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSnapshotService::new(FakeSnapshotService::new());
        traced.status(&TaskId::from("ghost")).await
    });

    assert!(result.is_err());
    assert!(logs.contains("WARN"), "logs:\n{}", logs);
    assert!(logs.contains("ghost"), "logs:\n{}", logs);
}
