// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory task board shared by the fake services
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::ServiceError;
use naut_core::{Clock, FakeClock, IdGen, SequentialIdGen, TaskId, TaskKind, TaskRef, TaskStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    BeginSnapshot {
        environment: String,
        initiator: String,
    },
    BeginDeployment {
        environment: String,
        build: String,
        initiator: String,
    },
    Status {
        id: TaskId,
    },
}

#[derive(Default)]
struct BoardState {
    tasks: HashMap<TaskId, TaskRef>,
    calls: Vec<ServiceCall>,
    unavailable: Option<String>,
}

/// Task storage and failure injection for a fake service
#[derive(Clone)]
pub(crate) struct FakeTaskBoard {
    state: Arc<Mutex<BoardState>>,
    ids: SequentialIdGen,
    clock: FakeClock,
}

impl FakeTaskBoard {
    pub(crate) fn new(prefix: &str, clock: FakeClock) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::default())),
            ids: SequentialIdGen::new(prefix),
            clock,
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut BoardState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Record a call, failing it if the service is marked unavailable
    pub(crate) fn record(&self, call: ServiceCall) -> Result<(), ServiceError> {
        self.with_state(|s| {
            s.calls.push(call);
            match &s.unavailable {
                Some(reason) => Err(ServiceError::Unavailable(reason.clone())),
                None => Ok(()),
            }
        })
    }

    pub(crate) fn create(&self, kind: TaskKind, owner: &str) -> TaskRef {
        let task = TaskRef::new(self.ids.next(), kind, owner, self.clock.now());
        self.with_state(|s| s.tasks.insert(task.id.clone(), task.clone()));
        task
    }

    pub(crate) fn status(&self, id: &TaskId) -> Result<TaskStatus, ServiceError> {
        self.with_state(|s| {
            s.tasks
                .get(id)
                .map(|t| t.status)
                .ok_or_else(|| ServiceError::TaskNotFound(id.clone()))
        })
    }

    pub(crate) fn set_status(&self, id: &TaskId, status: TaskStatus) -> bool {
        self.with_state(|s| match s.tasks.get_mut(id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        })
    }

    pub(crate) fn task(&self, id: &TaskId) -> Option<TaskRef> {
        self.with_state(|s| s.tasks.get(id).cloned())
    }

    pub(crate) fn tasks(&self) -> Vec<TaskRef> {
        self.with_state(|s| {
            let mut tasks: Vec<_> = s.tasks.values().cloned().collect();
            tasks.sort_by(|a, b| a.id.cmp(&b.id));
            tasks
        })
    }

    pub(crate) fn calls(&self) -> Vec<ServiceCall> {
        self.with_state(|s| s.calls.clone())
    }

    pub(crate) fn clear_calls(&self) {
        self.with_state(|s| s.calls.clear());
    }

    pub(crate) fn set_unavailable(&self, reason: Option<String>) {
        self.with_state(|s| s.unavailable = reason);
    }
}
