// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service bundles handed to the pipeline driver

use crate::deploy::{DeployService, SpoolDeployService};
use crate::snapshot::{SnapshotService, SpoolSnapshotService};
use crate::spool::TaskSpool;
use crate::traced::{TracedDeployService, TracedSnapshotService};
use naut_core::{Clock, IdGen};

/// Services bundle for stage start and status actions
pub trait Services: Clone + Send + Sync + 'static {
    type Snapshots: SnapshotService;
    type Deployments: DeployService;

    fn snapshots(&self) -> &Self::Snapshots;
    fn deployments(&self) -> &Self::Deployments;
}

/// A snapshot service paired with a deployment service
#[derive(Clone)]
pub struct ServiceSet<S, D> {
    snapshots: S,
    deployments: D,
}

impl<S: SnapshotService, D: DeployService> ServiceSet<S, D> {
    pub fn new(snapshots: S, deployments: D) -> Self {
        Self {
            snapshots,
            deployments,
        }
    }

    /// Wrap both services with tracing
    pub fn traced(self) -> ServiceSet<TracedSnapshotService<S>, TracedDeployService<D>> {
        ServiceSet {
            snapshots: TracedSnapshotService::new(self.snapshots),
            deployments: TracedDeployService::new(self.deployments),
        }
    }
}

impl<S: SnapshotService, D: DeployService> Services for ServiceSet<S, D> {
    type Snapshots = S;
    type Deployments = D;

    fn snapshots(&self) -> &S {
        &self.snapshots
    }

    fn deployments(&self) -> &D {
        &self.deployments
    }
}

/// Spool-backed services sharing one task directory
pub type SpoolServices<C, G> = ServiceSet<SpoolSnapshotService<C, G>, SpoolDeployService<C, G>>;

impl<C, G> ServiceSet<SpoolSnapshotService<C, G>, SpoolDeployService<C, G>>
where
    C: Clock + 'static,
    G: IdGen + 'static,
{
    pub fn spool(spool: TaskSpool<C, G>) -> Self {
        Self::new(
            SpoolSnapshotService::new(spool.clone()),
            SpoolDeployService::new(spool),
        )
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeServices;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::ServiceSet;
    use crate::deploy::FakeDeployService;
    use crate::snapshot::FakeSnapshotService;
    use naut_core::FakeClock;

    /// Fake services for driver tests
    pub type FakeServices = ServiceSet<FakeSnapshotService, FakeDeployService>;

    impl ServiceSet<FakeSnapshotService, FakeDeployService> {
        /// Fakes stamping tasks with times from `clock`
        pub fn fake(clock: FakeClock) -> Self {
            Self::new(
                FakeSnapshotService::with_clock(clock.clone()),
                FakeDeployService::with_clock(clock),
            )
        }
    }
}
