// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared job/workunit tables, built once before the kernel starts.

use aw_core::{Job, JobId, WorkId, Workunit};
use aw_trace::TraceSet;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// The process-wide object tables.
///
/// No entries are added or removed after load. The server LP is the
/// sole mutator of job/task state; workers only write workunit timing
/// fields.
#[derive(Debug)]
pub struct SimDb {
    pub jobs: IndexMap<JobId, Job>,
    pub works: IndexMap<WorkId, Workunit>,
    pub kickoff_epoch: f64,
}

impl SimDb {
    pub fn from_traces(set: TraceSet) -> Self {
        Self { jobs: set.jobs, works: set.works, kickoff_epoch: set.kickoff_epoch }
    }

    /// Seconds between `epoch` and the kickoff epoch.
    pub fn etime_to_sim(&self, epoch: f64) -> f64 {
        epoch - self.kickoff_epoch
    }

    pub fn work(&self, id: &WorkId) -> Option<&Workunit> {
        self.works.get(id)
    }

    pub fn work_mut(&mut self, id: &WorkId) -> Option<&mut Workunit> {
        self.works.get_mut(id)
    }
}

/// Cheap handle to the shared tables.
///
/// The kernel is single-threaded, so the mutex is never contended; it
/// exists to give every LP a clonable handle with interior mutability.
#[derive(Debug, Clone)]
pub struct Db(Arc<Mutex<SimDb>>);

impl Db {
    pub fn new(db: SimDb) -> Self {
        Self(Arc::new(Mutex::new(db)))
    }

    pub fn with<T>(&self, f: impl FnOnce(&SimDb) -> T) -> T {
        f(&self.0.lock())
    }

    pub fn with_mut<T>(&self, f: impl FnOnce(&mut SimDb) -> T) -> T {
        f(&mut self.0.lock())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
