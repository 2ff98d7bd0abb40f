// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation assembly: topology → LPs → kernel, plus the final report.

use crate::db::{Db, SimDb};
use crate::error::SimError;
use crate::event_log::EventLog;
use crate::router::RouterLp;
use crate::server::{SchedPolicy, ServerLp};
use crate::store::StoreLp;
use crate::worker::WorkerLp;
use aw_core::{Group, LpId, SimConfig, Topology, Ts};
use aw_kernel::Kernel;
use aw_net::SimpleWan;
use aw_trace::TraceSet;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerReport {
    pub start_s: f64,
    pub end_s: f64,
    pub makespan_s: f64,
    pub total_jobs: u32,
    pub total_tasks: u32,
    pub total_works: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub lp: LpId,
    pub group: Group,
    pub processed: u32,
    pub compute_s: f64,
    pub download_s: f64,
    pub upload_s: f64,
    pub busy_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreReport {
    pub download_bytes: u64,
    pub upload_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterReport {
    pub download_bytes: u64,
    pub upload_bytes: u64,
}

/// Per-LP summaries, filled in at finalize.
#[derive(Debug, Clone, Default)]
pub struct Reports {
    pub server: Option<ServerReport>,
    pub workers: Vec<WorkerReport>,
    pub store: Option<StoreReport>,
    pub router: Option<RouterReport>,
}

pub type SharedReports = Arc<Mutex<Reports>>;

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub policy: SchedPolicy,
    /// Inter-arrival compression factor in (0, 1].
    pub fraction: f64,
    pub end_time: Ts,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            policy: SchedPolicy::Fifo,
            fraction: 1.0,
            // One simulated year, as the original hard-coded.
            end_time: Ts::from_secs(60.0 * 60.0 * 24.0 * 365.0),
        }
    }
}

#[derive(Debug)]
pub struct SimSummary {
    pub makespan_s: f64,
    pub reports: Reports,
}

/// A fully wired simulation, ready to run once.
pub struct Simulation {
    kernel: Kernel,
    log: Arc<EventLog>,
    reports: SharedReports,
}

impl Simulation {
    pub fn build(
        cfg: &SimConfig,
        traces: TraceSet,
        log: EventLog,
        options: SimOptions,
    ) -> Self {
        let topo = Arc::new(Topology::from_config(&cfg.workers));
        let net = SimpleWan::new(&cfg.network);
        let db = Db::new(SimDb::from_traces(traces));
        let log = Arc::new(log);
        let reports: SharedReports = Arc::new(Mutex::new(Reports::default()));

        // Registration order must follow the topology layout: the
        // kernel hands out dense ids in registration order.
        let mut kernel = Kernel::new(options.end_time);
        let server = kernel.register(Box::new(ServerLp::new(
            db.clone(),
            Arc::clone(&log),
            Arc::clone(&topo),
            options.policy,
            options.fraction,
            Arc::clone(&reports),
        )));
        debug_assert_eq!(server, Topology::SERVER);
        let store = kernel.register(Box::new(StoreLp::new(net.clone(), Arc::clone(&reports))));
        debug_assert_eq!(store, Topology::STORE);
        let router = kernel.register(Box::new(RouterLp::new(net.clone(), Arc::clone(&reports))));
        debug_assert_eq!(router, Topology::ROUTER);
        for (lp, group) in topo.workers() {
            let id = kernel.register(Box::new(WorkerLp::new(
                db.clone(),
                Arc::clone(&log),
                net.clone(),
                group,
                Arc::clone(&reports),
            )));
            debug_assert_eq!(id, lp);
        }

        Self { kernel, log, reports }
    }

    /// Run to completion, flush the event log, and collect reports.
    pub fn run(mut self) -> Result<SimSummary, SimError> {
        self.kernel.run()?;
        self.log.flush()?;
        let reports = std::mem::take(&mut *self.reports.lock());
        let makespan_s = reports.server.as_ref().map_or(0.0, |s| s.makespan_s);
        Ok(SimSummary { makespan_s, reports })
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
