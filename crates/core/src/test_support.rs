// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test factories for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

// Test factories may panic on misuse; they never ship in production builds.
#![allow(clippy::panic)]

use crate::config::{NetParams, NetworkConfig, SimConfig, WorkerConfig};
use crate::id::{JobId, WorkId};
use crate::job::Job;
use crate::pipeline::Pipeline;
use crate::work::{WorkTiming, Workunit};

/// A workunit with the given id and runtime, everything else zeroed.
pub fn workunit(id: &str, runtime: f64) -> Workunit {
    let id = WorkId::new(id);
    let parts = match id.parse() {
        Ok(p) => p,
        Err(e) => panic!("test workunit id must be well-formed: {e}"),
    };
    Workunit {
        id,
        job_id: parts.job_id,
        task_index: parts.task_index,
        cmd: "noop".to_string(),
        runtime,
        size_infile: 0,
        size_outfile: 0,
        time_data_in: 0.0,
        time_data_out: 0.0,
        created_epoch: 0.0,
        timing: WorkTiming::default(),
    }
}

/// A workunit with explicit transfer sizes.
pub fn sized_workunit(id: &str, runtime: f64, size_infile: u64, size_outfile: u64) -> Workunit {
    Workunit { size_infile, size_outfile, ..workunit(id, runtime) }
}

/// A chain-pipeline job with `num_tasks` tasks and no workunits yet.
pub fn job(id: &str, created_epoch: f64, num_tasks: usize) -> Job {
    Job::new(JobId::new(id), created_epoch, num_tasks, &Pipeline::mgrast())
}

/// A minimal valid config: `local` + `remote` workers, 1ms LAN and
/// 10ms WAN latency, affinity stage 5.
pub fn sim_config(local: u32, remote: u32) -> SimConfig {
    SimConfig {
        network: NetworkConfig {
            model: "simple-wan".to_string(),
            lan: NetParams { bandwidth_mbps: 1000.0, latency_us: 1000.0 },
            wan: NetParams { bandwidth_mbps: 100.0, latency_us: 10000.0 },
        },
        workers: WorkerConfig { local, remote, affinity_stage: 5 },
        pipeline: None,
    }
}
