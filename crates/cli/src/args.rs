// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line surface of the `awesim` binary.

use clap::Parser;
use std::path::PathBuf;

/// Discrete-event simulator of a pilot-job execution service (server,
/// worker fleet, object store) replayed from workload traces.
#[derive(Debug, Parser)]
#[command(name = "awesim", version)]
pub struct Args {
    /// Simulation configuration file (network, workers, pipeline)
    #[arg(long = "codes-config", value_name = "PATH")]
    pub codes_config: Option<PathBuf>,

    /// Workunit trace file
    #[arg(long, value_name = "PATH")]
    pub worktrace: Option<PathBuf>,

    /// Job trace file; when omitted, jobs are synthesized from the
    /// workunit ids
    #[arg(long, value_name = "PATH")]
    pub jobtrace: Option<PathBuf>,

    /// Event log output file
    #[arg(long, value_name = "PATH", default_value = "awesim_output.log")]
    pub output: PathBuf,

    /// Scheduling policy: 0=fifo, 1=data-aware-best-fit,
    /// 2=data-aware-greedy
    #[arg(long = "sched-policy", value_name = "N", default_value_t = 0)]
    pub sched_policy: u8,

    /// Compress job inter-arrival gaps to this percent (1-99)
    #[arg(long, value_name = "PCT")]
    pub fraction: Option<u32>,

    /// Stop the simulation at this virtual time, in seconds
    #[arg(long = "end-time", value_name = "SECS", default_value_t = 31_536_000.0)]
    pub end_time: f64,
}

impl Args {
    /// Inter-arrival compression factor in (0, 1].
    ///
    /// Out-of-range values are ignored with a notice rather than
    /// rejected, preserving the historical behavior of the flag.
    pub fn fraction_factor(&self) -> f64 {
        match self.fraction {
            Some(pct) if (1..=99).contains(&pct) => f64::from(pct) / 100.0,
            Some(pct) => {
                tracing::warn!(pct, "--fraction outside 1..=99, ignoring");
                1.0
            }
            None => 1.0,
        }
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
