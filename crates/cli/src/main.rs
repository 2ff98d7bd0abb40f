// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! awesim: trace-driven simulator of a pilot-job execution service.

mod args;

use anyhow::{bail, Context};
use args::Args;
use aw_core::{SimConfig, Ts};
use aw_engine::{EventLog, SchedPolicy, SimOptions, SimSummary, Simulation};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let (config_path, worktrace) = required_paths(&args)?;

    let cfg = SimConfig::load(&config_path)?;
    let pipeline = cfg.pipeline();
    let traces = aw_trace::load(&worktrace, args.jobtrace.as_deref(), &pipeline)?;

    let log = EventLog::create(&args.output)
        .with_context(|| format!("cannot open output file {}", args.output.display()))?;

    let options = SimOptions {
        policy: SchedPolicy::from_flag(args.sched_policy)
            .with_context(|| format!("invalid --sched-policy {} (0-2)", args.sched_policy))?,
        fraction: args.fraction_factor(),
        end_time: Ts::from_secs(args.end_time),
    };
    tracing::info!(
        policy = %options.policy,
        fraction = options.fraction,
        output = %args.output.display(),
        "starting simulation"
    );

    let summary = Simulation::build(&cfg, traces, log, options).run()?;
    print_summary(&summary);
    Ok(())
}

/// The two flags the simulator cannot run without; missing either is
/// the exit-1 path.
fn required_paths(args: &Args) -> anyhow::Result<(PathBuf, PathBuf)> {
    let Some(config) = args.codes_config.clone() else {
        bail!("Expected \"codes-config\" option, please see --help.");
    };
    let Some(worktrace) = args.worktrace.clone() else {
        bail!("Expected \"worktrace\" option, please see --help.");
    };
    Ok((config, worktrace))
}

fn print_summary(summary: &SimSummary) {
    if let Some(server) = &summary.reports.server {
        println!(
            "makespan={:.6};total_job={};total_task={};total_workunit={}",
            server.makespan_s, server.total_jobs, server.total_tasks, server.total_works
        );
    }
    for worker in &summary.reports.workers {
        println!(
            "worker={};group={};processed={};compute_time={:.6};download_time={:.6};upload_time={:.6};busy_rate={:.6}",
            worker.lp,
            worker.group,
            worker.processed,
            worker.compute_s,
            worker.download_s,
            worker.upload_s,
            worker.busy_rate
        );
    }
    if let Some(store) = &summary.reports.store {
        println!(
            "shock;data_download_size={};data_upload_size={}",
            store.download_bytes, store.upload_bytes
        );
    }
    if let Some(router) = &summary.reports.router {
        println!(
            "shock_router;data_download_size={};data_upload_size={}",
            router.download_bytes, router.upload_bytes
        );
    }
}
