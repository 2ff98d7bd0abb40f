// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for engine tests: captured event logs and trace
//! fixtures on disk.

use crate::event_log::EventLog;
use crate::sim::{SimOptions, SimSummary, Simulation};
use crate::SchedPolicy;
use aw_core::test_support::sim_config;
use aw_core::{SimConfig, Ts};
use parking_lot::Mutex;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

/// `Write` sink backed by a shared buffer, so tests can read the event
/// log back after the simulation consumed the `EventLog`.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub struct Fixture {
    pub config: SimConfig,
    pub options: SimOptions,
    job_lines: Vec<String>,
    work_lines: Vec<String>,
}

impl Fixture {
    pub fn new(local: u32, remote: u32) -> Self {
        Self {
            config: sim_config(local, remote),
            options: SimOptions {
                policy: SchedPolicy::Fifo,
                fraction: 1.0,
                end_time: Ts::from_secs(86_400.0),
            },
            job_lines: Vec::new(),
            work_lines: Vec::new(),
        }
    }

    pub fn job(mut self, line: &str) -> Self {
        self.job_lines.push(line.to_string());
        self
    }

    pub fn work(mut self, line: &str) -> Self {
        self.work_lines.push(line.to_string());
        self
    }

    pub fn policy(mut self, policy: SchedPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn fraction(mut self, fraction: f64) -> Self {
        self.options.fraction = fraction;
        self
    }

    /// Load traces, build the simulation, run it, and return the
    /// summary plus the captured event log.
    pub fn run(self) -> (SimSummary, SharedBuf) {
        let dir = TempDir::new().unwrap();
        let work_path = dir.path().join("works.trace");
        write_lines(&work_path, &self.work_lines);
        let job_path = (!self.job_lines.is_empty()).then(|| {
            let p = dir.path().join("jobs.trace");
            write_lines(&p, &self.job_lines);
            p
        });

        let traces =
            aw_trace::load(&work_path, job_path.as_deref(), &self.config.pipeline()).unwrap();

        let buf = SharedBuf::default();
        let log = EventLog::with_sink(Box::new(buf.clone()));
        let sim = Simulation::build(&self.config, traces, log, self.options);
        let summary = sim.run().unwrap();
        (summary, buf)
    }
}

fn write_lines(path: &std::path::Path, lines: &[String]) {
    let mut f = File::create(path).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

/// Tags of `lines` restricted to one LP type, in log order.
pub fn tags_for(lines: &[String], lp_type: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| {
            let mut parts = l.splitn(5, ';');
            let (_ts, ty, _id, tag) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
            (ty == lp_type).then(|| tag.to_string())
        })
        .collect()
}

/// Index of the first line whose LP type, tag, and field substring all
/// match; panics when absent.
pub fn find_line(lines: &[String], lp_type: &str, tag: &str, needle: &str) -> usize {
    lines
        .iter()
        .position(|l| {
            let mut parts = l.splitn(5, ';');
            let _ts = parts.next();
            let ty = parts.next().unwrap_or_default();
            let _id = parts.next();
            let t = parts.next().unwrap_or_default();
            let fields = parts.next().unwrap_or_default();
            ty == lp_type && t == tag && fields.contains(needle)
        })
        .unwrap_or_else(|| panic!("no {lp_type} {tag} line containing {needle:?}"))
}

/// Timestamp (seconds) of the line at `idx`.
pub fn ts_of(lines: &[String], idx: usize) -> f64 {
    lines[idx]
        .split(';')
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or_else(|| panic!("bad timestamp in {:?}", lines[idx]))
}
