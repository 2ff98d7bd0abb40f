// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trace loading: jobs first, then workunits, then pruning.

use crate::line::KvLine;
use aw_core::{IdError, Job, JobId, Pipeline, WorkId, WorkTiming, Workunit};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fallback task count when the job trace omits `num_tasks`.
const DEFAULT_NUM_TASKS: usize = 10;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("cannot read trace file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A workunit id that does not decompose is a trace/scheduler
    /// contract violation and aborts the load.
    #[error(transparent)]
    InvalidWorkId(#[from] IdError),
}

/// Everything the simulation needs from the traces: the job and
/// workunit tables (insertion order preserved) and the epoch that maps
/// to virtual time zero.
#[derive(Debug)]
pub struct TraceSet {
    pub jobs: IndexMap<JobId, Job>,
    pub works: IndexMap<WorkId, Workunit>,
    /// Minimum `queued` epoch across surviving jobs; zero of simulated
    /// time.
    pub kickoff_epoch: f64,
}

impl TraceSet {
    /// Seconds between `epoch` and the kickoff epoch.
    pub fn etime_to_sim(&self, epoch: f64) -> f64 {
        epoch - self.kickoff_epoch
    }

    pub fn total_workunits(&self) -> usize {
        self.works.len()
    }
}

/// Load and cross-link the traces.
///
/// Without a job trace, jobs are synthesized from the workunit ids
/// (one job per distinct prefix, `created` from the optional `queued`
/// key, `num_tasks` from the highest task index seen).
pub fn load(
    worktrace: &Path,
    jobtrace: Option<&Path>,
    pipeline: &Pipeline,
) -> Result<TraceSet, TraceError> {
    let raw_works = parse_worktrace(worktrace)?;
    let mut jobs = match jobtrace {
        Some(path) => parse_jobtrace(path, pipeline)?,
        None => synthesize_jobs(&raw_works, pipeline),
    };

    let mut works: IndexMap<WorkId, Workunit> = IndexMap::with_capacity(raw_works.len());
    for work in raw_works {
        if works.contains_key(&work.id) {
            tracing::warn!(workid = %work.id, "duplicate workunit id, keeping the first");
            continue;
        }
        let Some(job) = jobs.get_mut(work.job_id.as_str()) else {
            tracing::warn!(workid = %work.id, "workunit references unknown job, skipping");
            continue;
        };
        if !job.add_workunit(work.task_index, work.size_infile) {
            tracing::warn!(
                workid = %work.id,
                num_tasks = job.num_tasks,
                "workunit task index out of range, skipping"
            );
            continue;
        }
        works.insert(work.id.clone(), work);
    }

    jobs.retain(|_, job| {
        let keep = !job.has_empty_task();
        if !keep {
            tracing::debug!(jobid = %job.id, "pruning job with workunit-less tasks");
        }
        keep
    });

    let kickoff_epoch = jobs
        .values()
        .map(|j| j.created_epoch)
        .fold(f64::INFINITY, f64::min);
    let kickoff_epoch = if kickoff_epoch.is_finite() { kickoff_epoch } else { 0.0 };

    tracing::info!(
        jobs = jobs.len(),
        workunits = works.len(),
        kickoff_epoch,
        "trace load complete"
    );

    Ok(TraceSet { jobs, works, kickoff_epoch })
}

fn read_lines(path: &Path) -> Result<Vec<String>, TraceError> {
    let io_err = |source| TraceError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_err)?;
    BufReader::new(file).lines().collect::<Result<_, _>>().map_err(io_err)
}

fn parse_jobtrace(path: &Path, pipeline: &Pipeline) -> Result<IndexMap<JobId, Job>, TraceError> {
    let mut jobs = IndexMap::new();
    for raw in read_lines(path)? {
        let line = KvLine::parse(&raw);
        if line.is_empty() {
            continue;
        }
        let Some(jobid) = line.get("jobid") else {
            tracing::warn!(line = raw.trim(), "job line without jobid, skipping");
            continue;
        };
        let id = JobId::new(jobid);
        if jobs.contains_key(&id) {
            tracing::warn!(jobid, "duplicate job id, keeping the first");
            continue;
        }
        let mut num_tasks = line.usize_or_zero("num_tasks");
        if num_tasks == 0 {
            num_tasks = DEFAULT_NUM_TASKS;
        }
        let created = line.f64_or_zero("queued");
        jobs.insert(id.clone(), Job::new(id, created, num_tasks, pipeline));
    }
    Ok(jobs)
}

fn parse_worktrace(path: &Path) -> Result<Vec<Workunit>, TraceError> {
    let mut works = Vec::new();
    for raw in read_lines(path)? {
        let line = KvLine::parse(&raw);
        if line.is_empty() {
            continue;
        }
        let Some(workid) = line.get("workid") else {
            tracing::warn!(line = raw.trim(), "workunit line without workid, skipping");
            continue;
        };
        let id = WorkId::new(workid);
        let parts = id.parse()?;
        works.push(Workunit {
            id,
            job_id: parts.job_id,
            task_index: parts.task_index,
            cmd: line.get("cmd").unwrap_or_default().to_string(),
            runtime: line.f64_or_zero("runtime"),
            size_infile: line.u64_or_zero("size_infile"),
            size_outfile: line.u64_or_zero("size_outfile"),
            time_data_in: line.f64_or_zero("time_data_in"),
            time_data_out: line.f64_or_zero("time_data_out"),
            created_epoch: line.f64_or_zero("queued"),
            timing: WorkTiming::default(),
        });
    }
    Ok(works)
}

/// Jobs for a workunit-only trace: one per distinct job prefix.
fn synthesize_jobs(works: &[Workunit], pipeline: &Pipeline) -> IndexMap<JobId, Job> {
    let mut extents: IndexMap<JobId, (usize, f64)> = IndexMap::new();
    for work in works {
        let entry = extents.entry(work.job_id.clone()).or_insert((0, f64::INFINITY));
        entry.0 = entry.0.max(work.task_index + 1);
        if work.created_epoch > 0.0 {
            entry.1 = entry.1.min(work.created_epoch);
        }
    }
    extents
        .into_iter()
        .map(|(id, (num_tasks, created))| {
            let created = if created.is_finite() { created } else { 0.0 };
            (id.clone(), Job::new(id, created, num_tasks, pipeline))
        })
        .collect()
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
