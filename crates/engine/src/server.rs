// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workload server LP: job submission, dependency resolution,
//! workunit dispatch.

use crate::db::Db;
use crate::error::EngineError;
use crate::event_log::EventLog;
use crate::sim::{ServerReport, SharedReports};
use aw_core::{
    EventKind, Group, JobId, LpId, LpKind, Message, TaskState, Topology, Ts, WorkId, LOOKAHEAD,
};
use aw_kernel::{EventCtx, KernelError, LogicalProcess};
use std::collections::VecDeque;
use std::sync::Arc;

/// How the server picks among affinity-eligible queued workunits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedPolicy {
    /// First eligible from the head of the queue.
    Fifo,
    /// Eligible workunit with the smallest input, minimizing transfer
    /// volume per dispatch.
    DataAwareBestFit,
    /// Eligible workunit with the largest input, front-loading the
    /// biggest transfers.
    DataAwareGreedy,
}

aw_core::simple_display! {
    SchedPolicy {
        Fifo => "fifo",
        DataAwareBestFit => "data-aware-best-fit",
        DataAwareGreedy => "data-aware-greedy",
    }
}

impl SchedPolicy {
    /// Map the `--sched-policy` flag value.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(SchedPolicy::Fifo),
            1 => Some(SchedPolicy::DataAwareBestFit),
            2 => Some(SchedPolicy::DataAwareGreedy),
            _ => None,
        }
    }
}

pub struct ServerLp {
    db: Db,
    log: Arc<EventLog>,
    topo: Arc<Topology>,
    policy: SchedPolicy,
    /// Inter-arrival compression factor in (0, 1].
    fraction: f64,
    /// Workunit ids awaiting an eligible worker, in enqueue order.
    work_queue: VecDeque<WorkId>,
    /// Workers awaiting a workunit, in request order.
    client_req_queue: VecDeque<LpId>,
    total_job: u32,
    total_task: u32,
    total_work: u32,
    start_ts: Ts,
    reports: SharedReports,
}

impl ServerLp {
    pub fn new(
        db: Db,
        log: Arc<EventLog>,
        topo: Arc<Topology>,
        policy: SchedPolicy,
        fraction: f64,
        reports: SharedReports,
    ) -> Self {
        Self {
            db,
            log,
            topo,
            policy,
            fraction,
            work_queue: VecDeque::new(),
            client_req_queue: VecDeque::new(),
            total_job: 0,
            total_task: 0,
            total_work: 0,
            start_ts: Ts::ZERO,
            reports,
        }
    }

    fn line(&self, ctx: &EventCtx<'_>, tag: &str, fields: std::fmt::Arguments<'_>) {
        self.log.line(ctx.now(), LpKind::Server, ctx.lp(), tag, fields);
    }

    /// Seed one `JobSubmit` per job at its compressed arrival time.
    fn kick_off(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let submits: Vec<(JobId, f64)> = self.db.with(|db| {
            db.jobs
                .values()
                .map(|j| (j.id.clone(), db.etime_to_sim(j.created_epoch)))
                .collect()
        });
        tracing::debug!(jobs = submits.len(), fraction = self.fraction, "server kickoff");
        for (job_id, etime) in submits {
            // Compression scales the inter-arrival part only; the
            // lookahead is added after, so the offset never drops
            // below the kernel floor.
            let offset = Ts::from_secs(etime).scale(self.fraction) + LOOKAHEAD;
            let msg = Message::new(EventKind::JobSubmit, ctx.lp()).object_id(job_id.as_str());
            ctx.schedule(Topology::SERVER, offset, msg)?;
        }
        Ok(())
    }

    fn job_submit(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let job_id = JobId::new(&msg.object_id);
        let inputsize = self
            .db
            .with(|db| db.jobs.get(job_id.as_str()).map(|j| j.inputsize))
            .ok_or_else(|| EngineError::UnknownJob(job_id.clone()).fatal(ctx.lp()))?;
        self.line(ctx, "JQ", format_args!("jobid={job_id} inputsize={inputsize}"));
        self.parse_ready_tasks(&job_id, ctx)
    }

    /// Queue every pending task whose dependency row is clear, and
    /// schedule a `WorkEnqueue` for each of its workunits.
    ///
    /// The self-scheduling hop puts workunit dispatch at a distinct
    /// virtual time after the submit/done event that triggered it.
    fn parse_ready_tasks(&mut self, job_id: &JobId, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let ready: Vec<(usize, u32)> = self.db.with_mut(|db| {
            let Some(job) = db.jobs.get_mut(job_id.as_str()) else {
                return Vec::new();
            };
            let mut out = Vec::new();
            for i in 0..job.num_tasks {
                if job.task_state[i] == TaskState::Pending && job.is_ready(i) {
                    job.task_state[i] = TaskState::Queued;
                    out.push((i, job.task_splits[i]));
                }
            }
            out
        });

        for (task, splits) in ready {
            self.line(ctx, "TQ", format_args!("taskid={job_id}_{task} splits={splits}"));
            let work_ids: Vec<WorkId> = self.db.with(|db| {
                db.works
                    .values()
                    .filter(|w| w.job_id == *job_id && w.task_index == task)
                    .map(|w| w.id.clone())
                    .collect()
            });
            for work_id in work_ids {
                let msg =
                    Message::new(EventKind::WorkEnqueue, ctx.lp()).object_id(work_id.as_str());
                ctx.schedule(Topology::SERVER, LOOKAHEAD, msg)?;
            }
        }
        Ok(())
    }

    fn work_enqueue(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let work_id = WorkId::new(&msg.object_id);
        self.line(ctx, "WQ", format_args!("work={work_id}"));

        let task_index = self.work_task_index(&work_id).map_err(|e| e.fatal(ctx.lp()))?;
        let waiting = self
            .client_req_queue
            .iter()
            .position(|&c| self.matches_affinity(c, task_index));
        match waiting {
            Some(i) => {
                if let Some(client) = self.client_req_queue.remove(i) {
                    self.dispatch(work_id, client, ctx)?;
                }
            }
            None => self.work_queue.push_back(work_id),
        }
        Ok(())
    }

    fn work_checkout(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let client = msg.src;
        match self.pick_work(client).map_err(|e| e.fatal(ctx.lp()))? {
            Some(work_id) => self.dispatch(work_id, client, ctx),
            // No eligible workunit: the worker waits for a push.
            None => {
                self.client_req_queue.push_back(client);
                Ok(())
            }
        }
    }

    /// Send a checkout reply and log the match.
    fn dispatch(
        &mut self,
        work_id: WorkId,
        client: LpId,
        ctx: &mut EventCtx<'_>,
    ) -> Result<(), KernelError> {
        self.line(ctx, "WC", format_args!("work={work_id} client={client}"));
        let msg = Message::new(EventKind::WorkCheckout, ctx.lp()).object_id(work_id.as_str());
        ctx.schedule(client, LOOKAHEAD, msg)
    }

    /// Pick a queued workunit for `client` per affinity and policy.
    fn pick_work(&mut self, client: LpId) -> Result<Option<WorkId>, EngineError> {
        if self.work_queue.is_empty() {
            return Ok(None);
        }
        let mut eligible: Vec<(usize, u64)> = Vec::new();
        let mut missing: Option<WorkId> = None;
        self.db.with(|db| {
            for (i, work_id) in self.work_queue.iter().enumerate() {
                let Some(work) = db.work(work_id) else {
                    missing = Some(work_id.clone());
                    return;
                };
                if self.matches_affinity(client, work.task_index) {
                    eligible.push((i, work.size_infile));
                }
            }
        });
        if let Some(work_id) = missing {
            return Err(EngineError::UnknownWork(work_id));
        }

        let chosen = match self.policy {
            SchedPolicy::Fifo => eligible.first().copied(),
            SchedPolicy::DataAwareBestFit => eligible.iter().copied().min_by_key(|&(_, s)| s),
            // First of the equal maxima, for deterministic ties.
            SchedPolicy::DataAwareGreedy => {
                eligible.iter().copied().min_by_key(|&(_, s)| std::cmp::Reverse(s))
            }
        };
        Ok(chosen.and_then(|(i, _)| self.work_queue.remove(i)))
    }

    fn work_done(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let work_id = WorkId::new(&msg.object_id);
        let parts = work_id.parse().map_err(|e| EngineError::from(e).fatal(ctx.lp()))?;
        self.line(ctx, "WD", format_args!("workid={work_id}"));
        self.total_work += 1;

        let task_finished = self
            .db
            .with_mut(|db| -> Result<Option<bool>, EngineError> {
                let job = db
                    .jobs
                    .get_mut(parts.job_id.as_str())
                    .ok_or_else(|| EngineError::UnknownJob(parts.job_id.clone()))?;
                let remain = job
                    .decrement_remain_work(parts.task_index)
                    .ok_or_else(|| EngineError::UnknownWork(work_id.clone()))?;
                if remain == 0 {
                    job.complete_task(parts.task_index);
                    Ok(Some(job.is_done()))
                } else {
                    Ok(None)
                }
            })
            .map_err(|e| e.fatal(ctx.lp()))?;

        if let Some(job_done) = task_finished {
            self.total_task += 1;
            self.line(
                ctx,
                "TD",
                format_args!("taskid={}_{}", parts.job_id, parts.task_index),
            );
            self.parse_ready_tasks(&parts.job_id, ctx)?;
            if job_done {
                self.total_job += 1;
                self.line(ctx, "JD", format_args!("jobid={}", parts.job_id));
            }
        }
        Ok(())
    }

    fn matches_affinity(&self, client: LpId, task_index: usize) -> bool {
        match self.topo.group(client) {
            Some(Group::Remote) => task_index == self.topo.affinity_stage(),
            _ => true,
        }
    }

    fn work_task_index(&self, work_id: &WorkId) -> Result<usize, EngineError> {
        self.db
            .with(|db| db.work(work_id).map(|w| w.task_index))
            .ok_or_else(|| EngineError::UnknownWork(work_id.clone()))
    }
}

impl LogicalProcess for ServerLp {
    fn init(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        ctx.schedule(ctx.lp(), Ts::ZERO, Message::new(EventKind::KickOff, ctx.lp()))
    }

    fn handle(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        match msg.kind {
            EventKind::KickOff => self.kick_off(ctx),
            EventKind::JobSubmit => self.job_submit(msg, ctx),
            EventKind::WorkEnqueue => self.work_enqueue(msg, ctx),
            EventKind::WorkCheckout => self.work_checkout(msg, ctx),
            EventKind::WorkDone => self.work_done(msg, ctx),
            other => {
                tracing::warn!(kind = %other, src = %msg.src, "awe_server: unexpected event, dropping");
                Ok(())
            }
        }
    }

    fn finalize(&mut self, now: Ts) {
        let makespan = (now - self.start_ts).secs();
        tracing::info!(
            start = self.start_ts.secs(),
            end = now.secs(),
            makespan,
            total_job = self.total_job,
            total_task = self.total_task,
            total_workunit = self.total_work,
            "awe_server finalized"
        );
        self.reports.lock().server = Some(ServerReport {
            start_s: self.start_ts.secs(),
            end_s: now.secs(),
            makespan_s: makespan,
            total_jobs: self.total_job,
            total_tasks: self.total_task,
            total_works: self.total_work,
        });
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
