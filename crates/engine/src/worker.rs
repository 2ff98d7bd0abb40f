// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker LP: checkout → download → compute → upload → report.

use crate::db::Db;
use crate::error::EngineError;
use crate::event_log::EventLog;
use crate::sim::{SharedReports, WorkerReport};
use aw_core::{
    EventKind, Group, LpId, LpKind, Message, Topology, Ts, WorkId, Workunit, LOOKAHEAD,
};
use aw_kernel::{EventCtx, KernelError, LogicalProcess};
use aw_net::{LinkClass, SimpleWan};
use std::sync::Arc;

pub struct WorkerLp {
    db: Db,
    log: Arc<EventLog>,
    net: SimpleWan,
    group: Group,
    lp: LpId,
    total_processed: u32,
    /// Accumulated seconds, read at finalize.
    compute_time: f64,
    download_time: f64,
    upload_time: f64,
    start_ts: Ts,
    reports: SharedReports,
}

impl WorkerLp {
    pub fn new(
        db: Db,
        log: Arc<EventLog>,
        net: SimpleWan,
        group: Group,
        reports: SharedReports,
    ) -> Self {
        Self {
            db,
            log,
            net,
            group,
            lp: LpId(0),
            total_processed: 0,
            compute_time: 0.0,
            download_time: 0.0,
            upload_time: 0.0,
            start_ts: Ts::ZERO,
            reports,
        }
    }

    fn line(&self, ctx: &EventCtx<'_>, tag: &str, fields: std::fmt::Arguments<'_>) {
        self.log.line(ctx.now(), LpKind::Worker, ctx.lp(), tag, fields);
    }

    fn work(&self, id: &WorkId) -> Result<Workunit, EngineError> {
        self.db
            .with(|db| db.work(id).cloned())
            .ok_or_else(|| EngineError::UnknownWork(id.clone()))
    }

    fn send_checkout(&self, ctx: &mut EventCtx<'_>, offset: Ts) -> Result<(), KernelError> {
        let msg = Message::new(EventKind::WorkCheckout, ctx.lp());
        ctx.schedule(Topology::SERVER, offset, msg)
    }

    /// Checkout reply with a workunit: start fetching input.
    fn work_checkout(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        if !msg.has_object() {
            // Nothing eligible was queued; the server pushes a checkout
            // once a matching workunit enqueues.
            return Ok(());
        }
        let work_id = WorkId::new(&msg.object_id);
        let work = self.work(&work_id).map_err(|e| e.fatal(ctx.lp()))?;
        self.line(ctx, "WC", format_args!("workid={work_id}"));

        self.db.with_mut(|db| {
            if let Some(w) = db.work_mut(&work_id) {
                w.timing.download_start = Some(ctx.now());
            }
        });
        self.line(ctx, "FI", format_args!("workid={work_id};filesize={}", work.size_infile));

        let req = Message::new(EventKind::DnloadReq, ctx.lp())
            .object_id(work_id.as_str())
            .size(work.size_infile)
            .next_hop(Topology::STORE)
            .last_hop(ctx.lp());
        // The request itself is a control message; only the payload
        // coming back crosses the network model.
        let first_hop = match self.group {
            Group::Local => Topology::STORE,
            Group::Remote => Topology::ROUTER,
        };
        ctx.schedule(first_hop, LOOKAHEAD, req)
    }

    /// Input payload arrived: run the command for its recorded runtime.
    fn input_downloaded(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let work_id = WorkId::new(&msg.object_id);
        let work = self.db.with_mut(|db| {
            let w = db.work_mut(&work_id)?;
            w.timing.download_end = Some(ctx.now());
            Some(w.clone())
        });
        let work = work.ok_or_else(|| EngineError::UnknownWork(work_id.clone()).fatal(ctx.lp()))?;

        let moved = work.download_secs().unwrap_or(0.0);
        self.line(
            ctx,
            "FD",
            format_args!(
                "workid={work_id};size_data_in={};time_data_in={:.6};time_data_in_sim={:.6}",
                work.size_infile, work.time_data_in, moved
            ),
        );
        self.download_time += moved;

        // Zero-runtime workunits still advance one lookahead.
        let offset = Ts::from_secs(work.runtime).max(LOOKAHEAD);
        let done = Message::new(EventKind::ComputeDone, ctx.lp()).object_id(work_id.as_str());
        ctx.schedule(ctx.lp(), offset, done)?;
        self.line(ctx, "WS", format_args!("workid={work_id}"));
        Ok(())
    }

    /// Simulated command finished: ship the output back to the store.
    fn compute_done(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let work_id = WorkId::new(&msg.object_id);
        let work = self.work(&work_id).map_err(|e| e.fatal(ctx.lp()))?;
        self.line(
            ctx,
            "WD",
            format_args!("workid={work_id};cmd={};runtime={:.6}", work.cmd, work.runtime),
        );
        self.compute_time += work.runtime;

        self.db.with_mut(|db| {
            if let Some(w) = db.work_mut(&work_id) {
                w.timing.upload_start = Some(ctx.now());
            }
        });
        self.line(ctx, "FO", format_args!("workid={work_id};filesize={}", work.size_outfile));

        let payload = Message::new(EventKind::UploadReq, ctx.lp())
            .object_id(work_id.as_str())
            .size(work.size_outfile)
            .next_hop(Topology::STORE)
            .last_hop(ctx.lp());
        let first_hop = match self.group {
            Group::Local => Topology::STORE,
            Group::Remote => Topology::ROUTER,
        };
        self.net
            .send(ctx, LinkClass::Lan, "upload", first_hop, work.size_outfile, Ts::ZERO, payload)
            .map(|_| ())
    }

    /// Upload acknowledged: report to the server and re-arm.
    fn output_uploaded(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        self.total_processed += 1;
        let work_id = WorkId::new(&msg.object_id);
        let work = self.db.with_mut(|db| {
            let w = db.work_mut(&work_id)?;
            w.timing.upload_end = Some(ctx.now());
            Some(w.clone())
        });
        let work = work.ok_or_else(|| EngineError::UnknownWork(work_id.clone()).fatal(ctx.lp()))?;

        let moved = work.upload_secs().unwrap_or(0.0);
        self.line(
            ctx,
            "FU",
            format_args!(
                "workid={work_id};size_data_out={};time_data_out={:.6};time_data_out_sim={:.6}",
                work.size_outfile, work.time_data_out, moved
            ),
        );
        self.upload_time += moved;

        let done = Message::new(EventKind::WorkDone, ctx.lp()).object_id(work_id.as_str());
        ctx.schedule(Topology::SERVER, LOOKAHEAD, done)?;
        self.send_checkout(ctx, LOOKAHEAD)
    }
}

impl LogicalProcess for WorkerLp {
    fn init(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        self.lp = ctx.lp();
        // Stagger kickoffs so a fleet of workers does not hit the
        // server in one burst of ties.
        let stagger = Ts::from_secs(ctx.lp().0 as f64 / 1000.0);
        ctx.schedule(ctx.lp(), LOOKAHEAD + stagger, Message::new(EventKind::KickOff, ctx.lp()))
    }

    fn handle(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        match msg.kind {
            EventKind::KickOff => self.send_checkout(ctx, LOOKAHEAD),
            EventKind::WorkCheckout => self.work_checkout(msg, ctx),
            EventKind::InputDataDownload => self.input_downloaded(msg, ctx),
            EventKind::ComputeDone => self.compute_done(msg, ctx),
            EventKind::OutputUploaded => self.output_uploaded(msg, ctx),
            other => {
                tracing::warn!(kind = %other, src = %msg.src, "awe_client: unexpected event, dropping");
                Ok(())
            }
        }
    }

    fn finalize(&mut self, now: Ts) {
        let makespan = (now - self.start_ts).secs();
        let busy = self.compute_time + self.download_time + self.upload_time;
        let busy_rate = if makespan > 0.0 { busy / makespan } else { 0.0 };
        tracing::info!(
            group = %self.group,
            processed = self.total_processed,
            compute_s = self.compute_time,
            download_s = self.download_time,
            upload_s = self.upload_time,
            busy_rate,
            "awe_client finalized"
        );
        self.reports.lock().workers.push(WorkerReport {
            lp: self.lp,
            group: self.group,
            processed: self.total_processed,
            compute_s: self.compute_time,
            download_s: self.download_time,
            upload_s: self.upload_time,
            busy_rate,
        });
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
