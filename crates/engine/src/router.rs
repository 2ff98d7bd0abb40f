// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WAN router LP: forwards transfer requests and payloads between
//! remote workers and the store, preserving the hop chain.

use crate::sim::{RouterReport, SharedReports};
use aw_core::{EventKind, Message, Ts, LOOKAHEAD};
use aw_kernel::{EventCtx, KernelError, LogicalProcess};
use aw_net::{LinkClass, SimpleWan};

/// Stateless between events apart from byte counters.
pub struct RouterLp {
    net: SimpleWan,
    size_download: u64,
    size_upload: u64,
    reports: SharedReports,
}

impl RouterLp {
    pub fn new(net: SimpleWan, reports: SharedReports) -> Self {
        Self { net, size_download: 0, size_upload: 0, reports }
    }

    /// Control request from a remote worker: pass it on toward the
    /// store, recording the worker as the hop to ack back to.
    fn forward_download_req(
        &mut self,
        msg: &Message,
        ctx: &mut EventCtx<'_>,
    ) -> Result<(), KernelError> {
        let fwd = Message::new(EventKind::DnloadReq, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.next_hop)
            .last_hop(msg.src);
        ctx.schedule(msg.next_hop, LOOKAHEAD, fwd)
    }

    /// Input payload from the store: final hop, deliver it to the
    /// worker as an arrival event over the local link.
    fn forward_download_payload(
        &mut self,
        msg: &Message,
        ctx: &mut EventCtx<'_>,
    ) -> Result<(), KernelError> {
        self.size_download += msg.size;
        let payload = Message::new(EventKind::InputDataDownload, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.next_hop)
            .last_hop(ctx.lp());
        self.net
            .send(ctx, LinkClass::Lan, "download", msg.next_hop, msg.size, Ts::ZERO, payload)
            .map(|_| ())
    }

    /// Output payload from a remote worker: carry it over the WAN to
    /// the store, keeping the worker in `last_hop` for the ack.
    fn forward_upload_payload(
        &mut self,
        msg: &Message,
        ctx: &mut EventCtx<'_>,
    ) -> Result<(), KernelError> {
        self.size_upload += msg.size;
        let payload = Message::new(EventKind::UploadReq, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.next_hop)
            .last_hop(msg.last_hop);
        self.net
            .send(ctx, LinkClass::Wan, "upload", msg.next_hop, msg.size, Ts::ZERO, payload)
            .map(|_| ())
    }

    /// Upload ack from the store: final hop, convert to the worker's
    /// arrival event.
    fn forward_upload_ack(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        let ack = Message::new(EventKind::OutputUploaded, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.next_hop)
            .last_hop(ctx.lp());
        ctx.schedule(msg.next_hop, LOOKAHEAD, ack)
    }
}

impl LogicalProcess for RouterLp {
    fn init(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        ctx.schedule(ctx.lp(), Ts::ZERO, Message::new(EventKind::KickOff, ctx.lp()))
    }

    fn handle(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        match msg.kind {
            EventKind::KickOff => {
                tracing::debug!(lp = %ctx.lp(), "shock_router serving");
                Ok(())
            }
            EventKind::DnloadReq => self.forward_download_req(msg, ctx),
            EventKind::DnloadAck => self.forward_download_payload(msg, ctx),
            EventKind::UploadReq | EventKind::OutputDataUpload => {
                self.forward_upload_payload(msg, ctx)
            }
            EventKind::UploadAck => self.forward_upload_ack(msg, ctx),
            other => {
                tracing::warn!(kind = %other, src = %msg.src, "shock_router: unexpected event, dropping");
                Ok(())
            }
        }
    }

    fn finalize(&mut self, now: Ts) {
        tracing::info!(
            end = now.secs(),
            download_bytes = self.size_download,
            upload_bytes = self.size_upload,
            "shock_router finalized"
        );
        self.reports.lock().router = Some(RouterReport {
            download_bytes: self.size_download,
            upload_bytes: self.size_upload,
        });
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
