// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The object store LP ("shock"): serves input payloads, absorbs
//! output payloads.

use crate::sim::{SharedReports, StoreReport};
use aw_core::{EventKind, Message, Ts, LOOKAHEAD};
use aw_kernel::{EventCtx, KernelError, LogicalProcess};
use aw_net::{LinkClass, SimpleWan};

pub struct StoreLp {
    net: SimpleWan,
    size_download: u64,
    size_upload: u64,
    reports: SharedReports,
}

impl StoreLp {
    pub fn new(net: SimpleWan, reports: SharedReports) -> Self {
        Self { net, size_download: 0, size_upload: 0, reports }
    }

    /// A request that came straight from the worker acks straight
    /// back; one that came through the router acks through it.
    fn is_direct(msg: &Message) -> bool {
        msg.src == msg.last_hop
    }

    /// Ship the requested input payload back toward the worker.
    fn download_req(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        self.size_download += msg.size;
        let (kind, link) = if Self::is_direct(msg) {
            (EventKind::InputDataDownload, LinkClass::Lan)
        } else {
            (EventKind::DnloadAck, LinkClass::Wan)
        };
        let payload = Message::new(kind, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.last_hop)
            .last_hop(ctx.lp());
        self.net
            .send(ctx, link, "download", msg.src, msg.size, Ts::ZERO, payload)
            .map(|_| ())
    }

    /// Output payload landed: count it and ack with a control event.
    fn upload_req(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        self.size_upload += msg.size;
        let kind = if Self::is_direct(msg) {
            EventKind::OutputUploaded
        } else {
            EventKind::UploadAck
        };
        let ack = Message::new(kind, ctx.lp())
            .object_id(msg.object_id.clone())
            .size(msg.size)
            .next_hop(msg.last_hop)
            .last_hop(ctx.lp());
        ctx.schedule(msg.src, LOOKAHEAD, ack)
    }
}

impl LogicalProcess for StoreLp {
    fn init(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        ctx.schedule(ctx.lp(), Ts::ZERO, Message::new(EventKind::KickOff, ctx.lp()))
    }

    fn handle(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError> {
        match msg.kind {
            EventKind::KickOff => {
                tracing::debug!(lp = %ctx.lp(), "shock serving");
                Ok(())
            }
            EventKind::DnloadReq => self.download_req(msg, ctx),
            EventKind::UploadReq | EventKind::OutputDataUpload => self.upload_req(msg, ctx),
            other => {
                tracing::warn!(kind = %other, src = %msg.src, "shock: unexpected event, dropping");
                Ok(())
            }
        }
    }

    fn finalize(&mut self, now: Ts) {
        tracing::info!(
            end = now.secs(),
            download_bytes = self.size_download,
            upload_bytes = self.size_upload,
            "shock finalized"
        );
        self.reports.lock().store = Some(StoreReport {
            download_bytes: self.size_download,
            upload_bytes: self.size_upload,
        });
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
