// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The logical-process capability set and kernel error type.

use crate::kernel::EventCtx;
use aw_core::{LpId, Message, Ts};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    /// Scheduling below the lookahead floor is a programming error in
    /// the sending LP and aborts the run.
    #[error("lookahead violation: lp {lp} scheduled at offset {offset}s, floor is {floor}s")]
    LookaheadViolation { lp: LpId, offset: Ts, floor: Ts },

    #[error("negative schedule offset {offset}s from lp {lp}")]
    NegativeOffset { lp: LpId, offset: Ts },

    #[error("event addressed to unregistered lp {dest}")]
    UnknownLp { dest: LpId },

    #[error("kernel already ran")]
    AlreadyRan,

    #[error("lp {lp} fault: {source}")]
    Handler {
        lp: LpId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl KernelError {
    /// Wrap a domain error raised inside an LP handler.
    pub fn handler(
        lp: LpId,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        KernelError::Handler { lp, source: Box::new(source) }
    }
}

/// One logical process.
///
/// Handlers are synchronous and must not block; all waiting is
/// expressed by scheduling a future event through the context.
pub trait LogicalProcess {
    /// Called once before the run starts; typically schedules the LP's
    /// kickoff event. `ctx.now()` is zero and the lookahead floor is
    /// not applied.
    fn init(&mut self, ctx: &mut EventCtx<'_>) -> Result<(), KernelError>;

    /// Process one delivered message. Runs to completion; mutates only
    /// this LP's state plus whatever shared context it was built with.
    fn handle(&mut self, msg: &Message, ctx: &mut EventCtx<'_>) -> Result<(), KernelError>;

    /// Rollback hook for optimistic execution. This kernel is
    /// conservative and never calls it; the default no-op matches.
    fn reverse(&mut self, _msg: &Message) {}

    /// Called exactly once after the event loop drains or hits the
    /// end-time; `now` is the timestamp of the last delivered event.
    fn finalize(&mut self, now: Ts);
}
