// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event loop: init, dispatch in timestamp order, finalize.

use crate::lp::{KernelError, LogicalProcess};
use crate::queue::EventQueue;
use aw_core::{LpId, Message, Ts, LOOKAHEAD};

/// Kernel lifecycle, observable for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Running,
    Draining,
    Finalized,
}

aw_core::simple_display! {
    RunState {
        Init => "init",
        Running => "running",
        Draining => "draining",
        Finalized => "finalized",
    }
}

/// Scheduling context handed to LP handlers.
///
/// Newly scheduled events are buffered here and drained into the global
/// queue after the handler returns, so a handler never observes its own
/// output.
pub struct EventCtx<'a> {
    now: Ts,
    lp: LpId,
    /// Minimum allowed offset; zero during init, [`LOOKAHEAD`] during
    /// event dispatch.
    floor: Ts,
    out: &'a mut Vec<(LpId, Ts, Message)>,
}

impl EventCtx<'_> {
    /// Virtual time of the event being dispatched (zero during init).
    pub fn now(&self) -> Ts {
        self.now
    }

    /// The LP this context belongs to.
    pub fn lp(&self) -> LpId {
        self.lp
    }

    /// Enqueue `msg` for `dest` at `now + offset`.
    pub fn schedule(&mut self, dest: LpId, offset: Ts, msg: Message) -> Result<(), KernelError> {
        if offset < Ts::ZERO {
            return Err(KernelError::NegativeOffset { lp: self.lp, offset });
        }
        if offset < self.floor {
            return Err(KernelError::LookaheadViolation {
                lp: self.lp,
                offset,
                floor: self.floor,
            });
        }
        self.out.push((dest, self.now + offset, msg));
        Ok(())
    }
}

/// Sequential conservative kernel: one LP at a time, events delivered
/// in `(timestamp, destination, sequence)` order.
pub struct Kernel {
    lps: Vec<Box<dyn LogicalProcess>>,
    queue: EventQueue,
    lookahead: Ts,
    end_time: Ts,
    state: RunState,
    now: Ts,
    out: Vec<(LpId, Ts, Message)>,
}

impl Kernel {
    pub fn new(end_time: Ts) -> Self {
        Self {
            lps: Vec::new(),
            queue: EventQueue::new(),
            lookahead: LOOKAHEAD,
            end_time,
            state: RunState::Init,
            now: Ts::ZERO,
            out: Vec::new(),
        }
    }

    /// Register an LP; ids are dense and assigned in registration
    /// order, so callers register in topology order.
    pub fn register(&mut self, lp: Box<dyn LogicalProcess>) -> LpId {
        self.lps.push(lp);
        LpId(self.lps.len() - 1)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Timestamp of the most recently delivered event.
    pub fn now(&self) -> Ts {
        self.now
    }

    pub fn num_lps(&self) -> usize {
        self.lps.len()
    }

    /// Run to completion: init every LP, drain the queue (or hit the
    /// end-time), then finalize every LP exactly once.
    pub fn run(&mut self) -> Result<(), KernelError> {
        if self.state != RunState::Init {
            return Err(KernelError::AlreadyRan);
        }

        // Init phase: kickoffs may be scheduled at offset zero.
        for i in 0..self.lps.len() {
            let mut ctx =
                EventCtx { now: Ts::ZERO, lp: LpId(i), floor: Ts::ZERO, out: &mut self.out };
            self.lps[i].init(&mut ctx)?;
            Self::drain(&mut self.queue, &mut self.out);
        }
        self.state = RunState::Running;

        while let Some(ev) = self.queue.pop() {
            if ev.ts > self.end_time {
                tracing::debug!(
                    ts = %ev.ts,
                    end_time = %self.end_time,
                    pending = self.queue.len(),
                    "end time reached, dropping remaining events"
                );
                break;
            }
            if ev.dest.0 >= self.lps.len() {
                return Err(KernelError::UnknownLp { dest: ev.dest });
            }
            // Global (ts, dest, seq) order implies per-LP monotonicity.
            debug_assert!(ev.ts >= self.now);
            self.now = ev.ts;

            let mut ctx = EventCtx {
                now: ev.ts,
                lp: ev.dest,
                floor: self.lookahead,
                out: &mut self.out,
            };
            self.lps[ev.dest.0].handle(&ev.msg, &mut ctx)?;
            Self::drain(&mut self.queue, &mut self.out);
        }
        self.state = RunState::Draining;

        for lp in &mut self.lps {
            lp.finalize(self.now);
        }
        self.state = RunState::Finalized;
        Ok(())
    }

    fn drain(queue: &mut EventQueue, out: &mut Vec<(LpId, Ts, Message)>) {
        for (dest, ts, msg) in out.drain(..) {
            queue.push(ts, dest, msg);
        }
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
