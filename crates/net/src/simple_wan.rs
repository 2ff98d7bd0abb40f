// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point-to-point transfers: delay = latency + size/bandwidth.

use aw_core::config::{NetParams, NetworkConfig};
use aw_core::{LpId, Message, Ts};
use aw_kernel::{EventCtx, KernelError};

/// Which parameter set a transfer crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// Worker and store in the same domain.
    Lan,
    /// The router ↔ store long-haul link.
    Wan,
}

aw_core::simple_display! {
    LinkClass {
        Lan => "lan",
        Wan => "wan",
    }
}

/// The only network model the simulator supports.
///
/// Delivers a payload to the destination LP after
/// `latency + size/bandwidth (+ extra delay)`. Config validation
/// guarantees the latency alone clears the kernel lookahead, so a
/// transfer can never violate causal safety.
#[derive(Debug, Clone)]
pub struct SimpleWan {
    lan: NetParams,
    wan: NetParams,
}

impl SimpleWan {
    pub fn new(cfg: &NetworkConfig) -> Self {
        Self { lan: cfg.lan, wan: cfg.wan }
    }

    fn params(&self, link: LinkClass) -> NetParams {
        match link {
            LinkClass::Lan => self.lan,
            LinkClass::Wan => self.wan,
        }
    }

    /// Simulated wire time for `size_bytes` over `link`.
    pub fn transfer_time(&self, link: LinkClass, size_bytes: u64, extra_delay: Ts) -> Ts {
        let p = self.params(link);
        // bandwidth is megabits/s: bytes * 8 bits / (mbps * 1e6) seconds.
        let wire_ns = (size_bytes as f64) * 8.0 * 1e3 / p.bandwidth_mbps;
        p.latency() + Ts::from_ns(wire_ns) + extra_delay
    }

    /// Ship `msg` to `dest`, arriving after the simulated transfer time.
    ///
    /// Returns the delivery offset so callers can account link time.
    pub fn send(
        &self,
        ctx: &mut EventCtx<'_>,
        link: LinkClass,
        label: &str,
        dest: LpId,
        size_bytes: u64,
        extra_delay: Ts,
        msg: Message,
    ) -> Result<Ts, KernelError> {
        let delay = self.transfer_time(link, size_bytes, extra_delay);
        tracing::trace!(
            label,
            %link,
            src = %ctx.lp(),
            %dest,
            size_bytes,
            delay_s = delay.secs(),
            "net send"
        );
        ctx.schedule(dest, delay, msg)?;
        Ok(delay)
    }
}

#[cfg(test)]
#[path = "simple_wan_tests.rs"]
mod tests;
