// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! LP handles and the explicit placement of LPs for one simulation.

use crate::config::WorkerConfig;

/// Opaque handle addressing a logical process.
///
/// Dense indices assigned by [`Topology`]; the kernel resolves them to
/// registered LPs. No object pointers ever cross LP boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LpId(pub usize);

impl std::fmt::Display for LpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four LP types of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpKind {
    Server,
    Store,
    Router,
    Worker,
}

crate::simple_display! {
    LpKind {
        Server => "awe_server",
        Store => "shock",
        Router => "shock_router",
        Worker => "awe_client",
    }
}

/// Network domain a worker belongs to.
///
/// Group membership is assigned here, from configuration, never derived
/// from an LP-id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// Same domain as the object store; talks to it directly.
    Local,
    /// Behind the WAN router; only eligible for the affinity stage.
    Remote,
}

crate::simple_display! {
    Group {
        Local => "local",
        Remote => "remote",
    }
}

/// LP placement for one simulation run.
///
/// Layout: server, store, router, then all workers (local first).
#[derive(Debug, Clone)]
pub struct Topology {
    workers: Vec<Group>,
    affinity_stage: usize,
}

impl Topology {
    pub const SERVER: LpId = LpId(0);
    pub const STORE: LpId = LpId(1);
    pub const ROUTER: LpId = LpId(2);
    const FIRST_WORKER: usize = 3;

    pub fn from_config(cfg: &WorkerConfig) -> Self {
        let mut workers = Vec::with_capacity((cfg.local + cfg.remote) as usize);
        workers.extend(std::iter::repeat(Group::Local).take(cfg.local as usize));
        workers.extend(std::iter::repeat(Group::Remote).take(cfg.remote as usize));
        Self { workers, affinity_stage: cfg.affinity_stage }
    }

    /// Total number of LPs, including server, store, and router.
    pub fn num_lps(&self) -> usize {
        Self::FIRST_WORKER + self.workers.len()
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Task index remote-group workers are exclusively eligible for.
    pub fn affinity_stage(&self) -> usize {
        self.affinity_stage
    }

    /// All worker LPs with their group, in LP-id order.
    pub fn workers(&self) -> impl Iterator<Item = (LpId, Group)> + '_ {
        self.workers
            .iter()
            .enumerate()
            .map(|(i, g)| (LpId(Self::FIRST_WORKER + i), *g))
    }

    pub fn kind(&self, lp: LpId) -> Option<LpKind> {
        match lp.0 {
            0 => Some(LpKind::Server),
            1 => Some(LpKind::Store),
            2 => Some(LpKind::Router),
            n if n < self.num_lps() => Some(LpKind::Worker),
            _ => None,
        }
    }

    /// Group of a worker LP; `None` for non-worker LPs.
    pub fn group(&self, lp: LpId) -> Option<Group> {
        self.workers.get(lp.0.checked_sub(Self::FIRST_WORKER)?).copied()
    }
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod tests;
