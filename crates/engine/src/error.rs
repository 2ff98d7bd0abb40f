// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types.

use aw_core::{IdError, JobId, LpId, WorkId};
use aw_kernel::KernelError;
use thiserror::Error;

/// Faults raised inside LP handlers. All of these indicate a broken
/// trace/scheduler contract and abort the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown job {0}")]
    UnknownJob(JobId),

    #[error("unknown workunit {0}")]
    UnknownWork(WorkId),

    #[error(transparent)]
    Id(#[from] IdError),
}

impl EngineError {
    /// Wrap into the kernel's handler-fault error, naming the LP.
    pub fn fatal(self, lp: LpId) -> KernelError {
        KernelError::handler(lp, self)
    }
}

/// Errors surfaced by a full simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("failed to write event log: {0}")]
    Log(#[from] std::io::Error),
}
