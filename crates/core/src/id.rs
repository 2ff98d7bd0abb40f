// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and workunit identifiers.

use thiserror::Error;

crate::define_str_id! {
    /// Unique identifier for a job, taken verbatim from the job trace.
    pub struct JobId;
}

crate::define_str_id! {
    /// Unique identifier for a workunit: `<jobid>_<task>_<split>`.
    ///
    /// The job id is the segment before the first `_`; job ids therefore
    /// must not contain underscores (trace contract).
    pub struct WorkId;
}

/// Errors raised while decomposing a workunit id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Fewer than three `_`-separated segments. Indicates a trace or
    /// scheduler contract violation, so this aborts the run.
    #[error("invalid workunit id {0:?}: expected <jobid>_<task>_<split>")]
    Malformed(String),

    #[error("invalid workunit id {id:?}: {field} index is not an integer")]
    BadIndex { id: String, field: &'static str },
}

/// The three components of a workunit id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkIdParts {
    pub job_id: JobId,
    pub task_index: usize,
    pub split_index: u32,
}

impl WorkId {
    /// Compose a workunit id from its parts.
    pub fn compose(job_id: &JobId, task_index: usize, split_index: u32) -> Self {
        WorkId::new(format!("{job_id}_{task_index}_{split_index}"))
    }

    /// Decompose into `(job, task, split)`.
    pub fn parse(&self) -> Result<WorkIdParts, IdError> {
        let mut segs = self.as_str().splitn(3, '_');
        let (job, task, split) = match (segs.next(), segs.next(), segs.next()) {
            (Some(j), Some(t), Some(s)) if !j.is_empty() => (j, t, s),
            _ => return Err(IdError::Malformed(self.to_string())),
        };
        let task_index = task.parse::<usize>().map_err(|_| IdError::BadIndex {
            id: self.to_string(),
            field: "task",
        })?;
        let split_index = split.parse::<u32>().map_err(|_| IdError::BadIndex {
            id: self.to_string(),
            field: "split",
        })?;
        Ok(WorkIdParts { job_id: JobId::new(job), task_index, split_index })
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
