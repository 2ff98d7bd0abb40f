// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow pipelines: the stage-dependency structure stamped onto jobs.

/// Number of stages in the default MG-RAST pipeline.
pub const DEFAULT_NUM_STAGES: usize = 10;

/// A named stage-dependency structure.
///
/// `edges` holds `(i, j)` pairs meaning stage `i` depends on stage `j`.
/// A job materializes this as a dense matrix sized to its own
/// `num_tasks`; edges referring to stages a job does not have are
/// dropped for that job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    num_stages: usize,
    edges: Vec<(usize, usize)>,
}

impl Pipeline {
    /// The MG-RAST metagenomics pipeline: ten stages in a strict chain.
    pub fn mgrast() -> Self {
        let edges = (1..DEFAULT_NUM_STAGES).map(|i| (i, i - 1)).collect();
        Self { num_stages: DEFAULT_NUM_STAGES, edges }
    }

    /// Build a pipeline from explicit edges. Callers validate ranges
    /// (see `SimConfig::validate`).
    pub fn from_edges(num_stages: usize, edges: Vec<(usize, usize)>) -> Self {
        Self { num_stages, edges }
    }

    pub fn num_stages(&self) -> usize {
        self.num_stages
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Materialize the dependency matrix for a job with `num_tasks`
    /// tasks. Row `i` holds the stages task `i` still waits on.
    pub fn dep_matrix(&self, num_tasks: usize) -> Vec<Vec<u8>> {
        let mut dep = vec![vec![0u8; num_tasks]; num_tasks];
        for &(i, j) in &self.edges {
            if i < num_tasks && j < num_tasks {
                dep[i][j] = 1;
            }
        }
        dep
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::mgrast()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
