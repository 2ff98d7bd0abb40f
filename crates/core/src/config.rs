// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation configuration: network model, worker placement, pipeline.

use crate::pipeline::{Pipeline, DEFAULT_NUM_STAGES};
use crate::time::{Ts, LOOKAHEAD};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The simulator models exactly one point-to-point network.
    #[error("unsupported network model {0:?}: only \"simple-wan\" is available")]
    UnsupportedNetwork(String),

    #[error("at least one worker is required")]
    NoWorkers,

    #[error("{link} latency {latency_us}us is below the kernel lookahead ({}us)", LOOKAHEAD.ns() / 1e3)]
    LatencyBelowLookahead { link: &'static str, latency_us: f64 },

    #[error("{link} bandwidth must be positive")]
    BadBandwidth { link: &'static str },

    #[error("pipeline edge [{i}, {j}] out of range for {num_stages} stages")]
    BadPipelineEdge { i: usize, j: usize, num_stages: usize },
}

/// Parameters of one point-to-point link class.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NetParams {
    pub bandwidth_mbps: f64,
    pub latency_us: f64,
}

impl NetParams {
    pub fn latency(&self) -> Ts {
        Ts::from_ns(self.latency_us * 1e3)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub model: String,
    pub lan: NetParams,
    pub wan: NetParams,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    pub local: u32,
    #[serde(default)]
    pub remote: u32,
    /// Task index remote workers are exclusively eligible for.
    #[serde(default = "default_affinity_stage")]
    pub affinity_stage: usize,
}

fn default_affinity_stage() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_num_stages")]
    pub num_stages: usize,
    /// `[i, j]` pairs: stage `i` depends on stage `j`.
    #[serde(default)]
    pub edges: Vec<[usize; 2]>,
}

fn default_num_stages() -> usize {
    DEFAULT_NUM_STAGES
}

/// Top-level simulation configuration (the `--codes-config` file).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub network: NetworkConfig,
    pub workers: WorkerConfig,
    #[serde(default)]
    pub pipeline: Option<PipelineConfig>,
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let cfg: SimConfig = toml::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.model != "simple-wan" {
            return Err(ConfigError::UnsupportedNetwork(self.network.model.clone()));
        }
        if self.workers.local + self.workers.remote == 0 {
            return Err(ConfigError::NoWorkers);
        }
        for (link, params) in [("lan", self.network.lan), ("wan", self.network.wan)] {
            if params.latency() < LOOKAHEAD {
                return Err(ConfigError::LatencyBelowLookahead {
                    link,
                    latency_us: params.latency_us,
                });
            }
            if params.bandwidth_mbps <= 0.0 {
                return Err(ConfigError::BadBandwidth { link });
            }
        }
        if let Some(p) = &self.pipeline {
            for &[i, j] in &p.edges {
                if i >= p.num_stages || j >= p.num_stages || i == j {
                    return Err(ConfigError::BadPipelineEdge { i, j, num_stages: p.num_stages });
                }
            }
        }
        Ok(())
    }

    /// The pipeline stamped onto every job; MG-RAST when not overridden.
    pub fn pipeline(&self) -> Pipeline {
        match &self.pipeline {
            Some(p) => Pipeline::from_edges(
                p.num_stages,
                p.edges.iter().map(|&[i, j]| (i, j)).collect(),
            ),
            None => Pipeline::mgrast(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
