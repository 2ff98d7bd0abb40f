// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Harness: temp traces + config, one binary invocation, parsed log.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn config_toml(local: u32, remote: u32) -> String {
    format!(
        r#"
[network]
model = "simple-wan"

[network.lan]
bandwidth_mbps = 1000.0
latency_us = 1000.0

[network.wan]
bandwidth_mbps = 100.0
latency_us = 10000.0

[workers]
local = {local}
remote = {remote}
affinity_stage = 5
"#
    )
}

pub struct Scenario {
    pub dir: TempDir,
    pub local: u32,
    pub remote: u32,
    pub job_lines: Vec<String>,
    pub work_lines: Vec<String>,
    pub extra_args: Vec<String>,
}

impl Scenario {
    pub fn new(local: u32, remote: u32) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            local,
            remote,
            job_lines: Vec::new(),
            work_lines: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    pub fn job(mut self, line: &str) -> Self {
        self.job_lines.push(line.to_string());
        self
    }

    pub fn work(mut self, line: &str) -> Self {
        self.work_lines.push(line.to_string());
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.extra_args.push(arg.to_string());
        self
    }

    /// Run the binary; returns the event log lines. Panics on nonzero
    /// exit.
    pub fn run(&self) -> Vec<String> {
        self.run_to(self.dir.path().join("out.log"))
    }

    pub fn run_to(&self, output: std::path::PathBuf) -> Vec<String> {
        let config = self.dir.path().join("sim.toml");
        fs::write(&config, config_toml(self.local, self.remote)).unwrap();
        let worktrace = self.dir.path().join("works.trace");
        fs::write(&worktrace, self.work_lines.join("\n") + "\n").unwrap();
        let jobtrace = self.dir.path().join("jobs.trace");
        fs::write(&jobtrace, self.job_lines.join("\n") + "\n").unwrap();

        let mut cmd = Command::cargo_bin("awesim").unwrap();
        cmd.arg(format!("--codes-config={}", config.display()))
            .arg(format!("--worktrace={}", worktrace.display()))
            .arg(format!("--jobtrace={}", jobtrace.display()))
            .arg(format!("--output={}", output.display()));
        for extra in &self.extra_args {
            cmd.arg(extra);
        }
        cmd.assert().success();

        read_log(&output)
    }
}

pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Tags of `lines` restricted to one LP type, in log order.
pub fn tags_for(lines: &[String], lp_type: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| {
            let mut parts = l.splitn(5, ';');
            let (_ts, ty, _id, tag) =
                (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
            (ty == lp_type).then(|| tag.to_string())
        })
        .collect()
}

pub fn find_line(lines: &[String], lp_type: &str, tag: &str, needle: &str) -> usize {
    lines
        .iter()
        .position(|l| {
            let mut parts = l.splitn(5, ';');
            let _ts = parts.next();
            let ty = parts.next().unwrap_or_default();
            let _id = parts.next();
            let t = parts.next().unwrap_or_default();
            let fields = parts.next().unwrap_or_default();
            ty == lp_type && t == tag && fields.contains(needle)
        })
        .unwrap_or_else(|| panic!("no {lp_type} {tag} line containing {needle:?}"))
}

pub fn ts_of(lines: &[String], idx: usize) -> f64 {
    lines[idx].split(';').next().unwrap().parse().unwrap()
}
