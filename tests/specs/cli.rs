// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exit-code and flag contract of the binary.

use super::common::config_toml;
use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn missing_flag_stderr(output: &std::process::Output, flag: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(&format!("Expected \"{flag}\" option")),
        "stderr was: {stderr}"
    );
}

fn bin() -> Command {
    Command::cargo_bin("awesim").unwrap()
}

#[test]
fn missing_codes_config_exits_one() {
    let output = bin().arg("--worktrace=w.trace").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    missing_flag_stderr(&output, "codes-config");
}

#[test]
fn missing_worktrace_exits_one() {
    let output = bin().arg("--codes-config=sim.toml").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    missing_flag_stderr(&output, "worktrace");
}

#[test]
fn unreadable_trace_exits_one_with_the_path() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sim.toml");
    fs::write(&config, config_toml(1, 0)).unwrap();
    let output = bin()
        .arg(format!("--codes-config={}", config.display()))
        .arg("--worktrace=/nonexistent/works.trace")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/works.trace"), "stderr: {stderr}");
}

#[test]
fn non_simple_wan_config_exits_one() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sim.toml");
    fs::write(&config, config_toml(1, 0).replace("simple-wan", "dragonfly")).unwrap();
    let works = dir.path().join("works.trace");
    fs::write(&works, "workid=A_0_0;runtime=1\n").unwrap();
    let output = bin()
        .arg(format!("--codes-config={}", config.display()))
        .arg(format!("--worktrace={}", works.display()))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simple-wan"), "stderr: {stderr}");
}

#[test]
fn output_defaults_to_awesim_output_log() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sim.toml");
    fs::write(&config, config_toml(1, 0)).unwrap();
    let works = dir.path().join("works.trace");
    fs::write(&works, "workid=A_0_0;queued=100;runtime=1\n").unwrap();

    bin()
        .current_dir(dir.path())
        .arg(format!("--codes-config={}", config.display()))
        .arg(format!("--worktrace={}", works.display()))
        .assert()
        .success();
    assert!(dir.path().join("awesim_output.log").exists());
}

#[test]
fn summary_goes_to_stdout() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("sim.toml");
    fs::write(&config, config_toml(1, 0)).unwrap();
    let works = dir.path().join("works.trace");
    fs::write(&works, "workid=A_0_0;queued=100;runtime=5\n").unwrap();
    let jobs = dir.path().join("jobs.trace");
    fs::write(&jobs, "jobid=A;queued=100;num_tasks=1\n").unwrap();

    let output = bin()
        .arg(format!("--codes-config={}", config.display()))
        .arg(format!("--worktrace={}", works.display()))
        .arg(format!("--jobtrace={}", jobs.display()))
        .arg(format!("--output={}", dir.path().join("out.log").display()))
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("total_workunit=1"), "stdout: {stdout}");
    assert!(stdout.contains("worker=3;group=local;processed=1"), "stdout: {stdout}");
}
