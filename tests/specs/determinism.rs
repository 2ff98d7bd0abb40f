// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Same traces, same flags: byte-identical event logs.

use super::common::Scenario;
use similar_asserts::assert_eq;
use std::fs;

fn busy_scenario() -> Scenario {
    let mut scenario = Scenario::new(4, 2)
        .job("jobid=A;queued=1000000000;num_tasks=3")
        .job("jobid=B;queued=1000000060;num_tasks=1");
    for task in 0..3 {
        for split in 0..2 {
            scenario = scenario.work(&format!(
                "workid=A_{task}_{split};cmd=noop;runtime={};size_infile={};size_outfile=64",
                3 + task,
                1000 * (split + 1),
            ));
        }
    }
    scenario.work("workid=B_0_0;cmd=noop;runtime=2;size_infile=500;size_outfile=50")
}

#[test]
fn replays_are_byte_identical() {
    let first = busy_scenario();
    let log_a = first.run_to(first.dir.path().join("a.log"));
    let log_b = first.run_to(first.dir.path().join("b.log"));
    assert_eq!(log_a, log_b);
    assert!(!log_a.is_empty());

    let raw_a = fs::read(first.dir.path().join("a.log")).unwrap();
    let raw_b = fs::read(first.dir.path().join("b.log")).unwrap();
    assert_eq!(raw_a, raw_b);
}
