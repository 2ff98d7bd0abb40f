// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The end-to-end scheduling scenarios, through the real binary.

use super::common::{find_line, tags_for, ts_of, Scenario};

#[test]
fn single_workunit_full_event_sequence() {
    let lines = Scenario::new(1, 0)
        .job("jobid=A;queued=100;num_tasks=1")
        .work("workid=A_0_0;cmd=noop;runtime=10;size_infile=0;size_outfile=0;time_data_in=0;time_data_out=0")
        .run();

    assert_eq!(
        tags_for(&lines, "awe_server"),
        vec!["JQ", "TQ", "WQ", "WC", "WD", "TD", "JD"]
    );
    assert_eq!(
        tags_for(&lines, "awe_client"),
        vec!["WC", "FI", "FD", "WS", "WD", "FO", "FU"]
    );

    // Roughly ten simulated seconds of compute between WS and the
    // worker's WD.
    let ws = ts_of(&lines, find_line(&lines, "awe_client", "WS", "workid=A_0_0"));
    let wd = ts_of(&lines, find_line(&lines, "awe_client", "WD", "workid=A_0_0"));
    assert!((wd - ws - 10.0).abs() < 1e-6, "compute took {}", wd - ws);
}

#[test]
fn dependency_holds_back_the_second_task() {
    let lines = Scenario::new(2, 0)
        .job("jobid=B;queued=100;num_tasks=2")
        .work("workid=B_0_0;cmd=noop;runtime=5")
        .work("workid=B_1_0;cmd=noop;runtime=5")
        .run();

    let b0_done = find_line(&lines, "awe_server", "WD", "workid=B_0_0");
    let b1_out = find_line(&lines, "awe_server", "WC", "work=B_1_0");
    assert!(
        b0_done < b1_out,
        "B_1_0 dispatched before B_0_0 completed (lines {b0_done} vs {b1_out})"
    );
}

#[test]
fn remote_workers_receive_only_stage_five() {
    let mut scenario = Scenario::new(5, 5).job("jobid=C;queued=100;num_tasks=10");
    for task in 0..10 {
        scenario = scenario.work(&format!("workid=C_{task}_0;cmd=noop;runtime=1"));
    }
    let lines = scenario.run();

    // Workers 3-7 are local, 8-12 remote.
    for line in lines.iter().filter(|l| l.contains(";awe_server;") && l.contains(";WC;")) {
        let client: usize = line
            .rsplit("client=")
            .next()
            .and_then(|c| c.parse().ok())
            .unwrap_or_else(|| panic!("bad WC line: {line}"));
        if client >= 8 {
            assert!(line.contains("work=C_5_0"), "remote worker got: {line}");
        }
    }
}

#[test]
fn fraction_halves_the_inter_arrival_gap() {
    let lines = Scenario::new(1, 0)
        .job("jobid=A;queued=1000000000;num_tasks=1")
        .job("jobid=B;queued=1000000100;num_tasks=1")
        .work("workid=A_0_0;cmd=noop;runtime=1")
        .work("workid=B_0_0;cmd=noop;runtime=1")
        .arg("--fraction=50")
        .run();

    let a = ts_of(&lines, find_line(&lines, "awe_server", "JQ", "jobid=A"));
    let b = ts_of(&lines, find_line(&lines, "awe_server", "JQ", "jobid=B"));
    assert!((b - a - 50.0).abs() < 1e-6, "gap was {}", b - a);
}

#[test]
fn three_way_split_finishes_the_task_once() {
    let lines = Scenario::new(3, 0)
        .job("jobid=D;queued=100;num_tasks=1")
        .work("workid=D_0_0;cmd=noop;runtime=5")
        .work("workid=D_0_1;cmd=noop;runtime=5")
        .work("workid=D_0_2;cmd=noop;runtime=5")
        .run();

    let server_tags = tags_for(&lines, "awe_server");
    assert_eq!(server_tags.iter().filter(|t| *t == "WD").count(), 3);
    assert_eq!(server_tags.iter().filter(|t| *t == "TD").count(), 1);
    assert_eq!(server_tags.iter().filter(|t| *t == "JD").count(), 1);
    assert_eq!(server_tags.last().map(String::as_str), Some("JD"));
}

#[test]
fn late_arriving_work_is_pushed_to_the_idle_worker() {
    let lines = Scenario::new(1, 0)
        .job("jobid=A;queued=100;num_tasks=1")
        .job("jobid=B;queued=105;num_tasks=1")
        .work("workid=A_0_0;cmd=noop;runtime=1")
        .work("workid=B_0_0;cmd=noop;runtime=1")
        .run();

    let wq = find_line(&lines, "awe_server", "WQ", "work=B_0_0");
    let wc = find_line(&lines, "awe_server", "WC", "work=B_0_0");
    assert_eq!(
        ts_of(&lines, wq),
        ts_of(&lines, wc),
        "the push must happen while handling the enqueue"
    );
    assert!((5.0..5.1).contains(&ts_of(&lines, wc)));
}
