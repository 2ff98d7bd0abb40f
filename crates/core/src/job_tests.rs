// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::JobId;
use crate::pipeline::Pipeline;

fn chain_job(num_tasks: usize) -> Job {
    Job::new(JobId::new("j"), 100.0, num_tasks, &Pipeline::mgrast())
}

#[test]
fn only_the_first_chain_task_starts_ready() {
    let job = chain_job(3);
    assert!(job.is_ready(0));
    assert!(!job.is_ready(1));
    assert!(!job.is_ready(2));
    assert!(job.depends_on(1, 0));
}

#[test]
fn completing_a_task_unblocks_its_dependents() {
    let mut job = chain_job(3);
    job.complete_task(0);
    assert!(job.is_ready(1));
    assert!(!job.is_ready(2));
    assert_eq!(job.task_state[0], TaskState::Completed);
    assert_eq!(job.remain_tasks, 2);
}

#[test]
fn add_workunit_accumulates_splits_and_input_size() {
    let mut job = chain_job(2);
    assert!(job.add_workunit(0, 100));
    assert!(job.add_workunit(0, 50));
    assert!(job.add_workunit(1, 7));
    assert_eq!(job.task_splits, vec![2, 1]);
    assert_eq!(job.task_remain_work, vec![2, 1]);
    assert_eq!(job.inputsize, 157);
}

#[test]
fn add_workunit_rejects_out_of_range_tasks() {
    let mut job = chain_job(2);
    assert!(!job.add_workunit(2, 1));
    assert_eq!(job.task_splits, vec![0, 0]);
}

#[test]
fn split_fanout_counts_down_to_task_completion() {
    let mut job = chain_job(1);
    for _ in 0..3 {
        job.add_workunit(0, 0);
    }
    assert_eq!(job.decrement_remain_work(0), Some(2));
    assert_eq!(job.decrement_remain_work(0), Some(1));
    assert_eq!(job.decrement_remain_work(0), Some(0));
    job.complete_task(0);
    assert!(job.is_done());
}

#[test]
fn empty_task_detection_drives_pruning() {
    let mut job = chain_job(2);
    job.add_workunit(0, 0);
    assert!(job.has_empty_task());
    job.add_workunit(1, 0);
    assert!(!job.has_empty_task());
}

#[test]
fn decrement_out_of_range_is_none() {
    let mut job = chain_job(1);
    assert_eq!(job.decrement_remain_work(5), None);
}
