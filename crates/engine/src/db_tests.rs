// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aw_core::test_support::{job, workunit};
use aw_core::Ts;
use aw_trace::TraceSet;
use indexmap::IndexMap;

fn tiny_set() -> TraceSet {
    let mut jobs = IndexMap::new();
    let mut j = job("A", 1000.0, 1);
    j.add_workunit(0, 5);
    jobs.insert(j.id.clone(), j);
    let mut works = IndexMap::new();
    let w = workunit("A_0_0", 10.0);
    works.insert(w.id.clone(), w);
    TraceSet { jobs, works, kickoff_epoch: 1000.0 }
}

#[test]
fn from_traces_carries_the_tables() {
    let db = SimDb::from_traces(tiny_set());
    assert_eq!(db.jobs.len(), 1);
    assert_eq!(db.works.len(), 1);
    assert_eq!(db.etime_to_sim(1100.0), 100.0);
}

#[test]
fn handles_share_one_table() {
    let db = Db::new(SimDb::from_traces(tiny_set()));
    let other = db.clone();
    other.with_mut(|db| {
        if let Some(w) = db.work_mut(&"A_0_0".into()) {
            w.timing.download_start = Some(Ts::from_secs(1.0));
        }
    });
    let seen = db.with(|db| db.work(&"A_0_0".into()).and_then(|w| w.timing.download_start));
    assert_eq!(seen, Some(Ts::from_secs(1.0)));
}
