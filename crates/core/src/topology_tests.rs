// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::WorkerConfig;

fn topo(local: u32, remote: u32) -> Topology {
    Topology::from_config(&WorkerConfig { local, remote, affinity_stage: 5 })
}

#[test]
fn fixed_lps_come_first() {
    let t = topo(2, 1);
    assert_eq!(t.kind(Topology::SERVER), Some(LpKind::Server));
    assert_eq!(t.kind(Topology::STORE), Some(LpKind::Store));
    assert_eq!(t.kind(Topology::ROUTER), Some(LpKind::Router));
    assert_eq!(t.num_lps(), 6);
    assert_eq!(t.num_workers(), 3);
}

#[test]
fn workers_are_local_then_remote() {
    let t = topo(2, 2);
    let groups: Vec<_> = t.workers().collect();
    assert_eq!(groups.len(), 4);
    assert_eq!(groups[0], (LpId(3), Group::Local));
    assert_eq!(groups[1], (LpId(4), Group::Local));
    assert_eq!(groups[2], (LpId(5), Group::Remote));
    assert_eq!(groups[3], (LpId(6), Group::Remote));
}

#[test]
fn group_lookup_is_worker_only() {
    let t = topo(1, 1);
    assert_eq!(t.group(Topology::SERVER), None);
    assert_eq!(t.group(Topology::ROUTER), None);
    assert_eq!(t.group(LpId(3)), Some(Group::Local));
    assert_eq!(t.group(LpId(4)), Some(Group::Remote));
    assert_eq!(t.group(LpId(5)), None);
    assert_eq!(t.kind(LpId(5)), None);
}

#[test]
fn lp_kind_names_match_the_event_log() {
    assert_eq!(LpKind::Server.to_string(), "awe_server");
    assert_eq!(LpKind::Store.to_string(), "shock");
    assert_eq!(LpKind::Router.to_string(), "shock_router");
    assert_eq!(LpKind::Worker.to_string(), "awe_client");
}
