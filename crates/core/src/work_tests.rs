// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_support::workunit;
use crate::time::Ts;

#[test]
fn transfer_durations_need_both_endpoints() {
    let mut work = workunit("j_0_0", 10.0);
    assert_eq!(work.download_secs(), None);

    work.timing.download_start = Some(Ts::from_secs(1.0));
    assert_eq!(work.download_secs(), None);

    work.timing.download_end = Some(Ts::from_secs(3.5));
    assert_eq!(work.download_secs(), Some(2.5));
}

#[test]
fn upload_duration() {
    let mut work = workunit("j_0_0", 10.0);
    work.timing.upload_start = Some(Ts::from_secs(10.0));
    work.timing.upload_end = Some(Ts::from_secs(11.0));
    assert_eq!(work.upload_secs(), Some(1.0));
}
