// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The line-oriented simulation event log.
//!
//! One line per observable event:
//! `<secs:.6>;<lp_type>;<lp_id>;<TAG>;<fields>`
//!
//! This file is the product of a run — analysis tooling parses it — so
//! the format is a contract. Write failures are logged via `tracing`
//! and do not stop the simulation; open/flush failures do.

use aw_core::{LpId, LpKind, Ts};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct EventLog {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog").finish_non_exhaustive()
    }
}

impl EventLog {
    /// Open (truncate) the log file at `path`.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_sink(Box::new(BufWriter::new(file))))
    }

    /// Log into an arbitrary sink; used by tests to capture lines.
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self { sink: Mutex::new(sink) }
    }

    /// Append one event line.
    pub fn line(&self, ts: Ts, lp_type: LpKind, lp: LpId, tag: &str, fields: std::fmt::Arguments<'_>) {
        let mut sink = self.sink.lock();
        if let Err(e) = writeln!(sink, "{ts};{lp_type};{lp};{tag};{fields}") {
            tracing::warn!(tag, error = %e, "failed to write event log line");
        }
    }

    /// Flush buffered lines; called once at simulation end.
    pub fn flush(&self) -> std::io::Result<()> {
        self.sink.lock().flush()
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
