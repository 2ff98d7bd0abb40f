// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One `;`-delimited `key=val` trace line.

/// Borrowed view over the `key=val` pairs of a trace line.
///
/// Segments without a `=` are ignored. Numeric accessors follow the
/// trace error policy: a missing key is silently zero, an unparseable
/// value warns and defaults to zero, neither aborts the load.
#[derive(Debug)]
pub struct KvLine<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> KvLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let pairs = line
            .trim()
            .split(';')
            .filter_map(|seg| seg.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
    }

    pub fn u64_or_zero(&self, key: &str) -> u64 {
        self.number_or_zero(key, str::parse::<u64>)
    }

    pub fn f64_or_zero(&self, key: &str) -> f64 {
        self.number_or_zero(key, str::parse::<f64>)
    }

    pub fn usize_or_zero(&self, key: &str) -> usize {
        self.number_or_zero(key, str::parse::<usize>)
    }

    fn number_or_zero<T, E>(&self, key: &str, parse: impl Fn(&str) -> Result<T, E>) -> T
    where
        T: Default,
    {
        match self.get(key) {
            None => T::default(),
            Some(raw) => parse(raw).unwrap_or_else(|_| {
                tracing::warn!(key, value = raw, "malformed trace field, defaulting to 0");
                T::default()
            }),
        }
    }
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
