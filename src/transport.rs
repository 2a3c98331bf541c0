//! Optional remote sampler transport (§6: "a thin client stub; not part
//! of the core"). Grounded in
//! `examples/original_source/t/exact_test_sampler_client.py`, which
//! reads a list of `host:port` sampler servers from an ini file and
//! opens a gRPC stub to each. This module keeps only the shape of that
//! collaborator: a trait a future remote backend could implement, and
//! the connection-string parsing it would need. Nothing in this crate
//! implements it; [`crate::pool::Generator`] always runs work units on
//! the local thread pool.

use std::collections::HashMap;

use anyhow::Result;

/// A permutation-generating collaborator reachable over some transport
/// other than the local thread pool (e.g. a sibling process, or a
/// machine on the network). Entirely speculative: no implementor ships
/// in this crate, matching spec.md's "not part of the core".
pub trait RemoteSampler: Send + Sync {
    /// Requests one batch of already-evaluated permutations — a
    /// `{statistic name -> scalar}` mapping per permutation — sized at
    /// most `batch_size`.
    fn sample(&self, batch_size: usize) -> Result<Vec<HashMap<String, f64>>>;
}

/// Parses `host:port` connection strings out of a simple `key=value`
/// ini-style config, one sampler server per section, the way
/// `exact_test_sampler_client.py`'s `parse_sampler_servers` does.
/// Sections other than a `hostname`/`port` pair are ignored; a missing
/// file yields no servers rather than an error, mirroring the Python
/// original's `except FileNotFoundError: pass`.
pub fn parse_sampler_servers(contents: &str) -> Vec<String> {
    let mut servers = Vec::new();
    let mut section: Option<String> = None;
    let mut hostname: Option<String> = None;
    let mut port: Option<String> = None;

    let flush = |section: &Option<String>, hostname: &Option<String>, port: Option<String>, out: &mut Vec<String>| {
        if let (Some(section), Some(port)) = (section, port) {
            let host = hostname.clone().unwrap_or_else(|| section.clone());
            out.push(format!("{host}:{port}"));
        }
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            flush(&section, &hostname, port.take(), &mut servers);
            section = Some(name.to_string());
            hostname = None;
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "hostname" => hostname = Some(value.trim().to_string()),
                "port" => port = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }
    flush(&section, &hostname, port.take(), &mut servers);
    servers
}
