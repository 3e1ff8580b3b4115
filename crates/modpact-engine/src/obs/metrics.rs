//! Minimal metrics registry for the engine.
//!
//! Counter vectors with dynamic labels backed by `DashMap`; labels are
//! flattened into sorted key vectors to keep deterministic ordering. Safe
//! to touch from any thread even though the engine itself is
//! single-threaded.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 when never touched).
    pub fn value(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let key = r.key();
            let val = r.value().load(Ordering::Relaxed);
            let label_str = key
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

#[derive(Default)]
pub struct GuardMetrics {
    pub inventories_received: CounterVec,
    pub entries_evaluated: CounterVec,
    pub deny_hits: CounterVec,
    pub missing_modules: CounterVec,
    pub version_mismatches: CounterVec,
    pub links_terminated: CounterVec,
    pub messages_broadcast: CounterVec,
}

impl GuardMetrics {
    /// Render all registered metrics for the host's scrape endpoint.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.inventories_received
            .render("modpact_inventories_received_total", &mut out);
        self.entries_evaluated
            .render("modpact_entries_evaluated_total", &mut out);
        self.deny_hits.render("modpact_deny_hits_total", &mut out);
        self.missing_modules
            .render("modpact_missing_modules_total", &mut out);
        self.version_mismatches
            .render("modpact_version_mismatches_total", &mut out);
        self.links_terminated
            .render("modpact_links_terminated_total", &mut out);
        self.messages_broadcast
            .render("modpact_messages_broadcast_total", &mut out);
        out
    }
}
