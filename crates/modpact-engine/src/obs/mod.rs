//! Lightweight in-process metrics (dependency-light).
//!
//! Counters are stored as atomics keyed by label sets and rendered in
//! Prometheus text exposition format by the host's scrape handler.

pub mod metrics;

pub use metrics::GuardMetrics;
