//! Policy layer (deny rules, link-severing switches, decision matrix).
//!
//! State here is only mutated during configuration apply, which runs on the
//! same control thread as message handling, so no locking is needed.

pub mod engine;
pub mod store;

pub use engine::{evaluate_entry, version_matches, Finding, Flow, PolicyConfig};
pub use store::{DenyRule, PolicyStore, DEFAULT_DENY_REASON};
