//! Deny-rule storage.

use std::collections::HashMap;

/// Fallback reason when a deny rule omits one.
pub const DEFAULT_DENY_REASON: &str = "A forbidden module is being used";

/// One denied-module rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyRule {
    /// Module name as written in the configuration.
    pub name: String,
    /// Human-readable reason, propagated on notices and link termination.
    pub reason: String,
}

/// Deny rules keyed by ASCII-lowercased module name.
///
/// Built while a configuration pass is applied and replaced wholesale on
/// reload, so stale rules never survive a reconfiguration.
#[derive(Debug, Default, Clone)]
pub struct PolicyStore {
    rules: HashMap<String, DenyRule>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rule for `name`. An empty reason is replaced
    /// with [`DEFAULT_DENY_REASON`].
    pub fn add_deny_rule(&mut self, name: &str, reason: &str) {
        let reason = if reason.is_empty() {
            DEFAULT_DENY_REASON
        } else {
            reason
        };
        self.rules.insert(
            name.to_ascii_lowercase(),
            DenyRule {
                name: name.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// Case-insensitive lookup.
    pub fn find_deny_rule(&self, name: &str) -> Option<&DenyRule> {
        self.rules.get(&name.to_ascii_lowercase())
    }

    /// Drop every rule; used on unload/reload.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
