//! Decision matrix for received inventory entries.

use modpact_core::catalog::{ModScope, ModuleCatalog};
use modpact_core::protocol::inventory::InventoryEntry;

use super::store::PolicyStore;

/// Link-severing switches. All off by default, so every mismatch only
/// warns. Replaced wholesale on each successful configuration apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    pub squit_on_deny: bool,
    pub squit_on_missing: bool,
    pub squit_on_mismatch: bool,
}

/// What the matrix concluded about one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Module known locally with a matching version.
    Clean,
    /// Entry matches a deny rule, whatever its scope flag says.
    DenyHit { reason: String },
    /// Globally-scoped module that is not fully loaded here.
    MissingGlobal,
    /// Locally-scoped module we do not have; always tolerated.
    MissingLocal,
    /// Known module whose peer version is absent or diverges from ours.
    VersionMismatch {
        ours: String,
        theirs: Option<String>,
    },
}

/// Per-entry outcome of the reconciliation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Nothing to report, keep consuming entries.
    Continue,
    /// A notice was raised but the link stays up.
    Warned,
    /// Stop consuming entries; the link is being torn down with this reason.
    Terminated(String),
}

/// Evaluate one inventory entry against the deny rules and local catalog.
///
/// Deny rules win over everything, even for locally-scoped entries: a
/// server using a forbidden module may be kept out of the network no matter
/// how the module is flagged. Presence uses the strict catalog lookup so a
/// half-loaded module still reports as missing.
pub fn evaluate_entry(
    entry: &InventoryEntry,
    store: &PolicyStore,
    catalog: &dyn ModuleCatalog,
) -> Finding {
    if let Some(rule) = store.find_deny_rule(&entry.name) {
        return Finding::DenyHit {
            reason: rule.reason.clone(),
        };
    }

    let module = match catalog.lookup_strict(&entry.name) {
        Some(m) => m,
        None => {
            return match entry.scope {
                ModScope::Global => Finding::MissingGlobal,
                ModScope::Local => Finding::MissingLocal,
            }
        }
    };

    if !version_matches(&module.version, entry.version.as_deref()) {
        return Finding::VersionMismatch {
            ours: module.version.clone(),
            theirs: entry.version.clone(),
        };
    }

    Finding::Clean
}

/// Exact ASCII-case-insensitive equality. An absent peer version never
/// matches. Local versions may carry suffixes like "-alpha"; those must be
/// present on the peer side too, this is deliberately not a prefix match.
pub fn version_matches(ours: &str, theirs: Option<&str>) -> bool {
    theirs.is_some_and(|v| ours.eq_ignore_ascii_case(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use modpact_core::catalog::{ModuleEntry, StaticCatalog};

    fn entry(token: &str) -> InventoryEntry {
        modpact_core::protocol::inventory::parse_token(token).unwrap()
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::with_entries(vec![
            ModuleEntry::new("bar", "3.0.0", ModScope::Global, true),
            ModuleEntry::new("halfway", "1.0", ModScope::Local, false),
        ])
    }

    #[test]
    fn deny_rule_wins_over_everything() {
        let mut store = PolicyStore::new();
        store.add_deny_rule("chanfilter", "banned");
        let finding = evaluate_entry(&entry("Lchanfilter:3.2"), &store, &catalog());
        assert_eq!(
            finding,
            Finding::DenyHit {
                reason: "banned".into()
            }
        );
    }

    #[test]
    fn missing_global_vs_local() {
        let store = PolicyStore::new();
        let cat = catalog();
        assert_eq!(
            evaluate_entry(&entry("Gfoomodule:4.0"), &store, &cat),
            Finding::MissingGlobal
        );
        assert_eq!(
            evaluate_entry(&entry("Lfoomodule:4.0"), &store, &cat),
            Finding::MissingLocal
        );
    }

    #[test]
    fn half_loaded_counts_as_missing() {
        let store = PolicyStore::new();
        assert_eq!(
            evaluate_entry(&entry("Ghalfway:1.0"), &store, &catalog()),
            Finding::MissingGlobal
        );
    }

    #[test]
    fn version_divergence_is_a_mismatch() {
        let store = PolicyStore::new();
        let cat = catalog();
        assert_eq!(
            evaluate_entry(&entry("Gbar:3.0.1"), &store, &cat),
            Finding::VersionMismatch {
                ours: "3.0.0".into(),
                theirs: Some("3.0.1".into()),
            }
        );
        // Dropped version field counts as a mismatch too.
        assert_eq!(
            evaluate_entry(&entry("Gbar"), &store, &cat),
            Finding::VersionMismatch {
                ours: "3.0.0".into(),
                theirs: None,
            }
        );
    }

    #[test]
    fn version_match_is_case_insensitive_but_exact() {
        assert!(version_matches("3.0.0-ALPHA", Some("3.0.0-alpha")));
        assert!(version_matches("3.0.0", Some("3.0.0")));
        // Not a prefix match: extra local suffix text must be present.
        assert!(!version_matches("3.0.0-alpha", Some("3.0.0")));
        assert!(!version_matches("3.0.0", Some("3.0")));
        assert!(!version_matches("3.0.0", None));
    }

    #[test]
    fn clean_when_present_and_matching() {
        let store = PolicyStore::new();
        assert_eq!(
            evaluate_entry(&entry("Gbar:3.0.0"), &store, &catalog()),
            Finding::Clean
        );
    }
}
