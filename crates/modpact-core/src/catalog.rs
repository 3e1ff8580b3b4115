//! Local module catalog model and lookup contract.
//!
//! The catalog is owned by the host's module loader; the policy layer only
//! reads it, with one exception: a require rule may promote a module's scope
//! from Local to Global (never the other way).

use serde::{Deserialize, Serialize};

/// Whether a module's presence/version is expected network-wide (`Global`)
/// or only tolerated locally (`Local`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModScope {
    Local,
    Global,
}

impl ModScope {
    /// Wire flag character for this scope.
    pub fn flag(self) -> char {
        match self {
            ModScope::Global => 'G',
            ModScope::Local => 'L',
        }
    }

    /// Scope for a received flag character. Only `'G'` means Global; any
    /// other flag folds to Local, the tolerant interpretation.
    pub fn from_flag(flag: char) -> Self {
        if flag == 'G' {
            ModScope::Global
        } else {
            ModScope::Local
        }
    }
}

/// One optional module as known to the local loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub version: String,
    pub scope: ModScope,
    /// Whether the loader finished bringing the module up.
    pub loaded: bool,
}

impl ModuleEntry {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        scope: ModScope,
        loaded: bool,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            scope,
            loaded,
        }
    }
}

/// Read-only view of the loader's module catalog, plus the single one-way
/// mutation the policy layer is allowed to make.
///
/// Name lookups are ASCII case-insensitive; load state is irrelevant for
/// `lookup` but `lookup_strict` only yields fully-loaded modules.
pub trait ModuleCatalog {
    /// Loose lookup: matches any load state.
    fn lookup(&self, name: &str) -> Option<&ModuleEntry>;

    /// Strict lookup: only fully-loaded modules.
    fn lookup_strict(&self, name: &str) -> Option<&ModuleEntry> {
        self.lookup(name).filter(|m| m.loaded)
    }

    /// All entries in the loader's natural order.
    fn entries(&self) -> &[ModuleEntry];

    /// Flip the named module's scope to Global; returns `false` when the
    /// module is absent. Local -> Global is one-way and idempotent.
    fn promote_global(&mut self, name: &str) -> bool;
}

/// Vec-backed catalog for hosts that materialize loader state up front, and
/// for tests.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    entries: Vec<ModuleEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ModuleEntry>) -> Self {
        Self { entries }
    }

    /// Append an entry, keeping the loader's insertion order.
    pub fn push(&mut self, entry: ModuleEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModuleCatalog for StaticCatalog {
    fn lookup(&self, name: &str) -> Option<&ModuleEntry> {
        self.entries
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }

    fn promote_global(&mut self, name: &str) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|m| m.name.eq_ignore_ascii_case(name))
        {
            Some(m) => {
                m.scope = ModScope::Global;
                true
            }
            None => false,
        }
    }
}
