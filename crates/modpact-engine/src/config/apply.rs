//! Apply phase: build fresh policy state from a validated pass.
//!
//! The host must only call into here after [`validate_all`] reported zero
//! errors for the whole configuration. State is staged in a
//! [`PendingPolicy`] and swapped in wholesale on commit, which is what makes
//! reloads idempotent and keeps half-applied passes from ever going live.
//!
//! [`validate_all`]: super::validate::validate_all

use modpact_core::catalog::ModuleCatalog;
use modpact_core::{ModPactError, Result};

use crate::policy::{PolicyConfig, PolicyStore};

use super::blocks::{BlockKind, ConfigBlock};
use super::validate::{
    parse_yes_no, SWITCH_SQUIT_ON_DENY, SWITCH_SQUIT_ON_MISMATCH, SWITCH_SQUIT_ON_MISSING,
};

/// Policy state under construction during an apply pass.
#[derive(Debug, Default)]
pub struct PendingPolicy {
    store: PolicyStore,
    config: PolicyConfig,
}

impl PendingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one validated block.
    ///
    /// A require rule whose module vanished between the phases is logged as
    /// a likely defect and skipped; the pass keeps going. `Err` is reserved
    /// for blocks that could never have passed validation.
    pub fn apply_block(
        &mut self,
        block: &ConfigBlock,
        catalog: &mut dyn ModuleCatalog,
    ) -> Result<()> {
        match block.kind {
            BlockKind::DenyModule => self.apply_deny(block),
            BlockKind::RequireModule => self.apply_require(block, catalog),
            BlockKind::PolicySwitches => self.apply_switches(block),
        }
    }

    /// Finish the pass, yielding the state to install wholesale.
    pub fn commit(self) -> (PolicyStore, PolicyConfig) {
        (self.store, self.config)
    }

    fn apply_deny(&mut self, block: &ConfigBlock) -> Result<()> {
        let name = block
            .directive("name")
            .and_then(|d| d.value.as_deref())
            .ok_or_else(|| {
                ModPactError::Internal(format!(
                    "{}:{}: deny block reached apply without a name",
                    block.file, block.line
                ))
            })?;
        let reason = block
            .directive("reason")
            .and_then(|d| d.value.as_deref())
            .unwrap_or("");

        self.store.add_deny_rule(name, reason);
        Ok(())
    }

    fn apply_require(&mut self, block: &ConfigBlock, catalog: &mut dyn ModuleCatalog) -> Result<()> {
        for dir in &block.directives {
            if dir.name != "name" {
                continue;
            }
            let name = dir.value_str();
            // Required modules just get the global scope; no separate list
            // of require rules is kept anywhere.
            if !catalog.promote_global(name) {
                tracing::error!(
                    module = name,
                    file = %dir.file,
                    line = dir.line,
                    "require rule passed validation but the module is gone; skipping"
                );
            }
        }
        Ok(())
    }

    fn apply_switches(&mut self, block: &ConfigBlock) -> Result<()> {
        for dir in &block.directives {
            let Some(value) = parse_yes_no(dir.value_str()) else {
                continue;
            };
            match dir.name.as_str() {
                SWITCH_SQUIT_ON_DENY => self.config.squit_on_deny = value,
                SWITCH_SQUIT_ON_MISSING => self.config.squit_on_missing = value,
                SWITCH_SQUIT_ON_MISMATCH => self.config.squit_on_mismatch = value,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Apply a whole validated pass and return the state to install.
pub fn apply_all(
    blocks: &[ConfigBlock],
    catalog: &mut dyn ModuleCatalog,
) -> Result<(PolicyStore, PolicyConfig)> {
    let mut pending = PendingPolicy::new();
    for block in blocks {
        pending.apply_block(block, catalog)?;
    }
    Ok(pending.commit())
}
