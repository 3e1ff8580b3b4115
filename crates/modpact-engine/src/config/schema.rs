//! Strict YAML front-end (serde) lowered onto the block model.
//!
//! Hosts with their own configuration language feed [`ConfigBlock`]s
//! directly; this schema exists for hosts and tests that want a structured
//! file instead. Unknown fields are rejected outright, while value-level
//! problems (bad yes/no text, denied-but-loaded modules) surface through
//! the same validate phase as host-parsed blocks.

use serde::Deserialize;

use super::blocks::{BlockKind, ConfigBlock, Directive};
use super::validate::{
    SWITCH_SQUIT_ON_DENY, SWITCH_SQUIT_ON_MISMATCH, SWITCH_SQUIT_ON_MISSING,
};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    #[serde(default)]
    pub deny_modules: Vec<DenyModuleConfig>,

    #[serde(default)]
    pub require_modules: Vec<RequireModuleConfig>,

    #[serde(default)]
    pub policy: Option<SwitchesConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DenyModuleConfig {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequireModuleConfig {
    pub name: String,
}

/// Switch values are the config language's yes/no words, kept as text so
/// the validate phase owns the vocabulary.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchesConfig {
    #[serde(default)]
    pub squit_on_deny: Option<String>,
    #[serde(default)]
    pub squit_on_missing: Option<String>,
    #[serde(default)]
    pub squit_on_mismatch: Option<String>,
}

impl GuardConfig {
    /// Lower the structured form onto the block model so it runs through
    /// the same validate/apply pipeline as host-parsed configuration.
    /// Synthetic "lines" are list positions, purely for diagnostics.
    pub fn into_blocks(self, source: &str) -> Vec<ConfigBlock> {
        let mut blocks = Vec::new();

        for (i, deny) in self.deny_modules.into_iter().enumerate() {
            let line = (i + 1) as u32;
            let mut block = ConfigBlock::new(BlockKind::DenyModule, source, line);
            block.push(Directive::new("name", Some(deny.name), source, line));
            if let Some(reason) = deny.reason {
                block.push(Directive::new("reason", Some(reason), source, line));
            }
            blocks.push(block);
        }

        for (i, require) in self.require_modules.into_iter().enumerate() {
            let line = (i + 1) as u32;
            let mut block = ConfigBlock::new(BlockKind::RequireModule, source, line);
            block.push(Directive::new("name", Some(require.name), source, line));
            blocks.push(block);
        }

        if let Some(policy) = self.policy {
            let mut block = ConfigBlock::new(BlockKind::PolicySwitches, source, 1);
            let switches = [
                (SWITCH_SQUIT_ON_DENY, policy.squit_on_deny),
                (SWITCH_SQUIT_ON_MISSING, policy.squit_on_missing),
                (SWITCH_SQUIT_ON_MISMATCH, policy.squit_on_mismatch),
            ];
            for (name, value) in switches {
                if let Some(v) = value {
                    block.push(Directive::new(name, Some(v), source, 1));
                }
            }
            blocks.push(block);
        }

        blocks
    }
}
