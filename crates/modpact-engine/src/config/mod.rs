//! Two-phase configuration acceptance (validate, then apply).
//!
//! The host's generic config parser hands every recognized block to
//! [`validate_all`]; only when the whole pass reported zero errors does it
//! run [`apply_all`], which builds a fresh [`PolicyStore`] +
//! [`PolicyConfig`] pair to install wholesale. `load_from_str` /
//! `load_from_file` bundle the same pipeline behind the strict YAML
//! front-end.
//!
//! [`PolicyStore`]: crate::policy::PolicyStore
//! [`PolicyConfig`]: crate::policy::PolicyConfig

pub mod apply;
pub mod blocks;
pub mod schema;
pub mod validate;

use std::fs;

use modpact_core::catalog::ModuleCatalog;
use modpact_core::{ModPactError, Result};

use crate::policy::{PolicyConfig, PolicyStore};

pub use apply::{apply_all, PendingPolicy};
pub use blocks::{BlockKind, ConfigBlock, ConfigError, Directive};
pub use schema::GuardConfig;
pub use validate::{validate_all, validate_block};

/// Parse, validate, and apply a structured configuration document.
/// On success returns the policy state to install wholesale.
pub fn load_from_str(
    s: &str,
    source: &str,
    catalog: &mut dyn ModuleCatalog,
) -> Result<(PolicyStore, PolicyConfig)> {
    let cfg: GuardConfig = serde_yaml::from_str(s)
        .map_err(|e| ModPactError::InvalidConfig(format!("invalid yaml: {e}")))?;
    let blocks = cfg.into_blocks(source);

    let errors = validate_all(&blocks, catalog);
    if !errors.is_empty() {
        for e in &errors {
            tracing::error!(error = %e, "config validation failed");
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ModPactError::ConfigRejected(joined));
    }

    apply_all(&blocks, catalog)
}

/// `load_from_str` over a file path.
pub fn load_from_file(
    path: &str,
    catalog: &mut dyn ModuleCatalog,
) -> Result<(PolicyStore, PolicyConfig)> {
    let s = fs::read_to_string(path)
        .map_err(|e| ModPactError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s, path, catalog)
}
