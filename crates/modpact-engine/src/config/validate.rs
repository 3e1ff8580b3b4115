//! Validation phase: report every problem, commit nothing.
//!
//! Each returned [`ConfigError`] is one counted violation; the host rejects
//! the whole configuration pass unless every block validated clean.

use modpact_core::catalog::ModuleCatalog;

use super::blocks::{BlockKind, ConfigBlock, ConfigError, Directive};

pub const SWITCH_SQUIT_ON_DENY: &str = "squit-on-deny";
pub const SWITCH_SQUIT_ON_MISSING: &str = "squit-on-missing";
pub const SWITCH_SQUIT_ON_MISMATCH: &str = "squit-on-mismatch";

/// Validate one block against the catalog. Returns every violation found.
pub fn validate_block(block: &ConfigBlock, catalog: &dyn ModuleCatalog) -> Vec<ConfigError> {
    match block.kind {
        BlockKind::DenyModule => validate_deny(block, catalog),
        BlockKind::RequireModule => validate_require(block, catalog),
        BlockKind::PolicySwitches => validate_switches(block),
    }
}

/// Validate a whole configuration pass.
pub fn validate_all(blocks: &[ConfigBlock], catalog: &dyn ModuleCatalog) -> Vec<ConfigError> {
    blocks
        .iter()
        .flat_map(|b| validate_block(b, catalog))
        .collect()
}

fn validate_deny(block: &ConfigBlock, catalog: &dyn ModuleCatalog) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut has_name = false;

    for dir in &block.directives {
        if let Some(e) = check_shape(dir, block.kind) {
            errors.push(e);
            continue;
        }

        match dir.name.as_str() {
            "name" => {
                // Loose catalog check: a module might not be fully loaded
                // yet and still must not be denied by its own server.
                if catalog.lookup(dir.value_str()).is_some() {
                    errors.push(ConfigError::at(
                        &dir.file,
                        dir.line,
                        format!(
                            "module '{}' is denied but we have loaded it ourselves",
                            dir.value_str()
                        ),
                    ));
                }
                has_name = true;
            }
            "reason" => {} // Optional
            other => errors.push(unknown_directive(dir, other, block.kind)),
        }
    }

    if !has_name {
        errors.push(missing_name(block));
    }
    errors
}

fn validate_require(block: &ConfigBlock, catalog: &dyn ModuleCatalog) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut has_name = false;

    for dir in &block.directives {
        if let Some(e) = check_shape(dir, block.kind) {
            errors.push(e);
            continue;
        }

        match dir.name.as_str() {
            "name" => {
                // Loose match: load completion is irrelevant here, the
                // module just has to exist on this server.
                if catalog.lookup(dir.value_str()).is_none() {
                    errors.push(ConfigError::at(
                        &dir.file,
                        dir.line,
                        format!(
                            "module '{}' is required but we have not loaded it ourselves (check the name?)",
                            dir.value_str()
                        ),
                    ));
                }
                has_name = true;
            }
            // 'reason' is not meaningful under require blocks, so it errors
            // along with everything else unknown.
            other => errors.push(unknown_directive(dir, other, block.kind)),
        }
    }

    if !has_name {
        errors.push(missing_name(block));
    }
    errors
}

fn validate_switches(block: &ConfigBlock) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for dir in &block.directives {
        if let Some(e) = check_shape(dir, block.kind) {
            errors.push(e);
            continue;
        }

        match dir.name.as_str() {
            SWITCH_SQUIT_ON_DENY | SWITCH_SQUIT_ON_MISSING | SWITCH_SQUIT_ON_MISMATCH => {
                if parse_yes_no(dir.value_str()).is_none() {
                    errors.push(ConfigError::at(
                        &dir.file,
                        dir.line,
                        format!("'{}' is not a yes/no value for {}", dir.value_str(), dir.name),
                    ));
                }
            }
            other => errors.push(unknown_directive(dir, other, block.kind)),
        }
    }
    errors
}

/// Blank-directive and blank-value checks shared by every block type.
fn check_shape(dir: &Directive, kind: BlockKind) -> Option<ConfigError> {
    if dir.name.is_empty() {
        return Some(ConfigError::at(
            &dir.file,
            dir.line,
            format!("blank directive for {}", kind.describe()),
        ));
    }
    if !dir.has_value() {
        return Some(ConfigError::at(
            &dir.file,
            dir.line,
            format!("blank {} without value for {}", dir.name, kind.describe()),
        ));
    }
    None
}

fn unknown_directive(dir: &Directive, name: &str, kind: BlockKind) -> ConfigError {
    ConfigError::at(
        &dir.file,
        dir.line,
        format!("unknown directive {} for {}", name, kind.describe()),
    )
}

fn missing_name(block: &ConfigBlock) -> ConfigError {
    ConfigError::at(
        &block.file,
        block.line,
        format!("missing required 'name' directive for {}", block.kind.describe()),
    )
}

/// Yes/no vocabulary of the config language, ASCII case-insensitive.
pub fn parse_yes_no(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
        || value.eq_ignore_ascii_case("true")
        || value == "1"
    {
        Some(true)
    } else if value.eq_ignore_ascii_case("no")
        || value.eq_ignore_ascii_case("off")
        || value.eq_ignore_ascii_case("false")
        || value == "0"
    {
        Some(false)
    } else {
        None
    }
}
