//! Shared error type across modpact crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ModPactError>;

/// Unified error type used by core and engine.
///
/// Protocol-level anomalies (missing version field, truncated names, odd
/// scope flags) are deliberately *not* represented here: the reconciler
/// folds those into its decision matrix rather than failing the message.
#[derive(Debug, Error)]
pub enum ModPactError {
    /// Configuration text could not be parsed at all.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Configuration parsed but validation found errors; the rendered
    /// file/line diagnostics are joined into the message.
    #[error("configuration rejected: {0}")]
    ConfigRejected(String),
    /// Internal-consistency defect (e.g. a rule that passed validation but
    /// cannot be applied). Logged and recoverable, never fatal.
    #[error("internal: {0}")]
    Internal(String),
}
