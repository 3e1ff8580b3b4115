//! modpact core: transport-agnostic inventory protocol, catalog model, and errors.
//!
//! This crate defines the wire-level contract for the module-inventory
//! exchange (`REQMODS`), the local module-catalog model the policy layer
//! consumes, and the error surface shared by the engine crate. It carries no
//! transport or runtime dependencies so a server host can embed it anywhere.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed peer input must never crash the host: token parsing folds
//! anomalies into conservative interpretations instead of erroring.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ModPactError, Result};
