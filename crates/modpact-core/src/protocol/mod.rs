//! Inventory wire protocol.
//!
//! One message type: a single parameter of space-separated tokens shaped
//! `<flag><name>[:<version>]`, carried under the `REQMODS` command over the
//! host's server-link transport. Multiple messages may arrive back-to-back
//! when an inventory does not fit in one line; receivers accumulate effects
//! per entry and never assume a single message carries the whole inventory.
//!
//! All parsing here is panic-free: anomalous tokens degrade to conservative
//! interpretations instead of errors, keeping the reconciler resilient to
//! whatever a peer sends.

pub mod inventory;
