//! Top-level facade crate for modpact.
//!
//! Re-exports the protocol core and the policy engine so hosts can depend
//! on a single crate.

pub mod core {
    pub use modpact_core::*;
}

pub mod engine {
    pub use modpact_engine::*;
}
