//! Shared plumbing for the consent ledger contract suite.
//!
//! This crate provides:
//! - [`errors`]: error categories, severities and the `ERROR` event every
//!   contract publishes on its failure paths.
//! - [`audit`]: the audit event payloads and the hash-chained, append-only
//!   audit log each contract keeps in its own storage.
//! - [`interfaces`]: capability interfaces (`RewardSink`, `IdentityOracle`,
//!   `ConsentLedger`) that contracts depend on by abstraction.
//! - [`data_id`]: derivation of consent data ids from numeric data types.
//! - A host-side consent model (requires `std` feature) used by simulations
//!   and property tests.

#![cfg_attr(not(feature = "std"), no_std)]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod audit;
#[cfg(feature = "std")]
pub mod consent;
pub mod data_id;
pub mod errors;
pub mod interfaces;

pub use audit::*;
pub use errors::*;
pub use interfaces::*;
