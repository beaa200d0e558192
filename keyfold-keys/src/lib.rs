//! Secrets orchestration for Keyfold.
//!
//! Coordinates the crypto primitives in `keyfold-crypto` into the two flows
//! the collaboration service depends on:
//! - Ensure-envelope: every project missing its shared-key envelope gets
//!   exactly one created, sealed for the requesting member, and persisted
//!   exactly once (races resolved by the store's uniqueness constraint)
//! - Second-factor verification: decrypt the stored TOTP secret, check the
//!   submitted code within the skew window, report a bare pass/fail
//!
//! Authorization ("may this caller ask at all") is decided upstream; this
//! crate takes no role or membership parameters.

pub mod config;
pub mod error;
pub mod manager;
pub mod store;
pub mod twofactor;

pub use config::KeysConfig;
pub use error::{KeysError, KeysResult};
pub use manager::{EnsureOutcome, EnvelopeKeyManager};
pub use store::{KeyEnvelope, KeyStore, MemoryKeyStore, StoreError, StoreResult};
pub use twofactor::TwoFactorVerifier;
