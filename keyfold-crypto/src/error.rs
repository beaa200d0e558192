//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("authentication failed (wrong key or tampered data)")]
    Authentication,

    #[error("malformed key material: {0}")]
    KeyFormat(String),

    #[error("invalid one-time secret: {0}")]
    InvalidSecret(String),

    #[error("invalid TOTP parameters: {0}")]
    TotpParams(String),

    #[error("random generator failure: {0}")]
    Rng(String),
}
