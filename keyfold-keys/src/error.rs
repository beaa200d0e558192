//! Orchestration error types.

use keyfold_crypto::CryptoError;
use thiserror::Error;

/// Result type for orchestration operations.
pub type KeysResult<T> = Result<T, KeysError>;

/// Errors surfaced by envelope and second-factor orchestration.
#[derive(Debug, Error)]
pub enum KeysError {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("key store error: {0}")]
    Store(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
