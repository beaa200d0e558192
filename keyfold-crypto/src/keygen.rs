//! Cryptographically secure key generation for new projects.

use crate::error::{CryptoError, CryptoResult};
use rand::TryRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Smallest key length this core will generate.
pub const MIN_KEY_SIZE: usize = 16;

/// Default project key length in bytes.
pub const PROJECT_KEY_SIZE: usize = 32;

/// Generates `length` bytes from the operating system CSPRNG.
///
/// Rejects lengths below [`MIN_KEY_SIZE`]; a general-purpose PRNG is never
/// used here.
pub fn generate_key(length: usize) -> CryptoResult<Zeroizing<Vec<u8>>> {
    if length < MIN_KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength {
            expected: MIN_KEY_SIZE,
            actual: length,
        });
    }

    let mut bytes = Zeroizing::new(vec![0u8; length]);
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Rng(e.to_string()))?;
    Ok(bytes)
}

/// A project's shared symmetric key.
///
/// Exists in plaintext only between generation and sealing under a member's
/// public key. Zeroized on drop; never serialized or logged.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProjectKey(Vec<u8>);

impl ProjectKey {
    /// Generates a fresh project key of the given length.
    pub fn generate(length: usize) -> CryptoResult<Self> {
        let bytes = generate_key(length)?;
        Ok(Self(bytes.to_vec()))
    }

    /// The raw key bytes, for sealing into an envelope.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty (never true for generated keys).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ProjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProjectKey({} bytes)", self.0.len())
    }
}
