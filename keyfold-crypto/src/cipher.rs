//! Authenticated symmetric encryption for secrets at rest.
//!
//! Uses XChaCha20-Poly1305 keyed by the process-wide master key. Every call
//! draws a fresh random 24-byte nonce, so nonce reuse cannot occur even
//! across independent processes sharing one master key. The ciphertext,
//! nonce, and Poly1305 tag are kept as three separately addressable fields
//! so the persistence layer can store them however it likes.
//!
//! Nothing in this module logs plaintext or key material at any level.

use crate::error::{CryptoError, CryptoResult};
use chacha20poly1305::aead::rand_core::RngCore;
use chacha20poly1305::aead::{Aead, KeyInit, OsRng};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Master key size in bytes (XChaCha20-Poly1305).
pub const KEY_SIZE: usize = 32;

/// Nonce size in bytes (XChaCha20).
pub const IV_SIZE: usize = 24;

/// Poly1305 authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Process-wide symmetric master key.
///
/// Loaded once from deployment configuration at process start and injected
/// into every component that needs it. Never serialized, never logged,
/// zeroized on drop. Read-only after construction, so concurrent use needs
/// no locking.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_SIZE]);

impl MasterKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Decodes a base64-encoded key, the format deployment configuration
    /// supplies it in.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine as _;

        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::KeyFormat(format!("master key base64: {e}")))?;

        if decoded.len() != KEY_SIZE {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual,
            });
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self(bytes))
    }

    /// Generates a random master key (enrollment tooling and tests).
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key bytes must never reach logs or panic messages
        f.write_str("MasterKey(..)")
    }
}

/// An encrypted secret at rest: ciphertext, nonce, and authentication tag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// XChaCha20 ciphertext (same length as the plaintext).
    pub ciphertext: Vec<u8>,
    /// The 24-byte nonce drawn for this encryption.
    pub iv: [u8; IV_SIZE],
    /// Poly1305 authentication tag.
    pub tag: [u8; TAG_SIZE],
}

/// Encrypts a secret under the master key with a fresh random nonce.
pub fn encrypt(key: &MasterKey, plaintext: &[u8]) -> CryptoResult<EncryptedSecret> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let mut combined = cipher
        .encrypt(XNonce::from_slice(&iv), plaintext)
        .map_err(|_| CryptoError::Encryption("AEAD encryption failed".to_string()))?;

    let tag_bytes = combined.split_off(combined.len() - TAG_SIZE);
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&tag_bytes);

    Ok(EncryptedSecret {
        ciphertext: combined,
        iv,
        tag,
    })
}

/// Decrypts a secret, verifying its authentication tag.
///
/// Fails with [`CryptoError::Authentication`] when the tag does not verify
/// (tampered data or wrong key). Callers must treat that as "secret
/// unusable" and never fall back to the raw ciphertext.
///
/// The plaintext is returned in a [`Zeroizing`] buffer so it is wiped as
/// soon as it leaves the caller's scope.
pub fn decrypt(key: &MasterKey, secret: &EncryptedSecret) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = XNonce::from_slice(&secret.iv);

    let mut combined: Vec<u8> = Vec::with_capacity(secret.ciphertext.len() + TAG_SIZE);
    combined.extend_from_slice(&secret.ciphertext);
    combined.extend_from_slice(&secret.tag);

    cipher
        .decrypt(nonce, combined.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Authentication)
}

/// Decrypts a text secret (e.g. a base32 TOTP secret).
pub fn decrypt_string(key: &MasterKey, secret: &EncryptedSecret) -> CryptoResult<Zeroizing<String>> {
    let mut plaintext = decrypt(key, secret)?;

    match String::from_utf8(std::mem::take(&mut *plaintext)) {
        Ok(text) => Ok(Zeroizing::new(text)),
        Err(e) => {
            let mut bytes = e.into_bytes();
            bytes.zeroize();
            Err(CryptoError::InvalidSecret(
                "decrypted data is not valid UTF-8".to_string(),
            ))
        }
    }
}
