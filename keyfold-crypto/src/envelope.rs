//! Envelope encryption for project key distribution.
//!
//! Uses X25519 key exchange + XSalsa20-Poly1305 to seal a project key under
//! a member's public key. Each seal operation generates an ephemeral
//! keypair, so the sealed envelope can be created by any process holding
//! only the recipient's public half.
//!
//! The asymmetric pair itself (enrollment, storage, rotation) is owned by
//! the identity subsystem; this module only consumes public keys and
//! produces ciphertext against them.

use crate::error::{CryptoError, CryptoResult};
use crypto_box::aead::rand_core::RngCore;
use crypto_box::aead::{Aead, OsRng};
use crypto_box::SalsaBox;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub use crypto_box::{PublicKey, SecretKey};

/// X25519 keypair for a member (test and enrollment support).
///
/// The secret key implements `ZeroizeOnDrop` automatically (from crypto_box).
pub struct RecipientKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl RecipientKeyPair {
    /// Generates a new keypair from the OS CSPRNG.
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Returns the public key as a raw 32-byte array.
    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Returns the secret key as a raw 32-byte array.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Reconstructs a keypair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }
}

/// A project key sealed under one member's X25519 public key.
///
/// The ephemeral public key is included so the member can reconstruct the
/// shared secret and unwrap the project key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedKey {
    /// Ephemeral X25519 public key (sender side of DH).
    pub ephemeral_public_key: [u8; 32],
    /// XSalsa20 nonce (24 bytes).
    pub nonce: [u8; 24],
    /// Encrypted project key (XSalsa20-Poly1305 ciphertext + tag).
    pub ciphertext: Vec<u8>,
}

/// Parses an externally stored public key, validating its format.
///
/// Fails with [`CryptoError::KeyFormat`] on anything other than exactly 32
/// bytes; callers must not create an envelope after this failure.
pub fn recipient_from_bytes(bytes: &[u8]) -> CryptoResult<PublicKey> {
    let raw: [u8; 32] = bytes.try_into().map_err(|_| {
        CryptoError::KeyFormat(format!(
            "expected 32-byte X25519 public key, got {} bytes",
            bytes.len()
        ))
    })?;
    Ok(PublicKey::from(raw))
}

/// Seals a project key for a recipient.
///
/// An ephemeral X25519 keypair is generated per seal, so repeated seals of
/// the same key produce unlinkable ciphertexts.
pub fn seal_key(key: &[u8], recipient_pk: &PublicKey) -> CryptoResult<SealedKey> {
    let ephemeral = SecretKey::generate(&mut OsRng);
    let ephemeral_pk = ephemeral.public_key();

    let salsa_box = SalsaBox::new(recipient_pk, &ephemeral);
    let mut nonce_bytes = [0u8; 24];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = salsa_box
        .encrypt(crypto_box::Nonce::from_slice(&nonce_bytes), key)
        .map_err(|_| CryptoError::Encryption("envelope seal failed".to_string()))?;

    Ok(SealedKey {
        ephemeral_public_key: *ephemeral_pk.as_bytes(),
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Opens a sealed project key using the member's secret key.
///
/// Fails with [`CryptoError::Authentication`] when the key does not match
/// or the envelope was tampered with.
pub fn open_key(sealed: &SealedKey, recipient_sk: &SecretKey) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let ephemeral_pk = PublicKey::from(sealed.ephemeral_public_key);
    let salsa_box = SalsaBox::new(&ephemeral_pk, recipient_sk);

    salsa_box
        .decrypt(
            crypto_box::Nonce::from_slice(&sealed.nonce),
            sealed.ciphertext.as_ref(),
        )
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Authentication)
}
