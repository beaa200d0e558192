//! Cryptographic primitives for Keyfold.
//!
//! Provides the secrets core for a multi-tenant collaboration service:
//! - XChaCha20-Poly1305 authenticated encryption for secrets at rest
//! - CSPRNG project key generation
//! - X25519 envelope encryption for distributing project keys to members
//! - TOTP code computation and constant-time verification
//!
//! # Architecture
//!
//! Two classes of secret flow through this crate:
//!
//! 1. **Project keys**: random symmetric keys generated once per project.
//!    A project key exists in plaintext only transiently, between generation
//!    and sealing under a member's public key. The sealed envelope is what
//!    gets persisted.
//!
//! 2. **Second-factor secrets**: per-user TOTP secrets encrypted under the
//!    process-wide master key. They are decrypted only for the duration of a
//!    verification and wiped afterwards.
//!
//! Orchestration (envelope lifecycle, persistence contracts, the
//! decrypt-then-verify flow) lives in `keyfold-keys`; this crate stays free
//! of any knowledge of projects, users, or storage.

pub mod cipher;
pub mod envelope;
mod error;
pub mod keygen;
pub mod totp;

pub use cipher::{
    decrypt, decrypt_string, encrypt, EncryptedSecret, MasterKey, IV_SIZE, KEY_SIZE, TAG_SIZE,
};
pub use envelope::{
    open_key, recipient_from_bytes, seal_key, PublicKey, RecipientKeyPair, SealedKey, SecretKey,
};
pub use error::{CryptoError, CryptoResult};
pub use keygen::{generate_key, ProjectKey, MIN_KEY_SIZE, PROJECT_KEY_SIZE};
pub use totp::TotpConfig;
