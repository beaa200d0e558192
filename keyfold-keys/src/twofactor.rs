//! Second-factor TOTP verification over encrypted stored secrets.
//!
//! The stored secret is decrypted only for the duration of one verification
//! and wiped afterwards. Every failure mode — tag verification, UTF-8,
//! base32, unusable parameters — fails closed to `false`; no decryption
//! detail reaches the caller, logs, or error messages. Rate-limiting
//! repeated guesses is the caller's concern.

use crate::config::KeysConfig;
use crate::error::KeysResult;
use keyfold_crypto::{cipher, totp, EncryptedSecret, MasterKey, TotpConfig};
use tracing::debug;

/// Verifies submitted one-time codes against encrypted stored secrets.
pub struct TwoFactorVerifier {
    master_key: MasterKey,
    config: TotpConfig,
}

impl TwoFactorVerifier {
    pub fn new(master_key: MasterKey, config: TotpConfig) -> Self {
        Self { master_key, config }
    }

    /// Builds a verifier from deployment configuration.
    pub fn from_config(config: &KeysConfig) -> KeysResult<Self> {
        config.validate()?;
        Ok(Self::new(config.master_key()?, config.totp()))
    }

    /// Verifies `submitted_code` against the wall clock.
    pub fn verify(&self, stored: &EncryptedSecret, submitted_code: &str) -> bool {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        self.verify_at(stored, submitted_code, now)
    }

    /// Verifies `submitted_code` at an explicit unix time (testable clock).
    pub fn verify_at(&self, stored: &EncryptedSecret, submitted_code: &str, unix_time: u64) -> bool {
        let secret_text = match cipher::decrypt_string(&self.master_key, stored) {
            Ok(text) => text,
            Err(_) => {
                debug!("second-factor secret failed authenticated decryption");
                return false;
            }
        };

        let secret_bytes = match totp::decode_secret(&secret_text) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!("stored second-factor secret is not a valid base32 secret");
                return false;
            }
        };

        totp::verify_at(&secret_bytes, submitted_code, unix_time, &self.config).unwrap_or(false)
    }
}
