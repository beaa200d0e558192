//! Deployment configuration for the secrets core.
//!
//! The embedding service loads this once at process start; components
//! receive what they need through constructors rather than reading ambient
//! global state, so every test can run with its own key and parameters.

use crate::error::{KeysError, KeysResult};
use keyfold_crypto::{MasterKey, TotpConfig, MIN_KEY_SIZE};
use serde::{Deserialize, Serialize};

/// Configuration for the secrets core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Base64-encoded 32-byte master key. Supplied by the deployment
    /// environment; there is no usable default.
    pub master_key_base64: String,

    /// Project key length in bytes.
    pub project_key_len: usize,

    /// TOTP code digit count.
    pub totp_digits: u32,

    /// TOTP time step in seconds.
    pub totp_step_secs: u64,

    /// Accepted TOTP clock skew, in steps, each side of now.
    pub totp_skew_steps: u64,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            master_key_base64: String::new(),
            project_key_len: 32,
            totp_digits: 6,
            totp_step_secs: 30,
            totp_skew_steps: 1,
        }
    }
}

impl KeysConfig {
    /// Decodes the configured master key.
    pub fn master_key(&self) -> KeysResult<MasterKey> {
        if self.master_key_base64.is_empty() {
            return Err(KeysError::Config("master key is not configured".to_string()));
        }
        Ok(MasterKey::from_base64(&self.master_key_base64)?)
    }

    /// The TOTP parameters as a [`TotpConfig`].
    pub fn totp(&self) -> TotpConfig {
        TotpConfig {
            digits: self.totp_digits,
            step_secs: self.totp_step_secs,
            skew_steps: self.totp_skew_steps,
        }
    }

    /// Validates parameter ranges (key length, digits, step).
    pub fn validate(&self) -> KeysResult<()> {
        if self.project_key_len < MIN_KEY_SIZE {
            return Err(KeysError::Config(format!(
                "project key length must be at least {MIN_KEY_SIZE} bytes, got {}",
                self.project_key_len
            )));
        }
        if !(6..=8).contains(&self.totp_digits) {
            return Err(KeysError::Config(format!(
                "TOTP digit count must be 6..=8, got {}",
                self.totp_digits
            )));
        }
        if self.totp_step_secs == 0 {
            return Err(KeysError::Config("TOTP time step must be nonzero".to_string()));
        }
        Ok(())
    }
}
