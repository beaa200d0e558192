//! Time-based one-time codes (RFC 6238) with constant-time verification.
//!
//! Verification checks the current time step plus a configurable skew
//! window. Every candidate code is computed and compared before the verdict
//! is combined, and each comparison is constant-time, so response timing
//! reveals nothing about how close a guess was.

use crate::error::{CryptoError, CryptoResult};
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, Zeroizing};

type HmacSha1 = Hmac<Sha1>;

/// TOTP algorithm parameters, supplied by deployment configuration.
///
/// Defaults match the common authenticator-app profile: 6 digits, 30-second
/// steps, one step of clock-skew tolerance in each direction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TotpConfig {
    /// Number of decimal digits in a code.
    pub digits: u32,
    /// Time step length in seconds.
    pub step_secs: u64,
    /// Accepted clock skew, in steps, on each side of "now".
    pub skew_steps: u64,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            digits: 6,
            step_secs: 30,
            skew_steps: 1,
        }
    }
}

impl TotpConfig {
    fn check(&self) -> CryptoResult<()> {
        if self.digits < 1 || self.digits > 9 {
            return Err(CryptoError::TotpParams(format!(
                "digit count must be 1..=9, got {}",
                self.digits
            )));
        }
        if self.step_secs == 0 {
            return Err(CryptoError::TotpParams("time step must be nonzero".to_string()));
        }
        Ok(())
    }
}

/// Decodes a base32 shared secret (RFC 4648) into raw HMAC key bytes.
///
/// Tolerates lowercase, surrounding whitespace, and trailing padding, which
/// all occur in the wild among enrollment tools.
pub fn decode_secret(secret: &str) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let mut normalized = secret.trim().trim_end_matches('=').to_ascii_uppercase();

    let decoded = BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map(Zeroizing::new)
        .map_err(|e| CryptoError::InvalidSecret(format!("base32 decode: {e}")));
    normalized.zeroize();

    let decoded = decoded?;
    if decoded.is_empty() {
        return Err(CryptoError::InvalidSecret("empty secret".to_string()));
    }
    Ok(decoded)
}

/// Computes the code for the time step containing `unix_time`.
pub fn code_at(secret: &[u8], unix_time: u64, config: &TotpConfig) -> CryptoResult<String> {
    config.check()?;
    if secret.is_empty() {
        return Err(CryptoError::InvalidSecret("empty secret".to_string()));
    }
    hotp(secret, unix_time / config.step_secs, config.digits)
}

/// Verifies a submitted code against the skew window around `unix_time`.
///
/// Returns `Ok(true)` when the code matches any step within the window,
/// `Ok(false)` otherwise. Errors only signal unusable secrets or parameters,
/// never a failed match.
pub fn verify_at(
    secret: &[u8],
    submitted: &str,
    unix_time: u64,
    config: &TotpConfig,
) -> CryptoResult<bool> {
    config.check()?;
    if secret.is_empty() {
        return Err(CryptoError::InvalidSecret("empty secret".to_string()));
    }

    let counter = unix_time / config.step_secs;
    let first = counter.saturating_sub(config.skew_steps);
    let last = counter.saturating_add(config.skew_steps);

    // All candidates are evaluated; no early exit on match
    let mut matched = Choice::from(0u8);
    for step in first..=last {
        let candidate = hotp(secret, step, config.digits)?;
        matched |= candidate.as_bytes().ct_eq(submitted.as_bytes());
    }
    Ok(matched.into())
}

/// HOTP (RFC 4226): HMAC-SHA1 over the big-endian counter with dynamic
/// truncation, reduced to a zero-padded decimal code.
fn hotp(secret: &[u8], counter: u64, digits: u32) -> CryptoResult<String> {
    let mut mac = HmacSha1::new_from_slice(secret)
        .map_err(|_| CryptoError::InvalidSecret("unusable HMAC key".to_string()))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let value = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    let code = u64::from(value) % 10u64.pow(digits);
    let width = digits as usize;
    Ok(format!("{code:0width$}"))
}
