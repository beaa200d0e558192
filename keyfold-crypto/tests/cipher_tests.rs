//! Adversarial and round-trip tests for the XChaCha20-Poly1305 cipher.
//!
//! Tests wrong-key decryption, ciphertext/iv/tag tampering, truncation,
//! and the master key encoding contract. These validate the guarantees the
//! second-factor verifier relies on for fail-closed behavior.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use keyfold_crypto::{decrypt, decrypt_string, encrypt, CryptoError, MasterKey, IV_SIZE, TAG_SIZE};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = MasterKey::generate();
    let plaintext = b"per-user second factor secret";

    let secret = encrypt(&key, plaintext).unwrap();
    let recovered = decrypt(&key, &secret).unwrap();

    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn empty_plaintext_roundtrip() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"").unwrap();

    assert!(secret.ciphertext.is_empty());
    assert_eq!(decrypt(&key, &secret).unwrap().as_slice(), b"");
}

#[test]
fn ciphertext_iv_and_tag_are_separately_addressable() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"payload").unwrap();

    assert_eq!(secret.ciphertext.len(), b"payload".len());
    assert_eq!(secret.iv.len(), IV_SIZE);
    assert_eq!(secret.tag.len(), TAG_SIZE);
}

#[test]
fn decrypt_with_wrong_key_fails_authentication() {
    let key_a = MasterKey::generate();
    let key_b = MasterKey::generate();

    let secret = encrypt(&key_a, b"sensitive data that must not leak").unwrap();
    let err = decrypt(&key_b, &secret).unwrap_err();

    assert!(matches!(err, CryptoError::Authentication), "got: {err:?}");
}

#[test]
fn single_bit_flip_in_ciphertext_detected() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"integrity-protected data").unwrap();

    let mut tampered = secret.clone();
    tampered.ciphertext[0] ^= 0x01;

    assert!(matches!(
        decrypt(&key, &tampered),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn single_bit_flip_in_iv_detected() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"integrity-protected data").unwrap();

    let mut tampered = secret.clone();
    tampered.iv[IV_SIZE - 1] ^= 0x80;

    assert!(matches!(
        decrypt(&key, &tampered),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn single_bit_flip_in_tag_detected() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"integrity-protected data").unwrap();

    let mut tampered = secret.clone();
    tampered.tag[7] ^= 0x10;

    assert!(matches!(
        decrypt(&key, &tampered),
        Err(CryptoError::Authentication)
    ));
}

#[test]
fn truncated_ciphertext_detected() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"some longer plaintext for truncation").unwrap();

    let mut truncated = secret.clone();
    truncated.ciphertext.truncate(truncated.ciphertext.len() / 2);

    assert!(decrypt(&key, &truncated).is_err());
}

#[test]
fn each_encrypt_draws_a_fresh_iv() {
    let key = MasterKey::generate();
    let a = encrypt(&key, b"same plaintext").unwrap();
    let b = encrypt(&key, b"same plaintext").unwrap();

    assert_ne!(a.iv, b.iv);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn encrypted_secret_serialization_roundtrip() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"stored as three fields").unwrap();

    let json = serde_json::to_string(&secret).unwrap();
    let restored: keyfold_crypto::EncryptedSecret = serde_json::from_str(&json).unwrap();

    assert_eq!(
        decrypt(&key, &restored).unwrap().as_slice(),
        b"stored as three fields"
    );
}

#[test]
fn decrypt_string_roundtrip() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, b"JBSWY3DPEHPK3PXP").unwrap();

    let text = decrypt_string(&key, &secret).unwrap();
    assert_eq!(text.as_str(), "JBSWY3DPEHPK3PXP");
}

#[test]
fn decrypt_string_rejects_non_utf8() {
    let key = MasterKey::generate();
    let secret = encrypt(&key, &[0xFF, 0xFE, 0x80]).unwrap();

    assert!(matches!(
        decrypt_string(&key, &secret),
        Err(CryptoError::InvalidSecret(_))
    ));
}

#[test]
fn master_key_from_base64_roundtrip() {
    let raw = [42u8; 32];
    let encoded = STANDARD.encode(raw);

    let key = MasterKey::from_base64(&encoded).unwrap();
    let other = MasterKey::from_bytes(raw);

    // Same key material decrypts what the other encrypted
    let secret = encrypt(&key, b"cross-check").unwrap();
    assert_eq!(decrypt(&other, &secret).unwrap().as_slice(), b"cross-check");
}

#[test]
fn master_key_from_base64_rejects_wrong_length() {
    let encoded = STANDARD.encode([1u8; 16]);
    let err = MasterKey::from_base64(&encoded).unwrap_err();

    assert!(matches!(
        err,
        CryptoError::InvalidKeyLength {
            expected: 32,
            actual: 16
        }
    ));
}

#[test]
fn master_key_from_base64_rejects_garbage() {
    assert!(matches!(
        MasterKey::from_base64("not base64 at all!!"),
        Err(CryptoError::KeyFormat(_))
    ));
}

#[test]
fn master_key_debug_does_not_print_bytes() {
    let key = MasterKey::from_bytes([0xAB; 32]);
    let debug = format!("{key:?}");

    assert_eq!(debug, "MasterKey(..)");
    assert!(!debug.contains("171"), "raw byte leaked into Debug output");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_for_any_plaintext(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
            let key = MasterKey::generate();
            let secret = encrypt(&key, &plaintext).unwrap();
            let recovered = decrypt(&key, &secret).unwrap();
            prop_assert_eq!(recovered.as_slice(), plaintext.as_slice());
        }

        #[test]
        fn any_ciphertext_byte_flip_is_detected(
            plaintext in proptest::collection::vec(any::<u8>(), 1..128),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let key = MasterKey::generate();
            let mut secret = encrypt(&key, &plaintext).unwrap();
            let i = index.index(secret.ciphertext.len());
            secret.ciphertext[i] ^= 1 << bit;
            prop_assert!(decrypt(&key, &secret).is_err());
        }
    }
}
