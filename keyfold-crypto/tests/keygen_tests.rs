//! Tests for CSPRNG key generation.

use keyfold_crypto::{generate_key, CryptoError, ProjectKey, MIN_KEY_SIZE, PROJECT_KEY_SIZE};
use std::collections::HashSet;

#[test]
fn generates_requested_length() {
    for len in [16, 24, 32, 64] {
        assert_eq!(generate_key(len).unwrap().len(), len);
    }
}

#[test]
fn rejects_short_lengths() {
    for len in [0, 1, 8, MIN_KEY_SIZE - 1] {
        let err = generate_key(len).unwrap_err();
        assert!(
            matches!(err, CryptoError::InvalidKeyLength { .. }),
            "len {len}: {err:?}"
        );
    }
}

#[test]
fn repeated_generation_never_collides() {
    let mut seen = HashSet::new();
    for _ in 0..256 {
        let key = generate_key(PROJECT_KEY_SIZE).unwrap();
        assert!(seen.insert(key.to_vec()), "CSPRNG produced a repeated key");
    }
}

#[test]
fn generated_key_is_not_all_zero() {
    // A zeroed buffer coming back means the RNG was never invoked
    let key = generate_key(PROJECT_KEY_SIZE).unwrap();
    assert!(key.iter().any(|&b| b != 0));
}

#[test]
fn project_key_has_expected_length() {
    let key = ProjectKey::generate(PROJECT_KEY_SIZE).unwrap();
    assert_eq!(key.len(), PROJECT_KEY_SIZE);
    assert!(!key.is_empty());
}

#[test]
fn project_key_debug_does_not_print_bytes() {
    let key = ProjectKey::generate(PROJECT_KEY_SIZE).unwrap();
    assert_eq!(format!("{key:?}"), "ProjectKey(32 bytes)");
}
