//! Integration tests for the password vault.

use heartsync_crypto::config::Settings;
use heartsync_crypto::crypto::kdf::MIN_MEMORY_KIB;
use heartsync_crypto::crypto::{generate_keypair, KdfParams, PrivateKey};
use heartsync_crypto::vault::{self, PasswordVault, SealedPrivateKey};
use heartsync_crypto::HeartSyncError;
use proptest::prelude::*;
use tempfile::TempDir;

/// Helper: a vault with the cheapest allowed Argon2 cost.
fn fast_vault() -> PasswordVault {
    PasswordVault::new(KdfParams {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    })
}

// ---------------------------------------------------------------------------
// Seal / unseal round-trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn any_password_and_key_roundtrip(password in ".{0,40}", key in any::<[u8; 32]>()) {
        let vault = fast_vault();
        let private_key = PrivateKey::from_bytes(key);

        let sealed = vault.seal(&private_key, &password).unwrap();
        let recovered = vault.unseal(&sealed, &password).unwrap();
        prop_assert_eq!(recovered.as_bytes(), private_key.as_bytes());
    }
}

#[test]
fn default_cost_roundtrip() {
    let kp = generate_keypair().unwrap();
    let sealed = vault::seal(kp.private_key(), "correct-horse").expect("seal");
    assert_eq!(sealed.kdf, KdfParams::default());

    let recovered = vault::unseal(&sealed, "correct-horse").expect("unseal");
    assert_eq!(recovered.as_bytes(), kp.private_key().as_bytes());
}

#[test]
fn resealing_same_key_produces_different_output() {
    let vault = fast_vault();
    let kp = generate_keypair().unwrap();

    let first = vault.seal(kp.private_key(), "pw").unwrap();
    let second = vault.seal(kp.private_key(), "pw").unwrap();

    assert_eq!(first.nonce.len(), second.nonce.len());
    assert_ne!(first.nonce, second.nonce);
    assert_ne!(first.ciphertext, second.ciphertext);
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_fails() {
    let vault = fast_vault();
    let kp = generate_keypair().unwrap();
    let sealed = vault.seal(kp.private_key(), "correct-horse").unwrap();

    for wrong in ["wrong-password", "correct-hors", "Correct-horse", ""] {
        assert!(
            matches!(vault.unseal(&sealed, wrong), Err(HeartSyncError::DecryptionFailed)),
            "{wrong:?} should not unseal"
        );
    }
}

#[test]
fn corruption_is_indistinguishable_from_wrong_password() {
    let vault = fast_vault();
    let kp = generate_keypair().unwrap();
    let sealed = vault.seal(kp.private_key(), "pw").unwrap();

    let mut bad_ct = sealed.clone();
    bad_ct.ciphertext[0] ^= 0xFF;
    let mut bad_nonce = sealed.clone();
    bad_nonce.nonce[3] ^= 0x01;
    let mut bad_salt = sealed.clone();
    bad_salt.salt[0] ^= 0x01;
    let mut short_nonce = sealed.clone();
    short_nonce.nonce.pop();

    let wrong_pw = vault.unseal(&sealed, "nope").unwrap_err().to_string();
    for corrupted in [bad_ct, bad_nonce, bad_salt, short_nonce] {
        let err = vault.unseal(&corrupted, "pw").unwrap_err();
        assert!(matches!(err, HeartSyncError::DecryptionFailed));
        assert_eq!(err.to_string(), wrong_pw);
    }
}

#[test]
fn unseal_uses_stored_cost_not_vault_cost() {
    let kp = generate_keypair().unwrap();
    let sealed = fast_vault().seal(kp.private_key(), "pw").unwrap();

    // A vault configured with the heavier default still opens it.
    let recovered = PasswordVault::default().unseal(&sealed, "pw").unwrap();
    assert_eq!(recovered.as_bytes(), kp.private_key().as_bytes());
}

// ---------------------------------------------------------------------------
// Persistence shape and settings
// ---------------------------------------------------------------------------

#[test]
fn sealed_key_survives_json_storage() {
    let vault = fast_vault();
    let kp = generate_keypair().unwrap();
    let sealed = vault.seal(kp.private_key(), "pw").unwrap();

    let stored = sealed.to_json().unwrap();
    assert!(!stored.contains(&kp.private_key().to_base64()));

    let loaded = SealedPrivateKey::from_json(&stored).unwrap();
    let recovered = vault.unseal(&loaded, "pw").unwrap();
    assert_eq!(recovered.as_bytes(), kp.private_key().as_bytes());
}

#[test]
fn vault_from_settings_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(Settings::FILE_NAME),
        "vault_memory_kib = 8192\nvault_iterations = 1\nvault_parallelism = 1\n",
    )
    .unwrap();

    let settings = Settings::load(dir.path()).unwrap();
    let vault = PasswordVault::from_settings(&settings);
    assert_eq!(vault.params().memory_kib, 8_192);

    let kp = generate_keypair().unwrap();
    let sealed = vault.seal(kp.private_key(), "pw").unwrap();
    assert_eq!(sealed.kdf, settings.vault_params());
}

#[test]
fn weak_configured_cost_refuses_to_seal() {
    let vault = PasswordVault::new(KdfParams {
        memory_kib: 16,
        iterations: 1,
        parallelism: 1,
    });
    let kp = generate_keypair().unwrap();
    let err = vault.seal(kp.private_key(), "pw").unwrap_err();
    assert!(matches!(err, HeartSyncError::KeyDerivationFailed(_)));
}
