//! Account enrollment and unlock.
//!
//! Bundles the signup steps: a new record ID, a fresh keypair, the private
//! key sealed under the chosen password, a login verifier and, for the
//! partner who creates the couple, an invite code. `AccountRecord` is the
//! part that may leave the device; the plaintext private key never does.

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::crypto::keys::{KeyPair, PublicKey};
use crate::crypto::password::PasswordHasher;
use crate::errors::{HeartSyncError, Result};
use crate::ids;
use crate::vault::{PasswordVault, SealedPrivateKey};

/// Everything produced at signup. Holds the live keypair.
#[derive(Debug)]
pub struct Enrollment {
    pub user_id: String,
    pub key_pair: KeyPair,
    pub sealed_private_key: SealedPrivateKey,
    pub password_verifier: String,
    pub invite_code: Option<String>,
}

/// The storable, shareable part of an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub user_id: String,
    pub public_key: PublicKey,
    pub sealed_private_key: SealedPrivateKey,
    pub password_verifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invite_code: Option<String>,
}

impl Enrollment {
    /// Run the signup key ceremony for `password`.
    ///
    /// Any `GenerationFailure` aborts the whole enrollment.
    pub fn create(password: &str, settings: &Settings) -> Result<Self> {
        let user_id = ids::new_id()?;
        let key_pair = KeyPair::generate()?;
        let sealed_private_key =
            PasswordVault::from_settings(settings).seal(key_pair.private_key(), password)?;
        let password_verifier = PasswordHasher::new(settings.password_params()).hash(password)?;

        tracing::info!(user_id = %user_id, "enrolled new account");

        Ok(Self {
            user_id,
            key_pair,
            sealed_private_key,
            password_verifier,
            invite_code: None,
        })
    }

    /// Attach a fresh couple invite code (the "create couple" path).
    pub fn with_invite_code(mut self) -> Result<Self> {
        self.invite_code = Some(ids::new_invite_code()?);
        Ok(self)
    }

    pub fn public_record(&self) -> AccountRecord {
        AccountRecord {
            user_id: self.user_id.clone(),
            public_key: *self.key_pair.public_key(),
            sealed_private_key: self.sealed_private_key.clone(),
            password_verifier: self.password_verifier.clone(),
            invite_code: self.invite_code.clone(),
        }
    }
}

/// Check `password` against `record` and recover the keypair.
///
/// A wrong password, a corrupted seal, and a sealed key that does not
/// match the stored public key all fail with `DecryptionFailed`.
pub fn unlock(record: &AccountRecord, password: &str, settings: &Settings) -> Result<KeyPair> {
    let hasher = PasswordHasher::new(settings.password_params());
    if !hasher.verify(password, &record.password_verifier) {
        tracing::debug!(user_id = %record.user_id, "password rejected");
        return Err(HeartSyncError::DecryptionFailed);
    }

    let private_key =
        PasswordVault::from_settings(settings).unseal(&record.sealed_private_key, password)?;
    let key_pair = KeyPair::from_private(private_key);

    if key_pair.public_key() != &record.public_key {
        tracing::warn!(user_id = %record.user_id, "sealed key does not match public key");
        return Err(HeartSyncError::DecryptionFailed);
    }

    Ok(key_pair)
}
