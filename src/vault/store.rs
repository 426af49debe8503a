//! Sealing and unsealing private keys under a password.
//!
//! `seal` draws a fresh salt and nonce, derives a key with Argon2id and
//! encrypts the 32 private-key bytes with AES-256-GCM. `unseal` re-derives
//! from the stored salt and cost. Every unseal failure is reported as
//! `DecryptionFailed`: a wrong password and corrupted data look the same.

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::kdf::{derive_key_with_params, generate_salt, KdfParams, SALT_LEN};
use crate::crypto::keys::PrivateKey;
use crate::errors::{HeartSyncError, Result};

use super::format::{SealedPrivateKey, CURRENT_VERSION};

/// Seals private keys with a fixed Argon2id cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordVault {
    params: KdfParams,
}

impl PasswordVault {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// Build a vault using the `vault_*` cost from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.vault_params())
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Encrypt `private_key` under `password`.
    ///
    /// Output differs on every call (fresh salt and nonce).
    pub fn seal(&self, private_key: &PrivateKey, password: &str) -> Result<SealedPrivateKey> {
        let salt = generate_salt()?;
        let key = derive_key_with_params(password.as_bytes(), &salt, &self.params)?;
        let (nonce, ciphertext) = encrypt(key.as_slice(), private_key.as_bytes())?;

        tracing::debug!(
            memory_kib = self.params.memory_kib,
            iterations = self.params.iterations,
            "sealed private key"
        );

        Ok(SealedPrivateKey {
            version: CURRENT_VERSION,
            kdf: self.params,
            salt: salt.to_vec(),
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Recover the private key from `sealed` with `password`.
    ///
    /// Uses the cost recorded in `sealed`, not this vault's, so keys sealed
    /// under older settings keep opening.
    pub fn unseal(&self, sealed: &SealedPrivateKey, password: &str) -> Result<PrivateKey> {
        if sealed.version != CURRENT_VERSION || sealed.salt.len() != SALT_LEN {
            tracing::debug!(version = sealed.version, "rejected sealed key header");
            return Err(HeartSyncError::DecryptionFailed);
        }

        // Invalid stored params are indistinguishable from corruption.
        let key = derive_key_with_params(password.as_bytes(), &sealed.salt, &sealed.kdf)
            .map_err(|_| HeartSyncError::DecryptionFailed)?;

        let plaintext = Zeroizing::new(decrypt(key.as_slice(), &sealed.nonce, &sealed.ciphertext)?);

        let private_key =
            PrivateKey::from_slice(&plaintext).map_err(|_| HeartSyncError::DecryptionFailed)?;

        tracing::debug!("unsealed private key");
        Ok(private_key)
    }

    /// Re-seal under a new password (password change).
    pub fn reseal(
        &self,
        sealed: &SealedPrivateKey,
        old_password: &str,
        new_password: &str,
    ) -> Result<SealedPrivateKey> {
        let private_key = self.unseal(sealed, old_password)?;
        self.seal(&private_key, new_password)
    }

    /// True when `sealed` was produced with a weaker cost than this vault's.
    pub fn needs_reseal(&self, sealed: &SealedPrivateKey) -> bool {
        sealed.version != CURRENT_VERSION || !sealed.kdf.at_least(&self.params)
    }
}

/// Seal with the default Argon2id cost.
pub fn seal(private_key: &PrivateKey, password: &str) -> Result<SealedPrivateKey> {
    PasswordVault::default().seal(private_key, password)
}

/// Unseal a key sealed by `seal` (or any `PasswordVault`).
pub fn unseal(sealed: &SealedPrivateKey, password: &str) -> Result<PrivateKey> {
    PasswordVault::default().unseal(sealed, password)
}
