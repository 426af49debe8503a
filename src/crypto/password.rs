//! Login password verifiers.
//!
//! Verifiers are Argon2id PHC strings with a per-hash random salt. This is
//! kept separate from the vault KDF on purpose: the two can change cost or
//! algorithm independently without breaking sealed keys.
//!
//! Accounts created by the first-generation clients carry a legacy
//! verifier, `base64(SHA-512(password))`. `verify_password` still accepts
//! those (compared in constant time) and `needs_rehash` flags them so the
//! login flow can store a fresh PHC verifier.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Params;
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use crate::crypto::kdf::KdfParams;
use crate::crypto::random;
use crate::encoding;
use crate::errors::{HeartSyncError, Result};

/// Salt length for PHC verifiers, in bytes.
const SALT_LEN: usize = 16;

/// Length of a base64 SHA-512 legacy verifier.
const LEGACY_LEN: usize = 88;

/// Default cost for login verifiers (OWASP Argon2id baseline: 19 MiB, t=2, p=1).
pub const DEFAULT_PARAMS: KdfParams = KdfParams {
    memory_kib: 19_456,
    iterations: 2,
    parallelism: 1,
};

/// Hashes and verifies login passwords with a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    params: KdfParams,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PARAMS)
    }
}

impl PasswordHasher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    /// Produce a PHC verifier for `password`.
    pub fn hash(&self, password: &str) -> Result<String> {
        let argon2 = self.params.argon2(None)?;
        let salt_bytes = random::bytes::<SALT_LEN>()?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HeartSyncError::PasswordHashFailed(format!("salt encoding: {e}")))?;

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HeartSyncError::PasswordHashFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check `password` against a stored verifier.
    ///
    /// Malformed verifiers simply fail to match.
    pub fn verify(&self, password: &str, verifier: &str) -> bool {
        if is_legacy(verifier) {
            tracing::warn!("verifying against legacy SHA-512 password verifier");
            return legacy_hash(password)
                .as_bytes()
                .ct_eq(verifier.as_bytes())
                .into();
        }

        let parsed = match PasswordHash::new(verifier) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable password verifier");
                return false;
            }
        };

        // The PHC string carries its own cost; refuse costs we would never
        // have produced before handing it to Argon2.
        match stored_params(&parsed).map(|p| p.validate()) {
            Some(Ok(())) => {}
            _ => {
                tracing::debug!("password verifier cost out of bounds");
                return false;
            }
        }

        argon2::Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// True when `verifier` should be replaced by a fresh `hash` at the
    /// next successful login.
    pub fn needs_rehash(&self, verifier: &str) -> bool {
        if is_legacy(verifier) {
            return true;
        }
        let Ok(parsed) = PasswordHash::new(verifier) else {
            return true;
        };
        if parsed.algorithm.as_str() != "argon2id" {
            return true;
        }
        match stored_params(&parsed) {
            Some(stored) => !stored.at_least(&self.params),
            None => true,
        }
    }
}

/// Hash a password for storage with the default cost.
pub fn hash_password(password: &str) -> Result<String> {
    PasswordHasher::default().hash(password)
}

/// Verify a password against a stored verifier.
pub fn verify_password(password: &str, verifier: &str) -> bool {
    PasswordHasher::default().verify(password, verifier)
}

fn stored_params(parsed: &PasswordHash<'_>) -> Option<KdfParams> {
    let p = Params::try_from(parsed).ok()?;
    Some(KdfParams {
        memory_kib: p.m_cost(),
        iterations: p.t_cost(),
        parallelism: p.p_cost(),
    })
}

fn is_legacy(verifier: &str) -> bool {
    !verifier.starts_with('$') && verifier.len() == LEGACY_LEN
}

fn legacy_hash(password: &str) -> String {
    encoding::to_base64(&Sha512::digest(password.as_bytes()))
}
