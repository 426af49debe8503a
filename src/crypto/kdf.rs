//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects sealed private keys against
//! offline guessing. Parameters are configurable via `KdfParams` (loaded
//! from `heartsync.toml` or sensible defaults) and are stored alongside
//! every sealed key so unsealing always re-derives with the same cost.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::random;
use crate::errors::{HeartSyncError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum accepted memory cost in KiB (4 GB).
pub const MAX_MEMORY_KIB: u32 = 4_194_304;

/// Maximum accepted number of iterations.
pub const MAX_ITERATIONS: u32 = 64;

/// Maximum accepted parallelism lanes.
pub const MAX_PARALLELISM: u32 = 64;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// Reject dangerously weak or unreasonably expensive settings before
    /// any hashing happens. Stored params are untrusted input.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(HeartSyncError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(HeartSyncError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at most {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(HeartSyncError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(HeartSyncError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }

    /// Build a configured Argon2id instance producing `output_len` bytes.
    pub(crate) fn argon2(&self, output_len: Option<usize>) -> Result<Argon2<'static>> {
        self.validate()?;
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, output_len)
            .map_err(|e| {
                HeartSyncError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
            })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// True when `self` costs at least as much as `other` on every axis.
    pub fn at_least(&self, other: &KdfParams) -> bool {
        self.memory_kib >= other.memory_kib
            && self.iterations >= other.iterations
            && self.parallelism >= other.parallelism
    }
}

/// Derive a 32-byte key from a password and salt with the default params.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    derive_key_with_params(password, salt, &KdfParams::default())
}

/// Derive a 32-byte key with explicit Argon2id parameters.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let argon2 = params.argon2(Some(KEY_LEN))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, &mut key[..])
        .map_err(|e| HeartSyncError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random::bytes::<SALT_LEN>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_kib: MIN_MEMORY_KIB,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn defaults_match_documented_cost() {
        let p = KdfParams::default();
        assert_eq!((p.memory_kib, p.iterations, p.parallelism), (65_536, 3, 4));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn weak_memory_is_rejected() {
        let weak = KdfParams {
            memory_kib: 1024,
            ..FAST
        };
        let err = derive_key_with_params(b"pw", &[0u8; SALT_LEN], &weak).unwrap_err();
        assert!(err.to_string().contains("memory_kib must be at least"));
    }

    #[test]
    fn zero_iterations_or_lanes_rejected() {
        assert!(KdfParams { iterations: 0, ..FAST }.validate().is_err());
        assert!(KdfParams { parallelism: 0, ..FAST }.validate().is_err());
    }

    #[test]
    fn oversized_costs_are_rejected_before_hashing() {
        let huge_memory = KdfParams {
            memory_kib: u32::MAX,
            ..FAST
        };
        let err = derive_key_with_params(b"pw", &[0u8; SALT_LEN], &huge_memory).unwrap_err();
        assert!(err.to_string().contains("memory_kib must be at most"));

        let huge_iterations = KdfParams {
            iterations: u32::MAX,
            ..FAST
        };
        let err = derive_key_with_params(b"pw", &[0u8; SALT_LEN], &huge_iterations).unwrap_err();
        assert!(err.to_string().contains("iterations must be between"));

        assert!(KdfParams { parallelism: u32::MAX, ..FAST }.validate().is_err());
        assert!(KdfParams {
            memory_kib: MAX_MEMORY_KIB,
            iterations: MAX_ITERATIONS,
            parallelism: MAX_PARALLELISM,
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = [9u8; SALT_LEN];
        let a = derive_key_with_params(b"correct-horse", &salt, &FAST).unwrap();
        let b = derive_key_with_params(b"correct-horse", &salt, &FAST).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn salt_changes_key() {
        let a = derive_key_with_params(b"pw", &[1u8; SALT_LEN], &FAST).unwrap();
        let b = derive_key_with_params(b"pw", &[2u8; SALT_LEN], &FAST).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn at_least_compares_every_axis() {
        let strong = KdfParams::default();
        assert!(strong.at_least(&FAST));
        assert!(!FAST.at_least(&strong));
    }
}
