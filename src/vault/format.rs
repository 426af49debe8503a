//! The persisted form of a password-sealed private key.
//!
//! A `SealedPrivateKey` carries everything except the password that is
//! needed to recover the key: format version, the Argon2id cost it was
//! sealed with, the salt, the AES-GCM nonce and the ciphertext. In JSON
//! the byte fields are base64 strings:
//!
//! ```text
//! {"version":1,"kdf":{"memory_kib":65536,"iterations":3,"parallelism":4},
//!  "salt":"...","nonce":"...","ciphertext":"..."}
//! ```

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::encoding::{base64_decode, base64_encode};
use crate::errors::{HeartSyncError, Result};

/// Current sealed-key format version.
pub const CURRENT_VERSION: u8 = 1;

/// A private key encrypted under a password-derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPrivateKey {
    /// Format version.
    pub version: u8,

    /// Argon2id parameters used at seal time (unseal re-uses them).
    pub kdf: KdfParams,

    /// Argon2id salt.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// AES-256-GCM nonce.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,

    /// Encrypted private key plus GCM tag.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,
}

impl SealedPrivateKey {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| HeartSyncError::InvalidEncoding(format!("sealed key json: {e}")))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| HeartSyncError::InvalidEncoding(format!("sealed key json: {e}")))
    }
}
