//! AES-256-GCM authenticated encryption for at-rest sealing.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! returns it next to the ciphertext; callers store both. `decrypt`
//! reports every failure as `DecryptionFailed`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::crypto::random;
use crate::errors::{HeartSyncError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns `(nonce, ciphertext || tag)`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| HeartSyncError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = random::bytes::<NONCE_LEN>()?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| HeartSyncError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok((nonce, ciphertext))
}

/// Decrypt data produced by `encrypt`, given the nonce stored with it.
pub fn decrypt(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(HeartSyncError::DecryptionFailed);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| HeartSyncError::DecryptionFailed)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| HeartSyncError::DecryptionFailed)
}
