//! X25519 keypairs for pairwise encryption.
//!
//! A `KeyPair` is generated once per account. The public half is stored
//! server-side in the clear; the private half only ever leaves the client
//! sealed by the password vault (see `crate::vault`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::random;
use crate::encoding;
use crate::errors::{HeartSyncError, Result};

/// Length of an X25519 public or private key in bytes.
pub const KEY_LEN: usize = 32;

/// A shareable X25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a public key from an untrusted slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; KEY_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| invalid_length("public key", bytes.len()))
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = encoding::from_base64(text)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encoding::to_base64(&self.0)
    }

    pub(crate) fn to_box_key(self) -> crypto_box::PublicKey {
        crypto_box::PublicKey::from(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        PublicKey::from_base64(&text).map_err(serde::de::Error::custom)
    }
}

/// An X25519 private key.
///
/// Zeroed on drop and never printed. There is deliberately no
/// `Serialize` impl: persist it through `vault::seal` only.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; KEY_LEN]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a private key from an untrusted slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; KEY_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| invalid_length("private key", bytes.len()))
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        let mut bytes = encoding::from_base64(text)?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encoding::to_base64(&self.0)
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.to_box_key().public_key().as_bytes())
    }

    pub(crate) fn to_box_key(&self) -> crypto_box::SecretKey {
        crypto_box::SecretKey::from(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A matching public/private key pair.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Generate a fresh keypair from the OS random source.
    ///
    /// Fails only with `GenerationFailure`; callers must abort account
    /// creation rather than retry with a weaker source.
    pub fn generate() -> Result<Self> {
        let mut seed = random::bytes::<KEY_LEN>()?;
        let pair = Self::from_private(PrivateKey::from_bytes(seed));
        seed.zeroize();
        tracing::debug!("generated keypair");
        Ok(pair)
    }

    /// Rebuild the pair from a private key (e.g. one just unsealed).
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { public, private }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &self.private)
            .finish()
    }
}

/// Generate a new keypair for a user.
pub fn generate_keypair() -> Result<KeyPair> {
    KeyPair::generate()
}

fn invalid_length(what: &str, actual: usize) -> HeartSyncError {
    HeartSyncError::InvalidKey(format!(
        "{what} must be exactly {KEY_LEN} bytes, got {actual}"
    ))
}
