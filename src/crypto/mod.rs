//! Cryptographic primitives for HeartSync.
//!
//! This module provides:
//! - OS-backed secure randomness (`random`)
//! - X25519 keypairs (`keys`)
//! - X25519 + XSalsa20-Poly1305 pairwise boxes (`pairwise`)
//! - Argon2id password-based key derivation (`kdf`)
//! - AES-256-GCM sealing used by the password vault (`encryption`)
//! - Argon2id login verifiers (`password`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod pairwise;
pub mod password;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use heartsync_crypto::crypto::{encrypt, decrypt, generate_keypair, ...};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams};
pub use keys::{generate_keypair, KeyPair, PrivateKey, PublicKey};
pub use pairwise::{decrypt, decrypt_bytes, encrypt, encrypt_bytes, EncryptedPayload};
pub use password::{hash_password, verify_password, PasswordHasher};
