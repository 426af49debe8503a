//! End-to-end encryption core for HeartSync.
//!
//! Provides the pieces the account and messaging layers call into:
//! - X25519 keypair generation (`crypto::keys`)
//! - Argon2id + AES-256-GCM password sealing of private keys (`vault`)
//! - X25519 + XSalsa20-Poly1305 pairwise message boxes (`crypto::pairwise`, `channel`)
//! - Argon2id login verifiers (`crypto::password`)
//! - Record IDs and couple invite codes (`ids`)
//!
//! Every function is stateless and safe to call concurrently. Storage,
//! transport and user-facing error text belong to the caller.

pub mod account;
pub mod channel;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod errors;
pub mod ids;
pub mod vault;

pub use errors::{HeartSyncError, Result};
