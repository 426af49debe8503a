//! Vault module — password-sealed private keys.
//!
//! This module provides:
//! - The persisted `SealedPrivateKey` record (`format`)
//! - `PasswordVault` for sealing, unsealing and resealing keys (`store`)

pub mod format;
pub mod store;

// Re-export the most commonly used items.
pub use format::{SealedPrivateKey, CURRENT_VERSION};
pub use store::{seal, unseal, PasswordVault};
