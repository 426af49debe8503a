use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::crypto::password::DEFAULT_PARAMS as PASSWORD_DEFAULTS;
use crate::errors::{HeartSyncError, Result};

/// Crypto cost configuration, loaded from `heartsync.toml`.
///
/// Every field has a sensible default so the core works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Argon2 memory cost for sealing private keys, in KiB (default: 64 MB).
    #[serde(default = "default_vault_memory_kib")]
    pub vault_memory_kib: u32,

    /// Argon2 iteration count for sealing private keys (default: 3).
    #[serde(default = "default_vault_iterations")]
    pub vault_iterations: u32,

    /// Argon2 parallelism for sealing private keys (default: 4).
    #[serde(default = "default_vault_parallelism")]
    pub vault_parallelism: u32,

    /// Argon2 memory cost for login verifiers, in KiB (default: 19 MB).
    #[serde(default = "default_password_memory_kib")]
    pub password_memory_kib: u32,

    /// Argon2 iteration count for login verifiers (default: 2).
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,

    /// Argon2 parallelism for login verifiers (default: 1).
    #[serde(default = "default_password_parallelism")]
    pub password_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_vault_iterations() -> u32 {
    3
}

fn default_vault_parallelism() -> u32 {
    4
}

fn default_password_memory_kib() -> u32 {
    PASSWORD_DEFAULTS.memory_kib
}

fn default_password_iterations() -> u32 {
    PASSWORD_DEFAULTS.iterations
}

fn default_password_parallelism() -> u32 {
    PASSWORD_DEFAULTS.parallelism
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_memory_kib: default_vault_memory_kib(),
            vault_iterations: default_vault_iterations(),
            vault_parallelism: default_vault_parallelism(),
            password_memory_kib: default_password_memory_kib(),
            password_iterations: default_password_iterations(),
            password_parallelism: default_password_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = "heartsync.toml";

    /// Load settings from `<dir>/heartsync.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = Self::path_in(dir);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            HeartSyncError::ConfigError(msg) => HeartSyncError::ConfigError(format!(
                "Failed to parse {}: {msg}",
                config_path.display()
            )),
            other => other,
        })
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| HeartSyncError::ConfigError(e.to_string()))
    }

    /// Full path of the config file inside `dir`.
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(Self::FILE_NAME)
    }

    /// Argon2 cost for the password vault.
    pub fn vault_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.vault_memory_kib,
            iterations: self.vault_iterations,
            parallelism: self.vault_parallelism,
        }
    }

    /// Argon2 cost for login verifiers.
    pub fn password_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.password_memory_kib,
            iterations: self.password_iterations,
            parallelism: self.password_parallelism,
        }
    }

    /// Check both cost sets against the Argon2 minimums.
    pub fn validate(&self) -> Result<()> {
        self.vault_params()
            .validate()
            .and_then(|_| self.password_params().validate())
            .map_err(|e| HeartSyncError::ConfigError(e.to_string()))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
