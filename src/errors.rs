use thiserror::Error;

/// All errors that can occur in the HeartSync crypto core.
#[derive(Debug, Error)]
pub enum HeartSyncError {
    // --- Randomness ---
    #[error("Secure random source unavailable: {0}")]
    GenerationFailure(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong password, wrong keys or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Password hashing failed: {0}")]
    PasswordHashFailed(String),

    // --- Key material and transport encoding ---
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HeartSyncError {
    /// True for failures the caller can recover from by asking the user
    /// again (wrong password) or dropping the message.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HeartSyncError::DecryptionFailed
                | HeartSyncError::InvalidEncoding(_)
                | HeartSyncError::InvalidKey(_)
        )
    }
}

/// Convenience type alias for HeartSync results.
pub type Result<T> = std::result::Result<T, HeartSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_failure_message_does_not_leak_cause() {
        let msg = HeartSyncError::DecryptionFailed.to_string();
        assert!(msg.contains("wrong password"));
        assert!(msg.contains("wrong keys"));
    }

    #[test]
    fn generation_failure_is_fatal() {
        let err = HeartSyncError::GenerationFailure("no entropy".into());
        assert!(!err.is_recoverable());
        assert!(HeartSyncError::DecryptionFailed.is_recoverable());
    }
}
