//! The single gateway to the operating system's CSPRNG.
//!
//! Every nonce, salt, key and identifier in the crate is drawn through
//! here, so a broken entropy source surfaces as one typed error
//! (`GenerationFailure`) instead of a panic or a silent fallback.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{HeartSyncError, Result};

/// Fill `dest` with bytes from the OS random source.
pub fn fill(dest: &mut [u8]) -> Result<()> {
    OsRng.try_fill_bytes(dest).map_err(|e| {
        tracing::error!(error = %e, "OS random source failed");
        HeartSyncError::GenerationFailure(format!("OS RNG failed: {e}"))
    })
}

/// Return `N` fresh random bytes.
pub fn bytes<const N: usize>() -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    fill(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_not_all_zero() {
        let a: [u8; 32] = bytes().unwrap();
        assert_ne!(a, [0u8; 32]);
    }

    #[test]
    fn successive_draws_differ() {
        let a: [u8; 16] = bytes().unwrap();
        let b: [u8; 16] = bytes().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fill_handles_empty_buffer() {
        let mut empty: [u8; 0] = [];
        assert!(fill(&mut empty).is_ok());
    }
}
