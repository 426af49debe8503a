//! Text-safe encodings for transport.
//!
//! The core works on raw bytes. Anything that crosses a JSON or text
//! boundary (public keys, payload fields, sealed keys) goes through
//! standard padded base64, the same alphabet the web and mobile clients
//! use. The serde helpers below let structs carry `Vec<u8>` fields that
//! serialize as base64 strings.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::errors::{HeartSyncError, Result};

/// Encode bytes as standard padded base64.
pub fn to_base64(data: &[u8]) -> String {
    BASE64.encode(data)
}

/// Decode standard padded base64.
pub fn from_base64(text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text.trim())
        .map_err(|e| HeartSyncError::InvalidEncoding(format!("base64: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
