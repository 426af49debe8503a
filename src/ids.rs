//! Record identifiers and couple invite codes.
//!
//! Identifiers are 128 random bits in unpadded base64url (22 chars), safe
//! in URLs and as primary keys. Invite codes are 32 random bits as 8
//! uppercase hex digits: short enough to read aloud, and only valid for a
//! pairing window in which the account layer checks them for collisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::crypto::random;
use crate::errors::Result;

/// Random bytes behind an identifier.
const ID_BYTES: usize = 16;

/// Length of an encoded identifier.
pub const ID_LEN: usize = 22;

/// Random bytes behind an invite code.
const INVITE_BYTES: usize = 4;

/// Length of an invite code.
pub const INVITE_CODE_LEN: usize = 8;

/// Generate a random, URL-safe record identifier.
pub fn new_id() -> Result<String> {
    let bytes = random::bytes::<ID_BYTES>()?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generate a random couple invite code, e.g. `"3FA94C0B"`.
pub fn new_invite_code() -> Result<String> {
    let bytes = random::bytes::<INVITE_BYTES>()?;
    Ok(bytes.iter().map(|b| format!("{b:02X}")).collect())
}

/// True if `code` is exactly 8 characters of `0-9A-F`.
pub fn is_valid_invite_code(code: &str) -> bool {
    code.len() == INVITE_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

/// Clean up a user-typed invite code.
///
/// Trims whitespace, drops inner spaces and dashes, and uppercases.
/// Returns `None` when the result is not a well-formed code.
pub fn normalize_invite_code(input: &str) -> Option<String> {
    let code: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    is_valid_invite_code(&code).then_some(code)
}
