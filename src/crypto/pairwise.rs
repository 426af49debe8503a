//! Authenticated public-key encryption between the two partners.
//!
//! Uses X25519 key agreement + XSalsa20-Poly1305 (NaCl `crypto_box`), the
//! same construction as TweetNaCl's `nacl.box`, so payloads produced by the
//! web and mobile clients open here and vice versa.
//!
//! Key pairing direction: the box is always built as
//! `SalsaBox::new(their_public, my_secret)`. The sender passes
//! (recipient public, sender private); the recipient passes
//! (sender public, recipient private). X25519 yields the same shared secret
//! for both pairings, which is what makes the conversation mutual.

use crypto_box::aead::{Aead, Nonce};
use crypto_box::SalsaBox;
use serde::{Deserialize, Serialize};

use crate::crypto::keys::{PrivateKey, PublicKey};
use crate::crypto::random;
use crate::encoding::{base64_decode, base64_encode};
use crate::errors::{HeartSyncError, Result};

type BoxNonce = Nonce<SalsaBox>;

/// Length of the XSalsa20 nonce in bytes.
pub const NONCE_LEN: usize = 24;

/// Length of the Poly1305 tag prepended to every ciphertext.
pub const TAG_LEN: usize = 16;

/// The on-wire/on-disk form of a message, letter or flag-context body.
///
/// Serializes as `{"ciphertext": "<base64>", "nonce": "<base64>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Poly1305 tag followed by the encrypted bytes.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    /// The nonce this ciphertext is bound to.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,
}

impl EncryptedPayload {
    /// Serialize to the JSON shape the clients exchange.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| HeartSyncError::InvalidEncoding(format!("payload json: {e}")))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| HeartSyncError::InvalidEncoding(format!("payload json: {e}")))
    }
}

/// Encrypt a text message for your partner.
pub fn encrypt(
    plaintext: &str,
    recipient_public: &PublicKey,
    sender_private: &PrivateKey,
) -> Result<EncryptedPayload> {
    encrypt_bytes(plaintext.as_bytes(), recipient_public, sender_private)
}

/// Decrypt a text message from your partner.
///
/// Authentication failures and non-UTF-8 plaintexts are both
/// `DecryptionFailed`; no partial output is ever returned.
pub fn decrypt(
    payload: &EncryptedPayload,
    sender_public: &PublicKey,
    recipient_private: &PrivateKey,
) -> Result<String> {
    let bytes = decrypt_bytes(payload, sender_public, recipient_private)?;
    String::from_utf8(bytes).map_err(|_| HeartSyncError::DecryptionFailed)
}

/// Encrypt an arbitrary binary body.
pub fn encrypt_bytes(
    plaintext: &[u8],
    recipient_public: &PublicKey,
    sender_private: &PrivateKey,
) -> Result<EncryptedPayload> {
    let salsa_box = SalsaBox::new(&recipient_public.to_box_key(), &sender_private.to_box_key());
    seal_with(&salsa_box, plaintext)
}

/// Decrypt an arbitrary binary body.
pub fn decrypt_bytes(
    payload: &EncryptedPayload,
    sender_public: &PublicKey,
    recipient_private: &PrivateKey,
) -> Result<Vec<u8>> {
    let salsa_box = SalsaBox::new(&sender_public.to_box_key(), &recipient_private.to_box_key());
    open_with(&salsa_box, payload)
}

/// Encrypt under an already-established box with a fresh random nonce.
pub(crate) fn seal_with(salsa_box: &SalsaBox, plaintext: &[u8]) -> Result<EncryptedPayload> {
    let nonce = random::bytes::<NONCE_LEN>()?;

    let ciphertext = salsa_box
        .encrypt(BoxNonce::from_slice(&nonce), plaintext)
        .map_err(|e| HeartSyncError::EncryptionFailed(format!("box seal failed: {e}")))?;

    tracing::trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "sealed pairwise payload"
    );

    Ok(EncryptedPayload {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

/// Open a payload under an already-established box.
pub(crate) fn open_with(salsa_box: &SalsaBox, payload: &EncryptedPayload) -> Result<Vec<u8>> {
    // `from_slice` panics on a wrong length, so check first.
    if payload.nonce.len() != NONCE_LEN || payload.ciphertext.len() < TAG_LEN {
        tracing::debug!(
            nonce_len = payload.nonce.len(),
            ciphertext_len = payload.ciphertext.len(),
            "rejected malformed pairwise payload"
        );
        return Err(HeartSyncError::DecryptionFailed);
    }

    salsa_box
        .decrypt(
            BoxNonce::from_slice(&payload.nonce),
            payload.ciphertext.as_slice(),
        )
        .map_err(|_| {
            tracing::debug!(
                ciphertext_len = payload.ciphertext.len(),
                "pairwise payload failed authentication"
            );
            HeartSyncError::DecryptionFailed
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;

    fn pair() -> (KeyPair, KeyPair) {
        (KeyPair::generate().unwrap(), KeyPair::generate().unwrap())
    }

    #[test]
    fn ciphertext_carries_tag_overhead() {
        let (a, b) = pair();
        let payload = encrypt("hello", b.public_key(), a.private_key()).unwrap();
        assert_eq!(payload.ciphertext.len(), 5 + TAG_LEN);
        assert_eq!(payload.nonce.len(), NONCE_LEN);
    }

    #[test]
    fn recipient_can_open() {
        let (a, b) = pair();
        let payload = encrypt("hello", b.public_key(), a.private_key()).unwrap();
        let text = decrypt(&payload, a.public_key(), b.private_key()).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn sender_can_reopen_own_message() {
        // Same shared secret from the other side of the pairing.
        let (a, b) = pair();
        let payload = encrypt("mine", b.public_key(), a.private_key()).unwrap();
        let text = decrypt(&payload, b.public_key(), a.private_key()).unwrap();
        assert_eq!(text, "mine");
    }

    #[test]
    fn empty_payload_fields_fail_cleanly() {
        let (a, b) = pair();
        let empty = EncryptedPayload {
            ciphertext: Vec::new(),
            nonce: Vec::new(),
        };
        assert!(matches!(
            decrypt(&empty, a.public_key(), b.private_key()),
            Err(HeartSyncError::DecryptionFailed)
        ));
    }

    #[test]
    fn non_utf8_plaintext_is_a_decryption_failure_for_text() {
        let (a, b) = pair();
        let payload = encrypt_bytes(&[0xFF, 0xFE], b.public_key(), a.private_key()).unwrap();
        assert!(decrypt(&payload, a.public_key(), b.private_key()).is_err());
        assert_eq!(
            decrypt_bytes(&payload, a.public_key(), b.private_key()).unwrap(),
            vec![0xFF, 0xFE]
        );
    }

    #[test]
    fn json_shape_matches_client_envelope() {
        let payload = EncryptedPayload {
            ciphertext: vec![1, 2, 3],
            nonce: vec![0u8; NONCE_LEN],
        };
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(json["ciphertext"], "AQID");
        assert_eq!(json["nonce"], "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
        assert_eq!(EncryptedPayload::from_json(&payload.to_json().unwrap()).unwrap(), payload);
    }

    #[test]
    fn from_json_rejects_bad_base64() {
        let err = EncryptedPayload::from_json(r#"{"ciphertext":"%%%","nonce":"AA=="}"#).unwrap_err();
        assert!(matches!(err, HeartSyncError::InvalidEncoding(_)));
    }
}
