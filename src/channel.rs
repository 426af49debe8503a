//! A per-partner messaging channel.
//!
//! Holds the precomputed box for (own private key, partner public key) so
//! a chat session does not redo the X25519 agreement for every message.
//! Both partners build their own channel and the two interoperate.

use std::fmt;

use crypto_box::SalsaBox;

use crate::crypto::keys::{KeyPair, PrivateKey, PublicKey};
use crate::crypto::pairwise::{self, EncryptedPayload};
use crate::errors::{HeartSyncError, Result};

pub struct PartnerChannel {
    partner: PublicKey,
    salsa_box: SalsaBox,
}

impl PartnerChannel {
    pub fn new(own_private: &PrivateKey, partner_public: PublicKey) -> Self {
        let salsa_box = SalsaBox::new(&partner_public.to_box_key(), &own_private.to_box_key());
        Self {
            partner: partner_public,
            salsa_box,
        }
    }

    pub fn from_key_pair(own: &KeyPair, partner_public: PublicKey) -> Self {
        Self::new(own.private_key(), partner_public)
    }

    pub fn partner(&self) -> &PublicKey {
        &self.partner
    }

    pub fn seal_text(&self, plaintext: &str) -> Result<EncryptedPayload> {
        pairwise::seal_with(&self.salsa_box, plaintext.as_bytes())
    }

    pub fn open_text(&self, payload: &EncryptedPayload) -> Result<String> {
        let bytes = pairwise::open_with(&self.salsa_box, payload)?;
        String::from_utf8(bytes).map_err(|_| HeartSyncError::DecryptionFailed)
    }

    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<EncryptedPayload> {
        pairwise::seal_with(&self.salsa_box, plaintext)
    }

    pub fn open_bytes(&self, payload: &EncryptedPayload) -> Result<Vec<u8>> {
        pairwise::open_with(&self.salsa_box, payload)
    }
}

impl fmt::Debug for PartnerChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerChannel")
            .field("partner", &self.partner)
            .finish_non_exhaustive()
    }
}
