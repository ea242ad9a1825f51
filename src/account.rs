//! Account handling: key material, session state and transaction signing
//!
//! An account owns a signing key plus the per-session state a submission
//! needs: the next sequence number and the target network. Signing stamps
//! both into the transaction so the produced envelope is self-consistent.

use ed25519_dalek::SigningKey;

use crate::common::NetworkType;
use crate::crypto::signing;
use crate::data_structures::address::StellarAddress;
use crate::data_structures::transaction::{DecoratedSignature, SignedEnvelope, Transaction};
use crate::errors::{KeyManagementError, WalletError};
use crate::key_management;

/// A Stellar account: signing key plus session sequence and network
pub struct StellarAccount {
    signing_key: SigningKey,
    network: NetworkType,
    sequence: i64,
}

impl StellarAccount {
    /// Create the primary account (index 0) of a seed phrase
    pub fn from_seed_phrase(phrase: &str) -> Result<Self, KeyManagementError> {
        Self::from_seed_phrase_at(phrase, 0)
    }

    /// Create the account at a derivation index of a seed phrase
    pub fn from_seed_phrase_at(phrase: &str, index: u32) -> Result<Self, KeyManagementError> {
        let seed = key_management::seed_from_phrase(phrase)?;
        let signing_key = key_management::derive_signing_key(seed.as_ref(), index)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Create an account from raw seed bytes at a derivation index
    pub fn from_seed(seed: &[u8], index: u32) -> Result<Self, KeyManagementError> {
        let signing_key = key_management::derive_signing_key(seed, index)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Create an account directly from 32 bytes of secret key material
    pub fn from_secret_key(secret: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(secret))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        Self {
            signing_key,
            network: NetworkType::default(),
            sequence: 0,
        }
    }

    /// The account's public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The account's address
    pub fn primary_address(&self) -> StellarAddress {
        StellarAddress::from_public_key(self.public_key())
    }

    /// Trailing public key bytes identifying this account's signatures
    pub fn signature_hint(&self) -> [u8; 4] {
        self.primary_address().signature_hint()
    }

    /// Detached signature over arbitrary bytes, with no network scoping
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        use ed25519_dalek::Signer;
        self.signing_key.sign(message).to_bytes()
    }

    pub fn network(&self) -> NetworkType {
        self.network
    }

    pub fn set_network(&mut self, network: NetworkType) {
        self.network = network;
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Record the sequence number the next transaction must carry
    pub fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }

    /// Sign a transaction for submission.
    ///
    /// The account's sequence number and network are stamped into the
    /// transaction first, then the signature is computed over the canonical
    /// body and attached with this account's hint.
    pub fn sign_transaction(&self, tx: &mut Transaction) -> Result<SignedEnvelope, WalletError> {
        tx.set_sequence(self.sequence);
        let body = tx.encode_body()?;
        let signature = signing::sign_transaction_body(&self.signing_key, self.network, &body);
        tx.append_signature(DecoratedSignature {
            hint: self.signature_hint(),
            signature: signature.to_vec(),
        });
        Ok(SignedEnvelope::new(tx.encode_envelope()?))
    }
}
