//! Transaction signing
//!
//! Signatures never cover the raw body bytes. The signed payload is the
//! 32-byte network identifier, the envelope type tag, then the encoded body,
//! and what is actually signed is the SHA-256 digest of that payload. The
//! digest doubles as the transaction hash used to identify the transaction.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::common::NetworkType;
use crate::data_structures::transaction::TransactionHash;

/// Envelope type tag mixed into every transaction signing payload
const ENVELOPE_TYPE_TX: u32 = 2;

/// The 32-byte network identifier: the digest of the network passphrase
pub fn network_id(network: NetworkType) -> [u8; 32] {
    Sha256::digest(network.passphrase().as_bytes()).into()
}

fn signing_digest(network: NetworkType, body: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(network_id(network));
    hasher.update(ENVELOPE_TYPE_TX.to_be_bytes());
    hasher.update(body);
    hasher.finalize().into()
}

/// The network-scoped transaction hash of an encoded body
pub fn transaction_hash(network: NetworkType, body: &[u8]) -> TransactionHash {
    TransactionHash::new(signing_digest(network, body))
}

/// Sign an encoded transaction body for a network.
///
/// Ed25519 signing is deterministic: the same key, network and body always
/// produce the same 64 signature bytes.
pub fn sign_transaction_body(key: &SigningKey, network: NetworkType, body: &[u8]) -> [u8; 64] {
    key.sign(&signing_digest(network, body)).to_bytes()
}

/// Verify a signature over an encoded transaction body
pub fn verify_transaction_body(
    key: &VerifyingKey,
    network: NetworkType,
    body: &[u8],
    signature: &[u8],
) -> bool {
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(&signing_digest(network, body), &signature).is_ok()
}
