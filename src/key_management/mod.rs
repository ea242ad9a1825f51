//! Deterministic key derivation from seed phrases
//!
//! Accounts derive from a BIP-39 mnemonic through hardened-only ed25519
//! derivation along m/44'/148'/account'. Every step is hardened, so child
//! public keys cannot be derived without the parent secret.

use bip39::{Language, Mnemonic};
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::KeyManagementError;

type HmacSha512 = Hmac<Sha512>;

const MASTER_KEY: &[u8] = b"ed25519 seed";
const PURPOSE: u32 = 44;
const COIN_TYPE: u32 = 148;
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One node in the derivation tree: secret key material plus chain code
#[derive(Zeroize, ZeroizeOnDrop)]
struct DerivationNode {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl DerivationNode {
    fn master(seed: &[u8]) -> Result<Self, KeyManagementError> {
        let mut mac = HmacSha512::new_from_slice(MASTER_KEY)
            .map_err(|e| KeyManagementError::InvalidKeyMaterial(e.to_string()))?;
        mac.update(seed);
        Ok(Self::from_digest(&mac.finalize().into_bytes()))
    }

    fn child(&self, index: u32) -> Result<Self, KeyManagementError> {
        let mut mac = HmacSha512::new_from_slice(&self.chain_code)
            .map_err(|e| KeyManagementError::InvalidKeyMaterial(e.to_string()))?;
        mac.update(&[0u8]);
        mac.update(&self.key);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        Ok(Self::from_digest(&mac.finalize().into_bytes()))
    }

    fn from_digest(digest: &[u8]) -> Self {
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
        Self { key, chain_code }
    }
}

/// Expand a BIP-39 seed phrase into the 64-byte derivation seed.
///
/// The phrase is validated (word list and checksum); the BIP-39 passphrase is
/// always empty.
pub fn seed_from_phrase(phrase: &str) -> Result<Zeroizing<[u8; 64]>, KeyManagementError> {
    let mnemonic = Mnemonic::parse_in(Language::English, phrase)
        .map_err(|e| KeyManagementError::InvalidSeedPhrase(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_seed("")))
}

/// Derive the signing key for an account index along m/44'/148'/account'
pub fn derive_signing_key(seed: &[u8], account: u32) -> Result<SigningKey, KeyManagementError> {
    let node = DerivationNode::master(seed)?
        .child(PURPOSE)?
        .child(COIN_TYPE)?
        .child(account)?;
    Ok(SigningKey::from_bytes(&node.key))
}
