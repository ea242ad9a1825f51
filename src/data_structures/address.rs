//! Stellar addresses and their strkey text form
//!
//! An address is the raw 32-byte ed25519 public key of an account. The text
//! form ("G...") is a base32 encoding of a version byte, the key, and a
//! 2-byte CRC16 checksum, 56 characters in total.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AddressError;

/// Number of raw bytes in an address (an ed25519 public key)
pub const ADDRESS_LEN: usize = 32;

/// Number of characters in the strkey text form
pub const ENCODED_ADDRESS_LEN: usize = 56;

/// Version byte for an ed25519 public key strkey ('G' prefix)
const VERSION_ED25519_PUBLIC_KEY: u8 = 6 << 3;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// A Stellar account address: the raw ed25519 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StellarAddress {
    key: [u8; ADDRESS_LEN],
}

impl StellarAddress {
    /// Create an address directly from a 32-byte public key
    pub fn from_public_key(key: [u8; ADDRESS_LEN]) -> Self {
        Self { key }
    }

    /// Parse an address from its strkey text form
    pub fn from_encoded(encoded: &str) -> Result<Self, AddressError> {
        if encoded.len() != ENCODED_ADDRESS_LEN {
            return Err(AddressError::InvalidLength {
                expected: ENCODED_ADDRESS_LEN,
                actual: encoded.len(),
            });
        }
        let payload = base32_decode(encoded)?;
        // version byte + key + 2-byte checksum
        if payload.len() != 1 + ADDRESS_LEN + 2 {
            return Err(AddressError::InvalidLength {
                expected: ENCODED_ADDRESS_LEN,
                actual: encoded.len(),
            });
        }
        if payload[0] != VERSION_ED25519_PUBLIC_KEY {
            return Err(AddressError::InvalidVersionByte(payload[0]));
        }
        let expected = checksum(&payload[..1 + ADDRESS_LEN]);
        let actual = u16::from_le_bytes([payload[33], payload[34]]);
        if expected != actual {
            return Err(AddressError::InvalidChecksum);
        }
        let mut key = [0u8; ADDRESS_LEN];
        key.copy_from_slice(&payload[1..1 + ADDRESS_LEN]);
        Ok(Self { key })
    }

    /// The raw public key bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.key
    }

    /// Render the strkey text form
    pub fn to_encoded(&self) -> String {
        let mut payload = Vec::with_capacity(1 + ADDRESS_LEN + 2);
        payload.push(VERSION_ED25519_PUBLIC_KEY);
        payload.extend_from_slice(&self.key);
        let crc = checksum(&payload);
        payload.extend_from_slice(&crc.to_le_bytes());
        base32_encode(&payload)
    }

    /// Trailing 4 bytes of the public key, used as a signature hint
    pub fn signature_hint(&self) -> [u8; 4] {
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&self.key[ADDRESS_LEN - 4..]);
        hint
    }
}

impl fmt::Display for StellarAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_encoded())
    }
}

/// CRC16-XModem over the version byte and key
fn checksum(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0usize;
    for &byte in data {
        acc = (acc << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[(acc >> bits) as usize & 0x1f] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[(acc << (5 - bits)) as usize & 0x1f] as char);
    }
    out
}

fn base32_decode(text: &str) -> Result<Vec<u8>, AddressError> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits = 0usize;
    for ch in text.chars() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&a| a as char == ch)
            .ok_or(AddressError::InvalidCharacter(ch))?;
        acc = (acc << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Ok(out)
}
