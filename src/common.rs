//! Common types shared across the library

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network a transaction is bound to.
///
/// The selector never appears in the transaction body; it is folded into the
/// signing hash, so the same body signed for different networks produces
/// different signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    #[default]
    Testnet,
}

impl NetworkType {
    /// The network passphrase hashed into the network id
    pub fn passphrase(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "Public Global Stellar Network ; September 2015",
            NetworkType::Testnet => "Test SDF Network ; September 2015",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Mainnet => write!(f, "mainnet"),
            NetworkType::Testnet => write!(f, "testnet"),
        }
    }
}

/// Map a network name to a [`NetworkType`], defaulting to testnet
pub fn string_to_network(name: &str) -> NetworkType {
    match name.to_lowercase().as_str() {
        "mainnet" | "public" => NetworkType::Mainnet,
        _ => NetworkType::Testnet,
    }
}
