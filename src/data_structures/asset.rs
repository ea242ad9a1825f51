//! Assets referenced by operations
//!
//! An asset is either the ledger-native unit or a credit asset identified by
//! a short code and an issuing account. On the wire the code is a fixed-width
//! field (4 or 12 bytes) padded with NULs.

use serde::{Deserialize, Serialize};

use crate::data_structures::address::StellarAddress;
use crate::errors::WalletError;

/// Discriminant for the native asset
pub const ASSET_TYPE_NATIVE: i32 = 0;
/// Discriminant for a credit asset with a code of up to 4 bytes
pub const ASSET_TYPE_CREDIT_ALPHANUM4: i32 = 1;
/// Discriminant for a credit asset with a code of 5 to 12 bytes
pub const ASSET_TYPE_CREDIT_ALPHANUM12: i32 = 2;

/// An asset: the native unit or an issued credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Native,
    CreditAlphanum4 {
        code: [u8; 4],
        issuer: StellarAddress,
    },
    CreditAlphanum12 {
        code: [u8; 12],
        issuer: StellarAddress,
    },
}

impl Asset {
    /// Build an asset from a code and optional issuer.
    ///
    /// No issuer means the native asset, whatever the code says; otherwise
    /// the code length picks the alphanum4 or alphanum12 form.
    pub fn new(code: &str, issuer: Option<StellarAddress>) -> Result<Self, WalletError> {
        let issuer = match issuer {
            None => return Ok(Asset::Native),
            Some(issuer) => issuer,
        };
        let bytes = code.as_bytes();
        if bytes.is_empty() || bytes.len() > 12 {
            return Err(WalletError::InvalidArgument {
                argument: "code".to_string(),
                value: code.to_string(),
                message: "asset codes are 1 to 12 bytes".to_string(),
            });
        }
        if bytes.len() <= 4 {
            let mut code = [0u8; 4];
            code[..bytes.len()].copy_from_slice(bytes);
            Ok(Asset::CreditAlphanum4 { code, issuer })
        } else {
            let mut code = [0u8; 12];
            code[..bytes.len()].copy_from_slice(bytes);
            Ok(Asset::CreditAlphanum12 { code, issuer })
        }
    }

    /// The wire discriminant of this asset
    pub fn discriminant(&self) -> i32 {
        match self {
            Asset::Native => ASSET_TYPE_NATIVE,
            Asset::CreditAlphanum4 { .. } => ASSET_TYPE_CREDIT_ALPHANUM4,
            Asset::CreditAlphanum12 { .. } => ASSET_TYPE_CREDIT_ALPHANUM12,
        }
    }

    /// The asset code with trailing NUL padding stripped, empty for native
    pub fn code(&self) -> String {
        let raw: &[u8] = match self {
            Asset::Native => return String::new(),
            Asset::CreditAlphanum4 { code, .. } => code,
            Asset::CreditAlphanum12 { code, .. } => code,
        };
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }

    /// The issuing account, `None` for the native asset
    pub fn issuer(&self) -> Option<&StellarAddress> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } => Some(issuer),
            Asset::CreditAlphanum12 { issuer, .. } => Some(issuer),
        }
    }
}
