//! Typed operations carried by a transaction
//!
//! Operations form a tagged union keyed by a small integer discriminant. New
//! variants are added as new enum cases; an unknown discriminant on the wire
//! is a decode error, never undefined behavior.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_structures::address::StellarAddress;
use crate::data_structures::asset::Asset;

/// Operation discriminants as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    PathPayment = 2,
    ManageSellOffer = 3,
    CreatePassiveSellOffer = 4,
    SetOptions = 5,
    ChangeTrust = 6,
    AllowTrust = 7,
    AccountMerge = 8,
    Inflation = 9,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
}

#[derive(Debug, Error)]
#[error("Invalid OperationType: {code}")]
pub struct OperationTypeError {
    pub code: i32,
}

impl TryFrom<i32> for OperationType {
    type Error = OperationTypeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OperationType::CreateAccount),
            1 => Ok(OperationType::Payment),
            2 => Ok(OperationType::PathPayment),
            3 => Ok(OperationType::ManageSellOffer),
            4 => Ok(OperationType::CreatePassiveSellOffer),
            5 => Ok(OperationType::SetOptions),
            6 => Ok(OperationType::ChangeTrust),
            7 => Ok(OperationType::AllowTrust),
            8 => Ok(OperationType::AccountMerge),
            9 => Ok(OperationType::Inflation),
            10 => Ok(OperationType::ManageData),
            11 => Ok(OperationType::BumpSequence),
            12 => Ok(OperationType::ManageBuyOffer),
            code => Err(OperationTypeError { code }),
        }
    }
}

/// Price as a rational number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub numerator: i32,
    pub denominator: i32,
}

/// A signer key attached through SetOptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignerKey {
    Ed25519([u8; 32]),
    PreAuthTx([u8; 32]),
    HashX([u8; 32]),
}

impl SignerKey {
    pub fn discriminant(&self) -> i32 {
        match self {
            SignerKey::Ed25519(_) => 0,
            SignerKey::PreAuthTx(_) => 1,
            SignerKey::HashX(_) => 2,
        }
    }

    pub fn key_bytes(&self) -> &[u8; 32] {
        match self {
            SignerKey::Ed25519(bytes) | SignerKey::PreAuthTx(bytes) | SignerKey::HashX(bytes) => {
                bytes
            }
        }
    }
}

/// A signer and its weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signer {
    pub key: SignerKey,
    pub weight: u32,
}

/// The nine independently-optional SetOptions fields, in wire order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptionsFields {
    pub inflation_destination: Option<StellarAddress>,
    pub clear_flags: Option<u32>,
    pub set_flags: Option<u32>,
    pub master_weight: Option<u32>,
    pub low_threshold: Option<u32>,
    pub medium_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub home_domain: Option<String>,
    pub signer: Option<Signer>,
}

impl SetOptionsFields {
    /// Which of the nine optional fields materialized, in wire order
    pub fn presence_bitmap(&self) -> [bool; 9] {
        [
            self.inflation_destination.is_some(),
            self.clear_flags.is_some(),
            self.set_flags.is_some(),
            self.master_weight.is_some(),
            self.low_threshold.is_some(),
            self.medium_threshold.is_some(),
            self.high_threshold.is_some(),
            self.home_domain.is_some(),
            self.signer.is_some(),
        ]
    }
}

/// Asset reference inside an AllowTrust operation (code only, no issuer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowTrustAsset {
    CreditAlphanum4([u8; 4]),
    CreditAlphanum12([u8; 12]),
}

/// Variant-specific payload of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationBody {
    CreateAccount {
        destination: StellarAddress,
        starting_balance: i64,
    },
    Payment {
        destination: StellarAddress,
        asset: Asset,
        amount: i64,
    },
    PathPayment {
        send_asset: Asset,
        send_max: i64,
        destination: StellarAddress,
        destination_asset: Asset,
        destination_amount: i64,
        path: Vec<Asset>,
    },
    ManageSellOffer {
        selling: Asset,
        buying: Asset,
        amount: i64,
        price: Price,
        offer_id: i64,
    },
    CreatePassiveSellOffer {
        selling: Asset,
        buying: Asset,
        amount: i64,
        price: Price,
    },
    SetOptions(SetOptionsFields),
    ChangeTrust {
        line: Asset,
        limit: i64,
    },
    AllowTrust {
        trustor: StellarAddress,
        asset: AllowTrustAsset,
        authorize: bool,
    },
    AccountMerge {
        destination: StellarAddress,
    },
    Inflation,
    ManageData {
        name: String,
        value: Option<Vec<u8>>,
    },
    BumpSequence {
        bump_to: i64,
    },
    ManageBuyOffer {
        selling: Asset,
        buying: Asset,
        buy_amount: i64,
        price: Price,
        offer_id: i64,
    },
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount { .. } => OperationType::CreateAccount,
            OperationBody::Payment { .. } => OperationType::Payment,
            OperationBody::PathPayment { .. } => OperationType::PathPayment,
            OperationBody::ManageSellOffer { .. } => OperationType::ManageSellOffer,
            OperationBody::CreatePassiveSellOffer { .. } => OperationType::CreatePassiveSellOffer,
            OperationBody::SetOptions(_) => OperationType::SetOptions,
            OperationBody::ChangeTrust { .. } => OperationType::ChangeTrust,
            OperationBody::AllowTrust { .. } => OperationType::AllowTrust,
            OperationBody::AccountMerge { .. } => OperationType::AccountMerge,
            OperationBody::Inflation => OperationType::Inflation,
            OperationBody::ManageData { .. } => OperationType::ManageData,
            OperationBody::BumpSequence { .. } => OperationType::BumpSequence,
            OperationBody::ManageBuyOffer { .. } => OperationType::ManageBuyOffer,
        }
    }
}

/// One typed action within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Acting account, defaulting to the transaction source when absent
    pub source: Option<StellarAddress>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self { source: None, body }
    }

    pub fn with_source(source: StellarAddress, body: OperationBody) -> Self {
        Self {
            source: Some(source),
            body,
        }
    }

    /// Convenience constructor for a payment
    pub fn payment(destination: StellarAddress, asset: Asset, amount: i64) -> Self {
        Self::new(OperationBody::Payment {
            destination,
            asset,
            amount,
        })
    }

    /// Convenience constructor for account creation
    pub fn create_account(destination: StellarAddress, starting_balance: i64) -> Self {
        Self::new(OperationBody::CreateAccount {
            destination,
            starting_balance,
        })
    }

    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }
}
