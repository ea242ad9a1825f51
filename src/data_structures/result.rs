//! Parsed transaction results
//!
//! The ledger answers a submission with a result envelope: the fee actually
//! charged, a transaction-level code, and (when the transaction reached its
//! operations) one result per operation in submission order.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_structures::address::StellarAddress;
use crate::data_structures::asset::Asset;
use crate::data_structures::operation::{OperationType, Price};

/// Transaction-level result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum TransactionResultCode {
    Success = 0,
    Failed = -1,
    TooEarly = -2,
    TooLate = -3,
    MissingOperation = -4,
    BadSequence = -5,
    BadAuth = -6,
    InsufficientBalance = -7,
    NoAccount = -8,
    InsufficientFee = -9,
    BadAuthExtra = -10,
    InternalError = -11,
}

#[derive(Debug, Error)]
#[error("Invalid TransactionResultCode: {code}")]
pub struct ResultCodeError {
    pub code: i32,
}

impl TryFrom<i32> for TransactionResultCode {
    type Error = ResultCodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionResultCode::Success),
            -1 => Ok(TransactionResultCode::Failed),
            -2 => Ok(TransactionResultCode::TooEarly),
            -3 => Ok(TransactionResultCode::TooLate),
            -4 => Ok(TransactionResultCode::MissingOperation),
            -5 => Ok(TransactionResultCode::BadSequence),
            -6 => Ok(TransactionResultCode::BadAuth),
            -7 => Ok(TransactionResultCode::InsufficientBalance),
            -8 => Ok(TransactionResultCode::NoAccount),
            -9 => Ok(TransactionResultCode::InsufficientFee),
            -10 => Ok(TransactionResultCode::BadAuthExtra),
            -11 => Ok(TransactionResultCode::InternalError),
            code => Err(ResultCodeError { code }),
        }
    }
}

impl TransactionResultCode {
    /// Only Success and Failed carry per-operation results on the wire
    pub fn has_operation_results(&self) -> bool {
        matches!(
            self,
            TransactionResultCode::Success | TransactionResultCode::Failed
        )
    }
}

/// An order-book offer crossed while executing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedOffer {
    pub seller: StellarAddress,
    pub offer_id: i64,
    pub asset_sold: Asset,
    pub amount_sold: i64,
    pub asset_bought: Asset,
    pub amount_bought: i64,
}

/// The offer left resting on the book after a manage-offer operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferEntry {
    pub seller: StellarAddress,
    pub offer_id: i64,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: i64,
    pub price: Price,
    pub flags: u32,
}

/// Outcome of a manage-offer operation: what was crossed and what remains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManageOfferOutcome {
    pub claimed: Vec<ClaimedOffer>,
    /// The resting offer; `None` when the offer was fully consumed (deleted)
    pub offer: Option<OfferEntry>,
}

/// Terminal delivery of a path payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePaymentOutcome {
    pub destination: StellarAddress,
    pub asset: Asset,
    pub amount: i64,
}

/// One inflation payout line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationPayout {
    pub destination: StellarAddress,
    pub amount: i64,
}

/// Operation-specific success payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationOutcome {
    /// Operations whose success carries no payload
    None,
    PathPayment {
        claimed: Vec<ClaimedOffer>,
        delivered: SimplePaymentOutcome,
    },
    ManageOffer(ManageOfferOutcome),
    AccountMerge {
        source_account_balance: i64,
    },
    Inflation {
        payouts: Vec<InflationPayout>,
    },
}

/// Result of a single operation within a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// The operation this result belongs to, absent when the operation was
    /// rejected before dispatch (bad auth, missing source account)
    pub operation_type: Option<OperationType>,
    /// 0 on success, operation-specific negatives otherwise
    pub code: i32,
    pub outcome: OperationOutcome,
}

impl OperationResult {
    pub fn succeeded(&self) -> bool {
        self.code == 0
    }
}

/// The full parsed result envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    fee_charged: i64,
    result_code: TransactionResultCode,
    results: Vec<OperationResult>,
}

impl TransactionResult {
    pub(crate) fn new(
        fee_charged: i64,
        result_code: TransactionResultCode,
        results: Vec<OperationResult>,
    ) -> Self {
        Self {
            fee_charged,
            result_code,
            results,
        }
    }

    /// Fee actually charged, in minor units
    pub fn fee_charged(&self) -> i64 {
        self.fee_charged
    }

    pub fn result_code(&self) -> TransactionResultCode {
        self.result_code
    }

    pub fn succeeded(&self) -> bool {
        self.result_code == TransactionResultCode::Success
    }

    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }

    pub fn result(&self, index: usize) -> Option<&OperationResult> {
        self.results.get(index)
    }

    /// Number of operation results present in the envelope.
    ///
    /// Zero for any code other than Success or Failed, since those envelopes
    /// carry no per-operation results.
    pub fn operation_count(&self) -> usize {
        self.results.len()
    }
}
