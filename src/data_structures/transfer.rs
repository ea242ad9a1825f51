//! Settled transfers recorded against a wallet
//!
//! A transfer is one settled movement of value between two accounts,
//! identified by the hash of the transaction that carried it. Equality is
//! identity for deduplication: two records with the same transaction hash and
//! endpoints are the same transfer even if other fields differ.

use serde::{Deserialize, Serialize};

use crate::data_structures::address::StellarAddress;
use crate::data_structures::transaction::TransactionHash;

/// One settled movement of value between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    transaction_id: TransactionHash,
    source: StellarAddress,
    target: StellarAddress,
    amount: i64,
    fee: i64,
}

impl Transfer {
    pub fn new(
        transaction_id: TransactionHash,
        source: StellarAddress,
        target: StellarAddress,
        amount: i64,
        fee: i64,
    ) -> Self {
        Self {
            transaction_id,
            source,
            target,
            amount,
            fee,
        }
    }

    pub fn transaction_id(&self) -> &TransactionHash {
        &self.transaction_id
    }

    pub fn source(&self) -> &StellarAddress {
        &self.source
    }

    pub fn target(&self) -> &StellarAddress {
        &self.target
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn fee(&self) -> i64 {
        self.fee
    }
}

/// Identity is (transaction, source, target); the amount is not consulted, so
/// a re-announcement of a known transfer with a corrected amount still matches
impl PartialEq for Transfer {
    fn eq(&self, other: &Self) -> bool {
        self.transaction_id == other.transaction_id
            && self.source == other.source
            && self.target == other.target
    }
}

impl Eq for Transfer {}
