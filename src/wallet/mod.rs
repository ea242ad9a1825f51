//! Wallet ledger state
//!
//! A wallet owns one account and folds announced transfers into a running
//! balance. The ledger (balance, default fee, transfer list) lives behind a
//! single mutex so the duplicate scan, the append and the balance adjustment
//! are one atomic step even when announcements arrive from several threads.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::account::StellarAccount;
use crate::data_structures::address::StellarAddress;
use crate::data_structures::transfer::Transfer;

/// Default per-operation fee, in minor units
pub const DEFAULT_FEE: i64 = 100;

/// Fee schedule for outgoing transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBasis {
    /// Fee charged per unit of cost
    pub price_per_cost_factor: i64,
    /// Multiplier for the operation count
    pub cost_factor: u32,
}

impl FeeBasis {
    /// The flat fee this basis yields
    pub fn fee(&self) -> i64 {
        self.price_per_cost_factor * self.cost_factor as i64
    }
}

impl Default for FeeBasis {
    fn default() -> Self {
        Self {
            price_per_cost_factor: DEFAULT_FEE,
            cost_factor: 1,
        }
    }
}

#[derive(Debug)]
struct LedgerState {
    balance: i64,
    fee_basis: FeeBasis,
    transfers: Vec<Transfer>,
}

/// A single-account wallet with a thread-safe ledger
pub struct StellarWallet {
    account: StellarAccount,
    ledger: Mutex<LedgerState>,
}

impl StellarWallet {
    /// Create a wallet owning the given account, with an empty ledger
    pub fn new(account: StellarAccount) -> Self {
        Self {
            account,
            ledger: Mutex::new(LedgerState {
                balance: 0,
                fee_basis: FeeBasis::default(),
                transfers: Vec::new(),
            }),
        }
    }

    pub fn account(&self) -> &StellarAccount {
        &self.account
    }

    pub fn account_mut(&mut self) -> &mut StellarAccount {
        &mut self.account
    }

    /// The address funds are sent from
    pub fn source_address(&self) -> StellarAddress {
        self.account.primary_address()
    }

    /// The address funds are received at; the same as the source address
    /// since the ledger has no separate receive addresses
    pub fn target_address(&self) -> StellarAddress {
        self.account.primary_address()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        // a panicked announcer leaves consistent state behind
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current balance in minor units
    pub fn balance(&self) -> i64 {
        self.lock().balance
    }

    /// Overwrite the balance with an externally observed value
    pub fn set_balance(&self, balance: i64) {
        self.lock().balance = balance;
    }

    pub fn fee_basis(&self) -> FeeBasis {
        self.lock().fee_basis
    }

    pub fn set_fee_basis(&self, fee_basis: FeeBasis) {
        self.lock().fee_basis = fee_basis;
    }

    /// Fold an announced transfer into the ledger.
    ///
    /// Duplicates (same transaction, source and target) are dropped and
    /// reported as `false`. An accepted outgoing transfer decreases the
    /// balance, any other accepted transfer increases it.
    pub fn add_transfer(&self, transfer: Transfer) -> bool {
        let own = self.account.primary_address();
        let mut ledger = self.lock();
        if ledger.transfers.contains(&transfer) {
            return false;
        }
        if *transfer.source() == own {
            ledger.balance -= transfer.amount();
        } else {
            ledger.balance += transfer.amount();
        }
        ledger.transfers.push(transfer);
        true
    }

    /// Whether an equal transfer has already been folded in
    pub fn has_transfer(&self, transfer: &Transfer) -> bool {
        self.lock().transfers.contains(transfer)
    }

    pub fn transfer_count(&self) -> usize {
        self.lock().transfers.len()
    }

    /// Snapshot of the folded transfers, in arrival order
    pub fn transfers(&self) -> Vec<Transfer> {
        self.lock().transfers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::transaction::TransactionHash;

    const PHRASE: &str = "off enjoy fatal deliver team nothing auto canvas oak brass fashion happy";

    fn wallet() -> StellarWallet {
        StellarWallet::new(StellarAccount::from_seed_phrase(PHRASE).unwrap())
    }

    fn other() -> StellarAddress {
        StellarAddress::from_public_key([9u8; 32])
    }

    fn hash(byte: u8) -> TransactionHash {
        TransactionHash::new([byte; 32])
    }

    #[test]
    fn test_incoming_increases_balance() {
        let wallet = wallet();
        let incoming = Transfer::new(hash(1), other(), wallet.target_address(), 500, 100);
        assert!(wallet.add_transfer(incoming));
        assert_eq!(wallet.balance(), 500);
        assert_eq!(wallet.transfer_count(), 1);
    }

    #[test]
    fn test_outgoing_decreases_balance() {
        let wallet = wallet();
        wallet.set_balance(1000);
        let outgoing = Transfer::new(hash(1), wallet.source_address(), other(), 300, 100);
        assert!(wallet.add_transfer(outgoing));
        assert_eq!(wallet.balance(), 700);
    }

    #[test]
    fn test_duplicate_is_dropped() {
        let wallet = wallet();
        let incoming = Transfer::new(hash(1), other(), wallet.target_address(), 500, 100);
        assert!(wallet.add_transfer(incoming.clone()));
        assert!(!wallet.add_transfer(incoming.clone()));
        assert_eq!(wallet.balance(), 500);
        assert_eq!(wallet.transfer_count(), 1);
        assert!(wallet.has_transfer(&incoming));
    }

    #[test]
    fn test_duplicate_with_different_amount_is_still_dropped() {
        // identity ignores the amount, so a re-announcement with a changed
        // amount neither double-counts nor corrects the balance
        let wallet = wallet();
        let first = Transfer::new(hash(1), other(), wallet.target_address(), 500, 100);
        let second = Transfer::new(hash(1), other(), wallet.target_address(), 999, 100);
        assert!(wallet.add_transfer(first));
        assert!(!wallet.add_transfer(second));
        assert_eq!(wallet.balance(), 500);
    }

    #[test]
    fn test_set_balance_overwrites() {
        let wallet = wallet();
        let incoming = Transfer::new(hash(1), other(), wallet.target_address(), 500, 100);
        wallet.add_transfer(incoming);
        wallet.set_balance(42);
        assert_eq!(wallet.balance(), 42);
    }

    #[test]
    fn test_fee_basis() {
        let wallet = wallet();
        assert_eq!(wallet.fee_basis().fee(), DEFAULT_FEE);
        wallet.set_fee_basis(FeeBasis {
            price_per_cost_factor: 200,
            cost_factor: 3,
        });
        assert_eq!(wallet.fee_basis().fee(), 600);
    }

    #[test]
    fn test_source_and_target_are_the_account_address() {
        let wallet = wallet();
        assert_eq!(wallet.source_address(), wallet.target_address());
        assert_eq!(
            wallet.source_address().to_encoded(),
            "GASA77VXZ5AXDANQWCJSANPYXQEGWBGRNQMLDW4MMKPRCBPCNB5NC77I"
        );
    }
}
