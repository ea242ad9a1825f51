//! Ledger-state tests: folding announced transfers under concurrency

use std::sync::Arc;
use std::thread;

use stellar_wallet_libs::data_structures::transaction::TransactionHash;
use stellar_wallet_libs::data_structures::{StellarAddress, Transfer};
use stellar_wallet_libs::wallet::StellarWallet;
use stellar_wallet_libs::StellarAccount;

const PHRASE: &str = "off enjoy fatal deliver team nothing auto canvas oak brass fashion happy";

fn wallet() -> StellarWallet {
    StellarWallet::new(StellarAccount::from_seed_phrase(PHRASE).unwrap())
}

fn peer(byte: u8) -> StellarAddress {
    StellarAddress::from_public_key([byte; 32])
}

fn hash(byte: u8) -> TransactionHash {
    TransactionHash::new([byte; 32])
}

#[test]
fn balance_folds_in_both_directions() {
    let wallet = wallet();
    wallet.set_balance(10_000);

    assert!(wallet.add_transfer(Transfer::new(
        hash(1),
        peer(9),
        wallet.target_address(),
        5_000,
        100,
    )));
    assert_eq!(wallet.balance(), 15_000);

    assert!(wallet.add_transfer(Transfer::new(
        hash(2),
        wallet.source_address(),
        peer(9),
        4_000,
        100,
    )));
    assert_eq!(wallet.balance(), 11_000);
    assert_eq!(wallet.transfer_count(), 2);
}

#[test]
fn same_transfer_announced_by_many_threads_folds_once() {
    let wallet = Arc::new(wallet());
    let transfer = Transfer::new(hash(1), peer(9), wallet.target_address(), 5_000, 100);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let wallet = Arc::clone(&wallet);
            let transfer = transfer.clone();
            thread::spawn(move || wallet.add_transfer(transfer))
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&folded| folded)
        .count();

    // Exactly one announcement wins, the rest are recognized as duplicates
    assert_eq!(accepted, 1);
    assert_eq!(wallet.transfer_count(), 1);
    assert_eq!(wallet.balance(), 5_000);
    assert!(wallet.has_transfer(&transfer));
}

#[test]
fn concurrent_distinct_transfers_all_fold() {
    let wallet = Arc::new(wallet());
    let target = wallet.target_address();

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let wallet = Arc::clone(&wallet);
            thread::spawn(move || {
                wallet.add_transfer(Transfer::new(hash(i), peer(9), target, 100, 10))
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(wallet.transfer_count(), 8);
    assert_eq!(wallet.balance(), 800);
}

#[test]
fn replay_with_changed_amount_does_not_move_balance() {
    let wallet = wallet();
    let first = Transfer::new(hash(1), peer(9), wallet.target_address(), 5_000, 100);
    let replay = Transfer::new(hash(1), peer(9), wallet.target_address(), 7_777, 100);

    assert!(wallet.add_transfer(first));
    assert!(!wallet.add_transfer(replay));
    assert_eq!(wallet.balance(), 5_000);
    assert_eq!(wallet.transfer_count(), 1);
}

#[test]
fn transfers_snapshot_preserves_arrival_order() {
    let wallet = wallet();
    for i in 0..4u8 {
        wallet.add_transfer(Transfer::new(hash(i), peer(9), wallet.target_address(), 100, 10));
    }
    let transfers = wallet.transfers();
    assert_eq!(transfers.len(), 4);
    for (i, transfer) in transfers.iter().enumerate() {
        assert_eq!(transfer.transaction_id(), &hash(i as u8));
    }
}
