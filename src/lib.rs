//! Lightweight wallet libraries for Stellar
//!
//! This crate provides lightweight wallet functionality for the Stellar
//! network, including account key derivation, canonical transaction encoding
//! and signing, result parsing, and thread-safe wallet ledger state.

pub mod account;
pub mod codec;
pub mod common;
pub mod crypto;
pub mod data_structures;
pub mod errors;
pub mod key_management;
pub mod wallet;

pub use account::StellarAccount;
pub use common::NetworkType;
pub use data_structures::*;
pub use errors::*;
pub use wallet::{FeeBasis, StellarWallet};
