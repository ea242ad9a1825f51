//! Cryptographic operations: network identifiers, signing payloads,
//! transaction hashes and ed25519 signatures

pub mod signing;

pub use signing::{network_id, sign_transaction_body, transaction_hash, verify_transaction_body};
