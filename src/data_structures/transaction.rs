//! The in-memory transaction model
//!
//! A transaction is built mutably (source, fee, memo, operations), stamped
//! with a sequence number at signing time, and then encoded through the
//! canonical codec. Decoding an externally received envelope reconstructs the
//! same shape, signatures included.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::common::NetworkType;
use crate::crypto::signing;
use crate::data_structures::address::StellarAddress;
use crate::data_structures::operation::Operation;
use crate::data_structures::result::TransactionResult;
use crate::errors::{CodecError, WalletError};

/// Maximum byte length of a text memo
pub const MAX_MEMO_TEXT_LEN: usize = 28;

/// Byte length of a detached ed25519 signature
pub const SIGNATURE_LEN: usize = 64;

/// Optional metadata attached to a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    #[default]
    None,
    Text(String),
    Id(u64),
    Hash([u8; 32]),
    ReturnHash([u8; 32]),
}

impl Memo {
    /// Build a text memo, rejecting text longer than 28 bytes
    pub fn text(text: &str) -> Result<Self, WalletError> {
        if text.len() > MAX_MEMO_TEXT_LEN {
            return Err(WalletError::InvalidArgument {
                argument: "text".to_string(),
                value: text.to_string(),
                message: format!("text memos are at most {} bytes", MAX_MEMO_TEXT_LEN),
            });
        }
        Ok(Memo::Text(text.to_string()))
    }

    /// The wire discriminant of this memo
    pub fn discriminant(&self) -> i32 {
        match self {
            Memo::None => 0,
            Memo::Text(_) => 1,
            Memo::Id(_) => 2,
            Memo::Hash(_) => 3,
            Memo::ReturnHash(_) => 4,
        }
    }
}

/// Validity window for a transaction, in ledger close time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

/// Fixed 32-byte transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash([u8; 32]);

impl TransactionHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A signature plus the hint identifying which key produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

/// A transaction: source, fee, sequence, memo, ordered operations and any
/// attached signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    source: StellarAddress,
    fee: u32,
    sequence: i64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    signatures: Vec<DecoratedSignature>,
}

impl Transaction {
    /// Build a new, unsigned transaction.
    ///
    /// The sequence number is stamped later, either by the signing account or
    /// by `set_sequence`.
    pub fn new(
        source: StellarAddress,
        fee: u32,
        time_bounds: Option<TimeBounds>,
        memo: Memo,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            source,
            fee,
            sequence: 0,
            time_bounds,
            memo,
            operations,
            signatures: Vec::new(),
        }
    }

    /// Reconstruct a transaction from a received canonical envelope
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        codec::decode::decode_envelope(bytes)
    }

    /// Used by the decoder, which reads the sequence and signatures off the wire
    pub(crate) fn from_parts(
        source: StellarAddress,
        fee: u32,
        sequence: i64,
        time_bounds: Option<TimeBounds>,
        memo: Memo,
        operations: Vec<Operation>,
        signatures: Vec<DecoratedSignature>,
    ) -> Self {
        Self {
            source,
            fee,
            sequence,
            time_bounds,
            memo,
            operations,
            signatures,
        }
    }

    pub fn source(&self) -> &StellarAddress {
        &self.source
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn set_sequence(&mut self, sequence: i64) {
        self.sequence = sequence;
    }

    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Append a detached signature, preserving order of attachment
    pub fn append_signature(&mut self, signature: DecoratedSignature) {
        self.signatures.push(signature);
    }

    /// Canonical encoding of the transaction body (no signatures)
    pub fn encode_body(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode::encode_transaction(self)
    }

    /// Canonical encoding of the full envelope, signatures included
    pub fn encode_envelope(&self) -> Result<Vec<u8>, CodecError> {
        codec::encode::encode_envelope(self)
    }

    /// Network-scoped transaction identifier, available signed or not
    pub fn hash(&self, network: NetworkType) -> Result<TransactionHash, CodecError> {
        let body = self.encode_body()?;
        Ok(signing::transaction_hash(network, &body))
    }

    /// Parse a base64 result envelope returned by the ledger.
    ///
    /// Result parsing is independent of how (or whether) this transaction was
    /// built; it only interprets the supplied response text.
    pub fn get_result(&self, response_b64: &str) -> Result<TransactionResult, CodecError> {
        codec::result::decode_transaction_result_b64(response_b64)
    }
}

/// A signed transaction envelope ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope {
    bytes: Vec<u8>,
}

impl SignedEnvelope {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn serialized_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn serialized_size(&self) -> usize {
        self.bytes.len()
    }

    /// Base64 text form consumed by the submission transport
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}
