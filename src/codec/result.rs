//! Result envelope decoding
//!
//! A result envelope carries the fee charged, the transaction-level code and,
//! when the transaction reached its operations, one result per operation.
//! Codes other than success and failed end the envelope after the code.

use std::convert::TryFrom;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::codec::decode::{read_account_id, read_asset, read_price};
use crate::codec::XdrReader;
use crate::data_structures::operation::OperationType;
use crate::data_structures::result::{
    ClaimedOffer, InflationPayout, ManageOfferOutcome, OfferEntry, OperationOutcome,
    OperationResult, SimplePaymentOutcome, TransactionResult, TransactionResultCode,
};
use crate::errors::CodecError;

/// Decode a result envelope from canonical bytes
pub fn decode_transaction_result(bytes: &[u8]) -> Result<TransactionResult, CodecError> {
    let mut reader = XdrReader::new(bytes);
    let fee_charged = reader.read_i64()?;
    let code = reader.read_i32()?;
    let result_code =
        TransactionResultCode::try_from(code).map_err(|_| CodecError::UnknownDiscriminant {
            union: "transaction result",
            value: code,
        })?;
    let results = if result_code.has_operation_results() {
        // smallest per-operation result: a lone rejection discriminant
        let count = reader.read_count("results", 4)?;
        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            results.push(read_operation_result(&mut reader)?);
        }
        results
    } else {
        Vec::new()
    };
    // reserved extension point
    let ext = reader.read_u32()?;
    if ext != 0 {
        return Err(CodecError::UnknownDiscriminant {
            union: "result extension",
            value: ext as i32,
        });
    }
    if !reader.is_exhausted() {
        return Err(CodecError::TrailingBytes(reader.remaining()));
    }
    Ok(TransactionResult::new(fee_charged, result_code, results))
}

/// Decode a result envelope from the base64 text a submission endpoint returns
pub fn decode_transaction_result_b64(text: &str) -> Result<TransactionResult, CodecError> {
    let bytes = BASE64
        .decode(text.trim())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    decode_transaction_result(&bytes)
}

fn read_operation_result(reader: &mut XdrReader) -> Result<OperationResult, CodecError> {
    let outer = reader.read_i32()?;
    if outer != 0 {
        // rejected before dispatch; nothing further on the wire
        return Ok(OperationResult {
            operation_type: None,
            code: outer,
            outcome: OperationOutcome::None,
        });
    }
    let type_code = reader.read_i32()?;
    let operation_type =
        OperationType::try_from(type_code).map_err(|_| CodecError::UnknownDiscriminant {
            union: "operation result",
            value: type_code,
        })?;
    let code = reader.read_i32()?;
    let outcome = if code == 0 {
        read_success_outcome(reader, operation_type)?
    } else {
        OperationOutcome::None
    };
    Ok(OperationResult {
        operation_type: Some(operation_type),
        code,
        outcome,
    })
}

fn read_success_outcome(
    reader: &mut XdrReader,
    operation_type: OperationType,
) -> Result<OperationOutcome, CodecError> {
    match operation_type {
        OperationType::PathPayment => {
            let claimed = read_claimed_offers(reader)?;
            let delivered = SimplePaymentOutcome {
                destination: read_account_id(reader)?,
                asset: read_asset(reader)?,
                amount: reader.read_i64()?,
            };
            Ok(OperationOutcome::PathPayment { claimed, delivered })
        }
        OperationType::ManageSellOffer
        | OperationType::CreatePassiveSellOffer
        | OperationType::ManageBuyOffer => {
            let claimed = read_claimed_offers(reader)?;
            let offer = match reader.read_i32()? {
                // created or updated: the resting offer follows
                0 | 1 => Some(read_offer_entry(reader)?),
                2 => None, // deleted
                value => {
                    return Err(CodecError::UnknownDiscriminant {
                        union: "offer effect",
                        value,
                    })
                }
            };
            Ok(OperationOutcome::ManageOffer(ManageOfferOutcome {
                claimed,
                offer,
            }))
        }
        OperationType::AccountMerge => Ok(OperationOutcome::AccountMerge {
            source_account_balance: reader.read_i64()?,
        }),
        OperationType::Inflation => {
            // account id (36 bytes) plus amount
            let count = reader.read_count("payouts", 44)?;
            let mut payouts = Vec::with_capacity(count);
            for _ in 0..count {
                payouts.push(InflationPayout {
                    destination: read_account_id(reader)?,
                    amount: reader.read_i64()?,
                });
            }
            Ok(OperationOutcome::Inflation { payouts })
        }
        _ => Ok(OperationOutcome::None),
    }
}

fn read_claimed_offers(reader: &mut XdrReader) -> Result<Vec<ClaimedOffer>, CodecError> {
    // seller, offer id, two native assets, two amounts
    let count = reader.read_count("claimed offers", 68)?;
    let mut claimed = Vec::with_capacity(count);
    for _ in 0..count {
        claimed.push(ClaimedOffer {
            seller: read_account_id(reader)?,
            offer_id: reader.read_i64()?,
            asset_sold: read_asset(reader)?,
            amount_sold: reader.read_i64()?,
            asset_bought: read_asset(reader)?,
            amount_bought: reader.read_i64()?,
        });
    }
    Ok(claimed)
}

fn read_offer_entry(reader: &mut XdrReader) -> Result<OfferEntry, CodecError> {
    let seller = read_account_id(reader)?;
    let offer_id = reader.read_i64()?;
    let selling = read_asset(reader)?;
    let buying = read_asset(reader)?;
    let amount = reader.read_i64()?;
    let price = read_price(reader)?;
    let flags = reader.read_u32()?;
    let ext = reader.read_u32()?;
    if ext != 0 {
        return Err(CodecError::UnknownDiscriminant {
            union: "offer entry extension",
            value: ext as i32,
        });
    }
    Ok(OfferEntry {
        seller,
        offer_id,
        selling,
        buying,
        amount,
        price,
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // fee 100, txBAD_SEQ, no results, zero extension
    const BAD_SEQ_HEX: &str = "0000000000000064fffffffb00000000";

    #[test]
    fn test_bad_sequence_envelope() {
        let bytes = hex::decode(BAD_SEQ_HEX).unwrap();
        let result = decode_transaction_result(&bytes).unwrap();
        assert_eq!(result.fee_charged(), 100);
        assert_eq!(result.result_code(), TransactionResultCode::BadSequence);
        assert_eq!(result.operation_count(), 0);
        assert!(!result.succeeded());
    }

    #[test]
    fn test_success_with_payment() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes()); // success
        bytes.extend_from_slice(&1u32.to_be_bytes()); // one result
        bytes.extend_from_slice(&0i32.to_be_bytes()); // dispatched
        bytes.extend_from_slice(&1i32.to_be_bytes()); // payment
        bytes.extend_from_slice(&0i32.to_be_bytes()); // succeeded
        bytes.extend_from_slice(&0u32.to_be_bytes()); // extension
        let result = decode_transaction_result(&bytes).unwrap();
        assert!(result.succeeded());
        assert_eq!(result.operation_count(), 1);
        let op = result.result(0).unwrap();
        assert_eq!(op.operation_type, Some(OperationType::Payment));
        assert!(op.succeeded());
        assert_eq!(op.outcome, OperationOutcome::None);
    }

    #[test]
    fn test_account_merge_balance() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&8i32.to_be_bytes()); // account merge
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&9_999_999_400i64.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        let result = decode_transaction_result(&bytes).unwrap();
        assert_eq!(
            result.result(0).unwrap().outcome,
            OperationOutcome::AccountMerge {
                source_account_balance: 9_999_999_400
            }
        );
    }

    #[test]
    fn test_rejected_before_dispatch() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&(-1i32).to_be_bytes()); // failed
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&(-2i32).to_be_bytes()); // no source account
        bytes.extend_from_slice(&0u32.to_be_bytes());
        let result = decode_transaction_result(&bytes).unwrap();
        let op = result.result(0).unwrap();
        assert_eq!(op.operation_type, None);
        assert_eq!(op.code, -2);
    }

    #[test]
    fn test_unknown_result_code() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&(-99i32).to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(
            decode_transaction_result(&bytes),
            Err(CodecError::UnknownDiscriminant {
                union: "transaction result",
                value: -99
            })
        ));
    }

    #[test]
    fn test_hostile_result_count_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(
            decode_transaction_result(&bytes),
            Err(CodecError::LengthOutOfRange { field: "results", .. })
        ));
    }

    #[test]
    fn test_hostile_claimed_offer_count_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&3i32.to_be_bytes()); // manage sell offer
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            decode_transaction_result(&bytes),
            Err(CodecError::LengthOutOfRange { field: "claimed offers", .. })
        ));
    }

    #[test]
    fn test_hostile_payout_count_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&100i64.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&9i32.to_be_bytes()); // inflation
        bytes.extend_from_slice(&0i32.to_be_bytes());
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            decode_transaction_result(&bytes),
            Err(CodecError::LengthOutOfRange { field: "payouts", .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = hex::decode(BAD_SEQ_HEX).unwrap();
        bytes.push(1);
        assert!(matches!(
            decode_transaction_result(&bytes),
            Err(CodecError::TrailingBytes(1))
        ));
    }

    #[test]
    fn test_base64_form() {
        let bytes = hex::decode(BAD_SEQ_HEX).unwrap();
        let text = BASE64.encode(&bytes);
        let result = decode_transaction_result_b64(&text).unwrap();
        assert_eq!(result.result_code(), TransactionResultCode::BadSequence);
        assert!(decode_transaction_result_b64("!!!").is_err());
    }
}
