//! Transaction envelope decoding
//!
//! Decoding is strict: unknown discriminants, bad presence flags, over-long
//! fields and non-zero padding are all errors. The one tolerated shortfall is
//! an envelope that ends right after the transaction body, which decodes as a
//! transaction with no signatures.

use std::convert::TryFrom;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::codec::encode::{MAX_DATA_NAME_LEN, MAX_DATA_VALUE_LEN, MAX_HOME_DOMAIN_LEN};
use crate::codec::XdrReader;
use crate::data_structures::address::StellarAddress;
use crate::data_structures::asset::{
    Asset, ASSET_TYPE_CREDIT_ALPHANUM12, ASSET_TYPE_CREDIT_ALPHANUM4, ASSET_TYPE_NATIVE,
};
use crate::data_structures::operation::{
    AllowTrustAsset, Operation, OperationBody, OperationType, Price, SetOptionsFields, Signer,
    SignerKey,
};
use crate::data_structures::transaction::{
    DecoratedSignature, Memo, TimeBounds, Transaction, MAX_MEMO_TEXT_LEN, SIGNATURE_LEN,
};
use crate::errors::CodecError;

/// Decode a full transaction envelope from canonical bytes
pub fn decode_envelope(bytes: &[u8]) -> Result<Transaction, CodecError> {
    let mut reader = XdrReader::new(bytes);
    let transaction = read_transaction(&mut reader)?;
    if !reader.is_exhausted() {
        return Err(CodecError::TrailingBytes(reader.remaining()));
    }
    Ok(transaction)
}

/// Decode a transaction envelope from its base64 text form
pub fn decode_envelope_b64(text: &str) -> Result<Transaction, CodecError> {
    let bytes = BASE64
        .decode(text.trim())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    decode_envelope(&bytes)
}

fn read_transaction(reader: &mut XdrReader) -> Result<Transaction, CodecError> {
    let source = read_account_id(reader)?;
    let fee = reader.read_u32()?;
    let sequence = reader.read_i64()?;
    let time_bounds = if reader.read_presence()? {
        Some(TimeBounds {
            min_time: reader.read_u64()?,
            max_time: reader.read_u64()?,
        })
    } else {
        None
    };
    let memo = read_memo(reader)?;
    // smallest operation: absent source, discriminant, empty body
    let operation_count = reader.read_count("operations", 8)?;
    let mut operations = Vec::with_capacity(operation_count);
    for _ in 0..operation_count {
        operations.push(read_operation(reader)?);
    }
    // reserved extension point
    let ext = reader.read_u32()?;
    if ext != 0 {
        return Err(CodecError::UnknownDiscriminant {
            union: "transaction extension",
            value: ext as i32,
        });
    }
    // A bare transaction body is a valid envelope with no signatures
    let signatures = if reader.is_exhausted() {
        Vec::new()
    } else {
        read_signatures(reader)?
    };
    Ok(Transaction::from_parts(
        source,
        fee,
        sequence,
        time_bounds,
        memo,
        operations,
        signatures,
    ))
}

pub(crate) fn read_account_id(reader: &mut XdrReader) -> Result<StellarAddress, CodecError> {
    let key_type = reader.read_i32()?;
    if key_type != 0 {
        return Err(CodecError::UnknownDiscriminant {
            union: "public key type",
            value: key_type,
        });
    }
    Ok(StellarAddress::from_public_key(reader.read_fixed()?))
}

fn read_memo(reader: &mut XdrReader) -> Result<Memo, CodecError> {
    match reader.read_i32()? {
        0 => Ok(Memo::None),
        1 => Ok(Memo::Text(reader.read_string("memo", MAX_MEMO_TEXT_LEN)?)),
        2 => Ok(Memo::Id(reader.read_u64()?)),
        3 => Ok(Memo::Hash(reader.read_fixed()?)),
        4 => Ok(Memo::ReturnHash(reader.read_fixed()?)),
        value => Err(CodecError::UnknownDiscriminant {
            union: "memo",
            value,
        }),
    }
}

pub(crate) fn read_asset(reader: &mut XdrReader) -> Result<Asset, CodecError> {
    match reader.read_i32()? {
        ASSET_TYPE_NATIVE => Ok(Asset::Native),
        ASSET_TYPE_CREDIT_ALPHANUM4 => {
            let code = reader.read_fixed()?;
            let issuer = read_account_id(reader)?;
            Ok(Asset::CreditAlphanum4 { code, issuer })
        }
        ASSET_TYPE_CREDIT_ALPHANUM12 => {
            let code = reader.read_fixed()?;
            let issuer = read_account_id(reader)?;
            Ok(Asset::CreditAlphanum12 { code, issuer })
        }
        value => Err(CodecError::UnknownDiscriminant {
            union: "asset",
            value,
        }),
    }
}

pub(crate) fn read_price(reader: &mut XdrReader) -> Result<Price, CodecError> {
    Ok(Price {
        numerator: reader.read_i32()?,
        denominator: reader.read_i32()?,
    })
}

fn read_operation(reader: &mut XdrReader) -> Result<Operation, CodecError> {
    let source = if reader.read_presence()? {
        Some(read_account_id(reader)?)
    } else {
        None
    };
    let type_code = reader.read_i32()?;
    let operation_type =
        OperationType::try_from(type_code).map_err(|_| CodecError::UnknownDiscriminant {
            union: "operation",
            value: type_code,
        })?;
    let body = match operation_type {
        OperationType::CreateAccount => OperationBody::CreateAccount {
            destination: read_account_id(reader)?,
            starting_balance: reader.read_i64()?,
        },
        OperationType::Payment => OperationBody::Payment {
            destination: read_account_id(reader)?,
            asset: read_asset(reader)?,
            amount: reader.read_i64()?,
        },
        OperationType::PathPayment => {
            let send_asset = read_asset(reader)?;
            let send_max = reader.read_i64()?;
            let destination = read_account_id(reader)?;
            let destination_asset = read_asset(reader)?;
            let destination_amount = reader.read_i64()?;
            let hop_count = reader.read_count("path", 4)?;
            let mut path = Vec::with_capacity(hop_count);
            for _ in 0..hop_count {
                path.push(read_asset(reader)?);
            }
            OperationBody::PathPayment {
                send_asset,
                send_max,
                destination,
                destination_asset,
                destination_amount,
                path,
            }
        }
        OperationType::ManageSellOffer => OperationBody::ManageSellOffer {
            selling: read_asset(reader)?,
            buying: read_asset(reader)?,
            amount: reader.read_i64()?,
            price: read_price(reader)?,
            offer_id: reader.read_i64()?,
        },
        OperationType::CreatePassiveSellOffer => OperationBody::CreatePassiveSellOffer {
            selling: read_asset(reader)?,
            buying: read_asset(reader)?,
            amount: reader.read_i64()?,
            price: read_price(reader)?,
        },
        OperationType::SetOptions => OperationBody::SetOptions(read_set_options(reader)?),
        OperationType::ChangeTrust => OperationBody::ChangeTrust {
            line: read_asset(reader)?,
            limit: reader.read_i64()?,
        },
        OperationType::AllowTrust => {
            let trustor = read_account_id(reader)?;
            let asset = match reader.read_i32()? {
                1 => AllowTrustAsset::CreditAlphanum4(reader.read_fixed()?),
                2 => AllowTrustAsset::CreditAlphanum12(reader.read_fixed()?),
                value => {
                    return Err(CodecError::UnknownDiscriminant {
                        union: "allow trust asset",
                        value,
                    })
                }
            };
            OperationBody::AllowTrust {
                trustor,
                asset,
                authorize: reader.read_bool()?,
            }
        }
        OperationType::AccountMerge => OperationBody::AccountMerge {
            destination: read_account_id(reader)?,
        },
        OperationType::Inflation => OperationBody::Inflation,
        OperationType::ManageData => {
            let name = reader.read_string("data name", MAX_DATA_NAME_LEN)?;
            let value = if reader.read_presence()? {
                Some(reader.read_var_opaque("data value", MAX_DATA_VALUE_LEN)?)
            } else {
                None
            };
            OperationBody::ManageData { name, value }
        }
        OperationType::BumpSequence => OperationBody::BumpSequence {
            bump_to: reader.read_i64()?,
        },
        OperationType::ManageBuyOffer => OperationBody::ManageBuyOffer {
            selling: read_asset(reader)?,
            buying: read_asset(reader)?,
            buy_amount: reader.read_i64()?,
            price: read_price(reader)?,
            offer_id: reader.read_i64()?,
        },
    };
    Ok(Operation { source, body })
}

fn read_set_options(reader: &mut XdrReader) -> Result<SetOptionsFields, CodecError> {
    let mut fields = SetOptionsFields::default();
    if reader.read_presence()? {
        fields.inflation_destination = Some(read_account_id(reader)?);
    }
    fields.clear_flags = read_optional_u32(reader)?;
    fields.set_flags = read_optional_u32(reader)?;
    fields.master_weight = read_optional_u32(reader)?;
    fields.low_threshold = read_optional_u32(reader)?;
    fields.medium_threshold = read_optional_u32(reader)?;
    fields.high_threshold = read_optional_u32(reader)?;
    if reader.read_presence()? {
        fields.home_domain = Some(reader.read_string("home domain", MAX_HOME_DOMAIN_LEN)?);
    }
    if reader.read_presence()? {
        let key = match reader.read_i32()? {
            0 => SignerKey::Ed25519(reader.read_fixed()?),
            1 => SignerKey::PreAuthTx(reader.read_fixed()?),
            2 => SignerKey::HashX(reader.read_fixed()?),
            value => {
                return Err(CodecError::UnknownDiscriminant {
                    union: "signer key",
                    value,
                })
            }
        };
        let weight = reader.read_u32()?;
        fields.signer = Some(Signer { key, weight });
    }
    Ok(fields)
}

fn read_optional_u32(reader: &mut XdrReader) -> Result<Option<u32>, CodecError> {
    if reader.read_presence()? {
        Ok(Some(reader.read_u32()?))
    } else {
        Ok(None)
    }
}

fn read_signatures(reader: &mut XdrReader) -> Result<Vec<DecoratedSignature>, CodecError> {
    // hint plus the length prefix of an (invalid but shortest) empty signature
    let count = reader.read_count("signatures", 8)?;
    let mut signatures = Vec::with_capacity(count);
    for _ in 0..count {
        let hint = reader.read_fixed()?;
        let signature = reader.read_var_opaque("signature", SIGNATURE_LEN)?;
        signatures.push(DecoratedSignature { hint, signature });
    }
    Ok(signatures)
}
