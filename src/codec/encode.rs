//! Transaction and envelope encoding
//!
//! Encoding is canonical and deterministic: the same transaction always
//! produces the same bytes, which is what makes signing payloads and
//! transaction hashes stable.

use crate::codec::XdrWriter;
use crate::data_structures::address::StellarAddress;
use crate::data_structures::asset::Asset;
use crate::data_structures::operation::{
    AllowTrustAsset, Operation, OperationBody, Price, SetOptionsFields, SignerKey,
};
use crate::data_structures::transaction::{
    DecoratedSignature, Memo, Transaction, MAX_MEMO_TEXT_LEN,
};
use crate::errors::CodecError;

/// Maximum byte length of a home domain string
pub const MAX_HOME_DOMAIN_LEN: usize = 32;
/// Maximum byte length of a managed data entry name
pub const MAX_DATA_NAME_LEN: usize = 64;
/// Maximum byte length of a managed data entry value
pub const MAX_DATA_VALUE_LEN: usize = 64;

/// Encode the transaction body, without signatures.
///
/// This is the exact byte sequence covered by a signature.
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let mut writer = XdrWriter::new();
    write_transaction(&mut writer, tx)?;
    Ok(writer.into_bytes())
}

/// Encode the full envelope: body followed by the attached signatures
pub fn encode_envelope(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let mut writer = XdrWriter::new();
    write_transaction(&mut writer, tx)?;
    writer.write_u32(tx.signature_count() as u32);
    for signature in tx.signatures() {
        write_signature(&mut writer, signature);
    }
    Ok(writer.into_bytes())
}

fn write_transaction(writer: &mut XdrWriter, tx: &Transaction) -> Result<(), CodecError> {
    write_account_id(writer, tx.source());
    writer.write_u32(tx.fee());
    writer.write_i64(tx.sequence());
    match tx.time_bounds() {
        Some(bounds) => {
            writer.write_presence(true);
            writer.write_u64(bounds.min_time);
            writer.write_u64(bounds.max_time);
        }
        None => writer.write_presence(false),
    }
    write_memo(writer, tx.memo())?;
    writer.write_u32(tx.operation_count() as u32);
    for operation in tx.operations() {
        write_operation(writer, operation)?;
    }
    // reserved extension point
    writer.write_u32(0);
    Ok(())
}

fn write_account_id(writer: &mut XdrWriter, address: &StellarAddress) {
    writer.write_u32(0); // key type: ed25519
    writer.write_fixed(address.as_bytes());
}

fn write_memo(writer: &mut XdrWriter, memo: &Memo) -> Result<(), CodecError> {
    writer.write_i32(memo.discriminant());
    match memo {
        Memo::None => {}
        Memo::Text(text) => {
            if text.len() > MAX_MEMO_TEXT_LEN {
                return Err(CodecError::LengthOutOfRange {
                    field: "memo",
                    actual: text.len(),
                    max: MAX_MEMO_TEXT_LEN,
                });
            }
            writer.write_string(text);
        }
        Memo::Id(id) => writer.write_u64(*id),
        Memo::Hash(hash) | Memo::ReturnHash(hash) => writer.write_fixed(hash),
    }
    Ok(())
}

fn write_asset(writer: &mut XdrWriter, asset: &Asset) {
    writer.write_i32(asset.discriminant());
    match asset {
        Asset::Native => {}
        Asset::CreditAlphanum4 { code, issuer } => {
            writer.write_fixed(code);
            write_account_id(writer, issuer);
        }
        Asset::CreditAlphanum12 { code, issuer } => {
            writer.write_fixed(code);
            write_account_id(writer, issuer);
        }
    }
}

fn write_price(writer: &mut XdrWriter, price: &Price) {
    writer.write_i32(price.numerator);
    writer.write_i32(price.denominator);
}

fn write_operation(writer: &mut XdrWriter, operation: &Operation) -> Result<(), CodecError> {
    match &operation.source {
        Some(source) => {
            writer.write_presence(true);
            write_account_id(writer, source);
        }
        None => writer.write_presence(false),
    }
    writer.write_i32(operation.operation_type() as i32);
    match &operation.body {
        OperationBody::CreateAccount {
            destination,
            starting_balance,
        } => {
            write_account_id(writer, destination);
            writer.write_i64(*starting_balance);
        }
        OperationBody::Payment {
            destination,
            asset,
            amount,
        } => {
            write_account_id(writer, destination);
            write_asset(writer, asset);
            writer.write_i64(*amount);
        }
        OperationBody::PathPayment {
            send_asset,
            send_max,
            destination,
            destination_asset,
            destination_amount,
            path,
        } => {
            write_asset(writer, send_asset);
            writer.write_i64(*send_max);
            write_account_id(writer, destination);
            write_asset(writer, destination_asset);
            writer.write_i64(*destination_amount);
            writer.write_u32(path.len() as u32);
            for hop in path {
                write_asset(writer, hop);
            }
        }
        OperationBody::ManageSellOffer {
            selling,
            buying,
            amount,
            price,
            offer_id,
        } => {
            write_asset(writer, selling);
            write_asset(writer, buying);
            writer.write_i64(*amount);
            write_price(writer, price);
            writer.write_i64(*offer_id);
        }
        OperationBody::CreatePassiveSellOffer {
            selling,
            buying,
            amount,
            price,
        } => {
            write_asset(writer, selling);
            write_asset(writer, buying);
            writer.write_i64(*amount);
            write_price(writer, price);
        }
        OperationBody::SetOptions(fields) => write_set_options(writer, fields)?,
        OperationBody::ChangeTrust { line, limit } => {
            write_asset(writer, line);
            writer.write_i64(*limit);
        }
        OperationBody::AllowTrust {
            trustor,
            asset,
            authorize,
        } => {
            write_account_id(writer, trustor);
            match asset {
                AllowTrustAsset::CreditAlphanum4(code) => {
                    writer.write_i32(1);
                    writer.write_fixed(code);
                }
                AllowTrustAsset::CreditAlphanum12(code) => {
                    writer.write_i32(2);
                    writer.write_fixed(code);
                }
            }
            writer.write_bool(*authorize);
        }
        OperationBody::AccountMerge { destination } => {
            write_account_id(writer, destination);
        }
        OperationBody::Inflation => {}
        OperationBody::ManageData { name, value } => {
            if name.len() > MAX_DATA_NAME_LEN {
                return Err(CodecError::LengthOutOfRange {
                    field: "data name",
                    actual: name.len(),
                    max: MAX_DATA_NAME_LEN,
                });
            }
            writer.write_string(name);
            match value {
                Some(value) => {
                    if value.len() > MAX_DATA_VALUE_LEN {
                        return Err(CodecError::LengthOutOfRange {
                            field: "data value",
                            actual: value.len(),
                            max: MAX_DATA_VALUE_LEN,
                        });
                    }
                    writer.write_presence(true);
                    writer.write_var_opaque(value);
                }
                None => writer.write_presence(false),
            }
        }
        OperationBody::BumpSequence { bump_to } => {
            writer.write_i64(*bump_to);
        }
        OperationBody::ManageBuyOffer {
            selling,
            buying,
            buy_amount,
            price,
            offer_id,
        } => {
            write_asset(writer, selling);
            write_asset(writer, buying);
            writer.write_i64(*buy_amount);
            write_price(writer, price);
            writer.write_i64(*offer_id);
        }
    }
    Ok(())
}

fn write_set_options(writer: &mut XdrWriter, fields: &SetOptionsFields) -> Result<(), CodecError> {
    match &fields.inflation_destination {
        Some(destination) => {
            writer.write_presence(true);
            write_account_id(writer, destination);
        }
        None => writer.write_presence(false),
    }
    write_optional_u32(writer, fields.clear_flags);
    write_optional_u32(writer, fields.set_flags);
    write_optional_u32(writer, fields.master_weight);
    write_optional_u32(writer, fields.low_threshold);
    write_optional_u32(writer, fields.medium_threshold);
    write_optional_u32(writer, fields.high_threshold);
    match &fields.home_domain {
        Some(domain) => {
            if domain.len() > MAX_HOME_DOMAIN_LEN {
                return Err(CodecError::LengthOutOfRange {
                    field: "home domain",
                    actual: domain.len(),
                    max: MAX_HOME_DOMAIN_LEN,
                });
            }
            writer.write_presence(true);
            writer.write_string(domain);
        }
        None => writer.write_presence(false),
    }
    match &fields.signer {
        Some(signer) => {
            writer.write_presence(true);
            write_signer_key(writer, &signer.key);
            writer.write_u32(signer.weight);
        }
        None => writer.write_presence(false),
    }
    Ok(())
}

fn write_optional_u32(writer: &mut XdrWriter, value: Option<u32>) {
    match value {
        Some(value) => {
            writer.write_presence(true);
            writer.write_u32(value);
        }
        None => writer.write_presence(false),
    }
}

fn write_signer_key(writer: &mut XdrWriter, key: &SignerKey) {
    writer.write_i32(key.discriminant());
    writer.write_fixed(key.key_bytes());
}

fn write_signature(writer: &mut XdrWriter, signature: &DecoratedSignature) {
    writer.write_fixed(&signature.hint);
    writer.write_var_opaque(&signature.signature);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::transaction::Transaction;

    fn address(byte: u8) -> StellarAddress {
        StellarAddress::from_public_key([byte; 32])
    }

    #[test]
    fn test_minimal_payment_layout() {
        let mut tx = Transaction::new(
            address(1),
            100,
            None,
            Memo::None,
            vec![Operation::payment(address(2), Asset::Native, 105_000_000)],
        );
        tx.set_sequence(7);
        let bytes = tx.encode_body().unwrap();

        // account disc + key + fee + sequence + no time bounds + memo none
        // + op count + op(no source + type + dest + native asset + amount)
        // + trailing extension
        let expected_len = 4 + 32 + 4 + 8 + 4 + 4 + 4 + (4 + 4 + 36 + 4 + 8) + 4;
        assert_eq!(bytes.len(), expected_len);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..36], &[1u8; 32]);
        assert_eq!(&bytes[36..40], &100u32.to_be_bytes());
        assert_eq!(&bytes[40..48], &7i64.to_be_bytes());
        // trailing extension discriminant is zero
        assert_eq!(&bytes[expected_len - 4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_envelope_appends_signatures() {
        let mut tx = Transaction::new(address(1), 100, None, Memo::None, Vec::new());
        tx.append_signature(DecoratedSignature {
            hint: [9, 9, 9, 9],
            signature: vec![0x55u8; 64],
        });
        let body = tx.encode_body().unwrap();
        let envelope = tx.encode_envelope().unwrap();
        // count + hint + length prefix + 64 signature bytes
        assert_eq!(envelope.len(), body.len() + 4 + 4 + 4 + 64);
        assert_eq!(&envelope[..body.len()], &body[..]);
        assert_eq!(&envelope[body.len()..body.len() + 4], &1u32.to_be_bytes());
        assert_eq!(&envelope[body.len() + 4..body.len() + 8], &[9, 9, 9, 9]);
    }

    #[test]
    fn test_memo_text_is_padded() {
        let mut writer = XdrWriter::new();
        write_memo(&mut writer, &Memo::Text("beer".to_string())).unwrap();
        // disc + length + 4 bytes, already aligned
        assert_eq!(writer.len(), 12);

        let mut writer = XdrWriter::new();
        write_memo(&mut writer, &Memo::Text("ale".to_string())).unwrap();
        assert_eq!(writer.len(), 12); // one padding byte
    }

    #[test]
    fn test_over_long_memo_rejected() {
        let mut writer = XdrWriter::new();
        let memo = Memo::Text("this memo text is much much too long for the field".to_string());
        assert!(matches!(
            write_memo(&mut writer, &memo),
            Err(CodecError::LengthOutOfRange { field: "memo", .. })
        ));
    }

    #[test]
    fn test_set_options_presence_flags() {
        let mut fields = SetOptionsFields::default();
        fields.home_domain = Some("fed.network".to_string());
        let mut writer = XdrWriter::new();
        write_set_options(&mut writer, &fields).unwrap();
        // seven absent flags, then present + string(11 -> 4 + 11 + 1), then absent
        assert_eq!(writer.len(), 7 * 4 + 4 + 16 + 4);
    }

    #[test]
    fn test_over_long_home_domain_rejected() {
        let mut fields = SetOptionsFields::default();
        fields.home_domain = Some("a".repeat(33));
        let mut writer = XdrWriter::new();
        assert!(write_set_options(&mut writer, &fields).is_err());
    }

    #[test]
    fn test_allow_trust_asset_code_is_raw() {
        let op = Operation::new(OperationBody::AllowTrust {
            trustor: address(3),
            asset: AllowTrustAsset::CreditAlphanum4(*b"USD\0"),
            authorize: true,
        });
        let mut writer = XdrWriter::new();
        write_operation(&mut writer, &op).unwrap();
        // no source + type + trustor + asset disc + 4 raw code bytes + bool
        assert_eq!(writer.len(), 4 + 4 + 36 + 4 + 4 + 4);
    }
}
