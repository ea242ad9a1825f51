//! Core data structures for Stellar transactions and wallet state

pub mod address;
pub mod asset;
pub mod currency;
pub mod operation;
pub mod result;
pub mod transaction;
pub mod transfer;

pub use address::StellarAddress;
pub use asset::Asset;
pub use currency::Currency;
pub use operation::{
    AllowTrustAsset, Operation, OperationBody, OperationType, Price, SetOptionsFields, Signer,
    SignerKey,
};
pub use result::{
    ClaimedOffer, InflationPayout, ManageOfferOutcome, OfferEntry, OperationOutcome,
    OperationResult, SimplePaymentOutcome, TransactionResult, TransactionResultCode,
};
pub use transaction::{
    DecoratedSignature, Memo, SignedEnvelope, TimeBounds, Transaction, TransactionHash,
};
pub use transfer::Transfer;
