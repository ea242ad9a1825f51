use thiserror::Error;

/// Main error type for the wallet library
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Key management error: {0}")]
    KeyManagement(#[from] KeyManagementError),

    #[error("Invalid argument: {argument} = {value}. {message}")]
    InvalidArgument {
        argument: String,
        value: String,
        message: String,
    },
}

/// Result type alias for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

/// Errors raised while encoding or decoding the canonical wire format.
///
/// Every decode failure is recoverable: the input buffer is rejected as a
/// whole and no partially constructed transaction is handed to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Truncated input: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Unknown discriminant {value} for {union}")]
    UnknownDiscriminant { union: &'static str, value: i32 },

    #[error("Invalid presence flag {0} (expected 0 or 1)")]
    InvalidPresenceFlag(u32),

    #[error("Length {actual} out of range for {field} (max {max})")]
    LengthOutOfRange {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("Non-zero padding byte in {0}")]
    NonZeroPadding(&'static str),

    #[error("Invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    #[error("Trailing bytes after envelope: {0}")]
    TrailingBytes(usize),

    #[error("Base64 decoding error: {0}")]
    Base64(String),
}

/// Errors related to the strkey text form of addresses
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid encoded length: expected {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid base32 character: {0:?}")]
    InvalidCharacter(char),

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Unexpected version byte: {0:#04x}")]
    InvalidVersionByte(u8),
}

/// Errors related to seed phrases and key derivation
#[derive(Debug, Error)]
pub enum KeyManagementError {
    #[error("Invalid seed phrase: {0}")]
    InvalidSeedPhrase(String),

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),
}
