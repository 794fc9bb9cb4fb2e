#![forbid(unsafe_code)]

use crate::KeyDataId;

/// Errors produced by the tyresta crates.
///
/// A signature that simply does not match is *not* an error; it is reported
/// as a verification outcome. `SignatureInvalid` exists for outer layers
/// that want to turn such an outcome into a hard failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("algorithm already registered: {0}")]
    DuplicateAlgorithm(String),

    #[error("algorithm registry used before init()")]
    RegistryNotInitialized,

    #[error("invalid transform state: {0}")]
    InvalidState(String),

    #[error("invalid size: {0}")]
    InvalidSize(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("key capability mismatch: expected {expected} key, got {actual}")]
    KeyCapabilityMismatch {
        expected: KeyDataId,
        actual: String,
    },

    #[error("key error: {0}")]
    Key(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
