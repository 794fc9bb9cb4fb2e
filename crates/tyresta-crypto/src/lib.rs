#![forbid(unsafe_code)]

//! Cryptographic providers for the tyresta transform engine.
//!
//! Streaming digests, the fixed-width `r || s` wire codec, and the
//! signature adapters that sit between the engine and RustCrypto.

pub mod digest;
pub mod sign;
pub mod wire;

pub use digest::{DigestAlgorithm, DigestMethod};
pub use sign::{SignatureAlgorithm, SigningKey, VerifyOutcome};
