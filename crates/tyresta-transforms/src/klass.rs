#![forbid(unsafe_code)]

//! Klass and context traits.
//!
//! A klass is the immutable, shareable description of one algorithm. Each
//! transform instance owns a context created by its klass; the context
//! carries all per-instance algorithm state (digest handle, bound key,
//! pending input).

use std::fmt;
use tyresta_core::{Error, KeyDataId};
use tyresta_crypto::{SigningKey, VerifyOutcome};

/// What a klass is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformUsage {
    Signature,
    KeyWrap,
    Encryption,
    Digest,
    Other,
}

/// The operation a transform instance performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOperation {
    Sign,
    Verify,
    Encrypt,
    Decrypt,
}

impl fmt::Display for TransformOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sign => "sign",
            Self::Verify => "verify",
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        };
        f.write_str(s)
    }
}

/// Registry entry describing one algorithm.
pub trait TransformKlass: Send + Sync {
    /// Short name, e.g. `"ecdsa-sha256"`.
    fn name(&self) -> &'static str;
    /// Algorithm URI.
    fn href(&self) -> &'static str;
    fn usage(&self) -> TransformUsage;

    /// Key class the algorithm binds, or `None` for keyless transforms.
    fn key_id(&self) -> Option<KeyDataId> {
        None
    }

    /// Reject operations this klass cannot perform.
    fn check_operation(&self, _operation: TransformOperation) -> Result<(), Error> {
        Ok(())
    }

    /// Create the per-instance context.
    fn new_context(&self) -> Result<Box<dyn TransformContext>, Error>;
}

/// Per-instance algorithm state driven by [`crate::Transform`].
pub trait TransformContext: Send {
    /// Process `input`, appending any produced bytes to `output`.
    ///
    /// Returns the number of input bytes consumed; the rest stays in the
    /// instance's input buffer for the next call. When `last` is set the
    /// context must consume everything and finalize.
    fn execute(
        &mut self,
        operation: TransformOperation,
        input: &[u8],
        last: bool,
        output: &mut Vec<u8>,
    ) -> Result<usize, Error>;

    /// Take ownership of a key, replacing any previously bound key.
    fn set_key(&mut self, _key: SigningKey) -> Result<(), Error> {
        Err(Error::InvalidState("transform does not take a key".into()))
    }

    /// Compare the finalized result with an expected value.
    fn verify(&mut self, _expected: &[u8]) -> Result<VerifyOutcome, Error> {
        Err(Error::InvalidState("transform does not support verify".into()))
    }
}
