#![forbid(unsafe_code)]

//! Transform instances and their state machine.
//!
//! ```text
//! Uninitialized --push--> Working --push(last)--> Finished
//!        \                   |                       |
//!         +------------------+--- any error ---------+--> Failed
//! ```
//!
//! `Failed` is terminal. A verify transform reaches `Failed` with
//! [`FailureReason::SignatureMismatch`] when the signature does not match,
//! which callers can tell apart from a broken pipeline.

use crate::klass::{TransformContext, TransformKlass, TransformOperation};
use std::fmt;
use std::sync::Arc;
use tyresta_core::Error;
use tyresta_crypto::VerifyOutcome;
use tyresta_keys::{Key, KeyRequirement};
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStatus {
    Uninitialized,
    Working,
    Finished,
    Failed,
}

/// Why a transform ended up `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Verification ran to completion and the signature does not match.
    SignatureMismatch,
    /// Any other error, with its message.
    Error(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureMismatch => f.write_str("signature does not match"),
            Self::Error(msg) => f.write_str(msg),
        }
    }
}

/// One step of a transform pipeline, bound to a klass and an operation.
pub struct Transform {
    klass: Arc<dyn TransformKlass>,
    operation: TransformOperation,
    status: TransformStatus,
    in_buf: Zeroizing<Vec<u8>>,
    out_buf: Vec<u8>,
    ctx: Box<dyn TransformContext>,
    failure: Option<FailureReason>,
}

impl Transform {
    /// Instantiate `klass` for `operation`.
    pub fn new(
        klass: Arc<dyn TransformKlass>,
        operation: TransformOperation,
    ) -> Result<Self, Error> {
        klass.check_operation(operation)?;
        let ctx = klass.new_context()?;
        tracing::debug!(transform = klass.name(), %operation, "transform created");
        Ok(Self {
            klass,
            operation,
            status: TransformStatus::Uninitialized,
            in_buf: Zeroizing::new(Vec::new()),
            out_buf: Vec::new(),
            ctx,
            failure: None,
        })
    }

    pub fn klass(&self) -> &Arc<dyn TransformKlass> {
        &self.klass
    }

    pub fn name(&self) -> &'static str {
        self.klass.name()
    }

    pub fn operation(&self) -> TransformOperation {
        self.operation
    }

    pub fn status(&self) -> TransformStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        self.failure.as_ref()
    }

    /// Key this transform needs for its operation.
    pub fn key_requirement(&self) -> Result<KeyRequirement, Error> {
        let key_id = self.klass.key_id().ok_or_else(|| {
            Error::InvalidState(format!("{} does not take a key", self.klass.name()))
        })?;
        match self.operation {
            TransformOperation::Sign => Ok(KeyRequirement::for_sign(key_id)),
            TransformOperation::Verify => Ok(KeyRequirement::for_verify(key_id)),
            op => Err(Error::InvalidState(format!(
                "{} has no key requirement for {op}",
                self.klass.name()
            ))),
        }
    }

    /// Bind a copy of `key`. Any previously bound key is dropped.
    pub fn bind_key(&mut self, key: &Key) -> Result<(), Error> {
        let result = self.try_bind_key(key);
        self.check(result)
    }

    fn try_bind_key(&mut self, key: &Key) -> Result<(), Error> {
        self.ensure_not_failed()?;
        let expected = self.klass.key_id().ok_or_else(|| {
            Error::InvalidState(format!("{} does not take a key", self.klass.name()))
        })?;
        if key.key_id() != expected {
            return Err(Error::KeyCapabilityMismatch {
                expected,
                actual: format!("{:?}", key.data),
            });
        }
        self.ctx.set_key(key.to_signing_key())?;
        tracing::debug!(transform = self.klass.name(), key = ?key.name, "key bound");
        Ok(())
    }

    /// Feed a chunk of input. `last` marks the end of the stream.
    pub fn push(&mut self, data: &[u8], last: bool) -> Result<(), Error> {
        let result = self.try_push(data, last);
        self.check(result)
    }

    /// Signal end of input without more data.
    pub fn finish(&mut self) -> Result<(), Error> {
        self.push(&[], true)
    }

    fn try_push(&mut self, data: &[u8], last: bool) -> Result<(), Error> {
        match self.status {
            TransformStatus::Uninitialized => {
                if !self.out_buf.is_empty() {
                    return Err(Error::InvalidState(format!(
                        "{}: output buffer not empty at start",
                        self.klass.name()
                    )));
                }
                self.status = TransformStatus::Working;
                tracing::debug!(transform = self.klass.name(), "working");
            }
            TransformStatus::Working => {}
            status => {
                return Err(Error::InvalidState(format!(
                    "{}: push in status {status:?}",
                    self.klass.name()
                )));
            }
        }

        self.in_buf.extend_from_slice(data);
        let consumed =
            self.ctx
                .execute(self.operation, &self.in_buf, last, &mut self.out_buf)?;
        if last && consumed != self.in_buf.len() {
            return Err(Error::InvalidState(format!(
                "{}: {} bytes left unprocessed at end of input",
                self.klass.name(),
                self.in_buf.len() - consumed
            )));
        }
        self.in_buf.drain(..consumed);

        if last {
            self.in_buf.zeroize();
            self.status = TransformStatus::Finished;
            tracing::debug!(
                transform = self.klass.name(),
                output = self.out_buf.len(),
                "finished"
            );
        }
        Ok(())
    }

    /// Check the finished result against an expected value.
    ///
    /// Only valid for `Verify` transforms in status `Finished`. A mismatch
    /// is returned as `Ok(VerifyOutcome::Mismatch)` and moves the transform
    /// to `Failed` with [`FailureReason::SignatureMismatch`].
    pub fn verify(&mut self, expected: &[u8]) -> Result<VerifyOutcome, Error> {
        let result = self.try_verify(expected);
        let outcome = self.check(result)?;
        if outcome == VerifyOutcome::Mismatch {
            tracing::warn!(transform = self.klass.name(), "signature does not match");
            self.status = TransformStatus::Failed;
            self.failure = Some(FailureReason::SignatureMismatch);
            self.out_buf.clear();
        }
        Ok(outcome)
    }

    fn try_verify(&mut self, expected: &[u8]) -> Result<VerifyOutcome, Error> {
        if self.operation != TransformOperation::Verify {
            return Err(Error::InvalidState(format!(
                "{}: verify called on a {} transform",
                self.klass.name(),
                self.operation
            )));
        }
        if self.status != TransformStatus::Finished {
            return Err(Error::InvalidState(format!(
                "{}: verify in status {:?}",
                self.klass.name(),
                self.status
            )));
        }
        self.ctx.verify(expected)
    }

    /// The produced output, e.g. the signature value of a `Sign` transform.
    ///
    /// Only available once the transform is `Finished`.
    pub fn result_bytes(&self) -> Result<&[u8], Error> {
        match self.status {
            TransformStatus::Finished => Ok(&self.out_buf),
            status => Err(Error::InvalidState(format!(
                "{}: result requested in status {status:?}",
                self.klass.name()
            ))),
        }
    }

    /// Move out whatever output has been produced so far.
    ///
    /// Used by [`crate::TransformChain`] to forward data between steps.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out_buf)
    }

    fn ensure_not_failed(&self) -> Result<(), Error> {
        if self.status == TransformStatus::Failed {
            return Err(Error::InvalidState(format!(
                "{}: transform already failed",
                self.klass.name()
            )));
        }
        Ok(())
    }

    /// Move to `Failed` on error. Partial output is discarded.
    fn check<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(e) = &result {
            tracing::warn!(transform = self.klass.name(), error = %e, "transform failed");
            self.status = TransformStatus::Failed;
            if self.failure.is_none() {
                self.failure = Some(FailureReason::Error(e.to_string()));
            }
            self.in_buf.zeroize();
            self.out_buf.clear();
        }
        result
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("klass", &self.klass.name())
            .field("operation", &self.operation)
            .field("status", &self.status)
            .field("pending", &self.in_buf.len())
            .field("output", &self.out_buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::klass::TransformUsage;

    /// Echoes complete 2-byte pairs, keeping an odd trailing byte pending.
    struct PairKlass;
    struct PairCtx;

    impl TransformKlass for PairKlass {
        fn name(&self) -> &'static str {
            "pairs"
        }

        fn href(&self) -> &'static str {
            "urn:test:pairs"
        }

        fn usage(&self) -> TransformUsage {
            TransformUsage::Other
        }

        fn new_context(&self) -> Result<Box<dyn TransformContext>, Error> {
            Ok(Box::new(PairCtx))
        }
    }

    impl TransformContext for PairCtx {
        fn execute(
            &mut self,
            _operation: TransformOperation,
            input: &[u8],
            last: bool,
            output: &mut Vec<u8>,
        ) -> Result<usize, Error> {
            let n = if last { input.len() } else { input.len() / 2 * 2 };
            output.extend_from_slice(&input[..n]);
            Ok(n)
        }
    }

    fn pairs(op: TransformOperation) -> Transform {
        Transform::new(Arc::new(PairKlass), op).unwrap()
    }

    #[test]
    fn test_status_transitions() {
        let mut t = pairs(TransformOperation::Decrypt);
        assert_eq!(t.status(), TransformStatus::Uninitialized);
        t.push(b"abc", false).unwrap();
        assert_eq!(t.status(), TransformStatus::Working);
        assert_eq!(t.take_output(), b"ab");
        t.push(b"de", true).unwrap();
        assert_eq!(t.status(), TransformStatus::Finished);
        assert_eq!(t.result_bytes().unwrap(), b"cde");
    }

    #[test]
    fn test_push_after_finished_fails() {
        let mut t = pairs(TransformOperation::Decrypt);
        t.push(b"ab", true).unwrap();
        let err = t.push(b"cd", false).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(t.status(), TransformStatus::Failed);
        assert!(t.result_bytes().is_err());
        assert!(matches!(t.failure(), Some(FailureReason::Error(_))));
    }

    #[test]
    fn test_finish_twice_fails() {
        let mut t = pairs(TransformOperation::Decrypt);
        t.finish().unwrap();
        assert!(matches!(t.finish().unwrap_err(), Error::InvalidState(_)));
    }

    #[test]
    fn test_keyless_transform_rejects_key_calls() {
        let t = pairs(TransformOperation::Sign);
        let err = t.key_requirement().unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(err.to_string().contains("pairs"));
    }

    #[test]
    fn test_verify_requires_verify_operation() {
        let mut t = pairs(TransformOperation::Decrypt);
        t.finish().unwrap();
        assert!(matches!(t.verify(b"x").unwrap_err(), Error::InvalidState(_)));
        assert_eq!(t.status(), TransformStatus::Failed);
    }
}
