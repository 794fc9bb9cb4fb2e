#![forbid(unsafe_code)]

//! Digest transforms.
//!
//! In `Verify` mode the finalized digest is compared with the expected
//! `DigestValue`; in every other mode it is emitted as output.

use crate::klass::{TransformContext, TransformKlass, TransformOperation, TransformUsage};
use tyresta_core::Error;
use tyresta_crypto::{DigestAlgorithm, DigestMethod, VerifyOutcome};
use zeroize::Zeroizing;

pub struct DigestKlass {
    name: &'static str,
    method: DigestMethod,
}

impl DigestKlass {
    pub fn new(name: &'static str, method: DigestMethod) -> Self {
        Self { name, method }
    }
}

impl TransformKlass for DigestKlass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn href(&self) -> &'static str {
        self.method.uri()
    }

    fn usage(&self) -> TransformUsage {
        TransformUsage::Digest
    }

    fn new_context(&self) -> Result<Box<dyn TransformContext>, Error> {
        Ok(Box::new(DigestCtx {
            hasher: Some(self.method.hasher()),
            digest: Zeroizing::new(Vec::new()),
        }))
    }
}

struct DigestCtx {
    hasher: Option<Box<dyn DigestAlgorithm>>,
    digest: Zeroizing<Vec<u8>>,
}

impl TransformContext for DigestCtx {
    fn execute(
        &mut self,
        operation: TransformOperation,
        input: &[u8],
        last: bool,
        output: &mut Vec<u8>,
    ) -> Result<usize, Error> {
        let hasher = self
            .hasher
            .as_mut()
            .ok_or_else(|| Error::InvalidState("digest already finalized".into()))?;
        hasher.update(input);
        if last {
            if let Some(hasher) = self.hasher.take() {
                self.digest = Zeroizing::new(hasher.finalize());
            }
            if operation != TransformOperation::Verify {
                output.extend_from_slice(&self.digest);
            }
        }
        Ok(input.len())
    }

    fn verify(&mut self, expected: &[u8]) -> Result<VerifyOutcome, Error> {
        if self.digest.is_empty() {
            return Err(Error::InvalidState("digest not computed".into()));
        }
        Ok(constant_time_eq(&self.digest, expected).into())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Transform, TransformStatus};
    use std::sync::Arc;
    use tyresta_core::algorithm;

    fn sha256(op: TransformOperation) -> Transform {
        Transform::new(
            Arc::new(DigestKlass::new(algorithm::NAME_SHA256, DigestMethod::Sha256)),
            op,
        )
        .unwrap()
    }

    #[test]
    fn test_digest_output() {
        let mut t = sha256(TransformOperation::Sign);
        t.push(b"hel", false).unwrap();
        assert!(t.take_output().is_empty());
        t.push(b"lo", true).unwrap();
        let expected = tyresta_crypto::digest::digest(algorithm::SHA256, b"hello").unwrap();
        assert_eq!(t.result_bytes().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_digest_verify() {
        let expected = tyresta_crypto::digest::digest(algorithm::SHA256, b"hello").unwrap();

        let mut t = sha256(TransformOperation::Verify);
        t.push(b"hello", true).unwrap();
        assert!(t.result_bytes().unwrap().is_empty());
        assert_eq!(t.verify(&expected).unwrap(), VerifyOutcome::Match);
        assert_eq!(t.status(), TransformStatus::Finished);

        let mut t = sha256(TransformOperation::Verify);
        t.push(b"hellO", true).unwrap();
        assert_eq!(t.verify(&expected).unwrap(), VerifyOutcome::Mismatch);
        assert_eq!(t.status(), TransformStatus::Failed);
    }

    #[test]
    fn test_truncated_digest_is_mismatch() {
        let expected = tyresta_crypto::digest::digest(algorithm::SHA256, b"hello").unwrap();
        let mut t = sha256(TransformOperation::Verify);
        t.push(b"hello", true).unwrap();
        assert_eq!(t.verify(&expected[..16]).unwrap(), VerifyOutcome::Mismatch);
    }

    #[test]
    fn test_digest_takes_no_key() {
        let t = sha256(TransformOperation::Verify);
        assert!(t.key_requirement().is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
