#![forbid(unsafe_code)]

//! Transform chains.

use crate::transform::Transform;
use tyresta_core::Error;
use tyresta_crypto::VerifyOutcome;

/// Transforms connected output-to-input, executed in sequence.
///
/// Data pushed into the chain enters the first transform; whatever each
/// transform produces is handed to the next one with the same `last`
/// flag. The final transform's output stays in place for the caller.
#[derive(Debug, Default)]
pub struct TransformChain {
    transforms: Vec<Transform>,
}

impl TransformChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to the end of the chain.
    pub fn append(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Feed data into the chain.
    pub fn push(&mut self, data: &[u8], last: bool) -> Result<(), Error> {
        let (first, rest) = self
            .transforms
            .split_first_mut()
            .ok_or_else(|| Error::InvalidState("empty transform chain".into()))?;
        first.push(data, last)?;

        let mut prev = first;
        for next in rest {
            let chunk = prev.take_output();
            next.push(&chunk, last)?;
            prev = next;
        }
        Ok(())
    }

    /// Verify the final transform's result.
    pub fn verify(&mut self, expected: &[u8]) -> Result<VerifyOutcome, Error> {
        self.last_mut()
            .ok_or_else(|| Error::InvalidState("empty transform chain".into()))?
            .verify(expected)
    }

    /// Output of the final transform once the chain has finished.
    pub fn result_bytes(&self) -> Result<&[u8], Error> {
        self.transforms
            .last()
            .ok_or_else(|| Error::InvalidState("empty transform chain".into()))?
            .result_bytes()
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn last_mut(&mut self) -> Option<&mut Transform> {
        self.transforms.last_mut()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base64_transform::Base64Klass;
    use crate::digest_transform::DigestKlass;
    use crate::klass::TransformOperation;
    use std::sync::Arc;
    use tyresta_core::algorithm;
    use tyresta_crypto::DigestMethod;

    fn base64_then_sha1(op: TransformOperation) -> TransformChain {
        let mut chain = TransformChain::new();
        chain.append(Transform::new(Arc::new(Base64Klass), TransformOperation::Decrypt).unwrap());
        chain.append(
            Transform::new(Arc::new(DigestKlass::new("sha1", DigestMethod::Sha1)), op).unwrap(),
        );
        chain
    }

    #[test]
    fn test_chain_feeds_forward() {
        let mut chain = base64_then_sha1(TransformOperation::Sign);
        chain.push(b"YW", false).unwrap();
        chain.push(b"Jj\n", true).unwrap();
        let expected = tyresta_crypto::digest::digest(algorithm::SHA1, b"abc").unwrap();
        assert_eq!(chain.result_bytes().unwrap(), expected.as_slice());
    }

    #[test]
    fn test_chain_verify() {
        let expected = tyresta_crypto::digest::digest(algorithm::SHA1, b"abc").unwrap();
        let mut chain = base64_then_sha1(TransformOperation::Verify);
        chain.push(b"YWJj", true).unwrap();
        assert!(chain.verify(&expected).unwrap().is_match());
    }

    #[test]
    fn test_empty_chain() {
        let mut chain = TransformChain::new();
        assert!(chain.is_empty());
        assert!(matches!(chain.push(b"x", true).unwrap_err(), Error::InvalidState(_)));
    }

    #[test]
    fn test_error_stops_chain() {
        let mut chain = base64_then_sha1(TransformOperation::Sign);
        assert!(chain.push(b"!!!!", true).is_err());
        assert_eq!(chain.len(), 2);
        assert!(chain.result_bytes().is_err());
    }
}
