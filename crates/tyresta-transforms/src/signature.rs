#![forbid(unsafe_code)]

//! Signature transforms (DSA, ECDSA, RSA).
//!
//! Content is streamed into the algorithm's digest. On the last chunk the
//! digest is finalized; a `Sign` transform signs it right away and emits
//! the signature value, a `Verify` transform keeps it until
//! [`Transform::verify`](crate::Transform::verify) supplies the expected
//! value.

use crate::klass::{TransformContext, TransformKlass, TransformOperation, TransformUsage};
use tyresta_core::{Error, KeyDataId};
use tyresta_crypto::{sign, DigestAlgorithm, SignatureAlgorithm, SigningKey, VerifyOutcome};
use zeroize::Zeroizing;

pub struct SignatureKlass {
    name: &'static str,
    href: &'static str,
    key_id: KeyDataId,
}

impl SignatureKlass {
    /// Describe the signature algorithm at `href`.
    ///
    /// Fails with `UnknownAlgorithm` if no adapter exists for `href`.
    pub fn new(name: &'static str, href: &'static str) -> Result<Self, Error> {
        let key_id = sign::from_uri(href)?.key_id();
        Ok(Self { name, href, key_id })
    }
}

impl TransformKlass for SignatureKlass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn href(&self) -> &'static str {
        self.href
    }

    fn usage(&self) -> TransformUsage {
        TransformUsage::Signature
    }

    fn key_id(&self) -> Option<KeyDataId> {
        Some(self.key_id)
    }

    fn check_operation(&self, operation: TransformOperation) -> Result<(), Error> {
        match operation {
            TransformOperation::Sign | TransformOperation::Verify => Ok(()),
            op => Err(Error::InvalidState(format!(
                "{} supports sign and verify, not {op}",
                self.name
            ))),
        }
    }

    fn new_context(&self) -> Result<Box<dyn TransformContext>, Error> {
        let alg = sign::from_uri(self.href)?;
        let hasher = alg.digest_method().hasher();
        Ok(Box::new(SignatureCtx {
            alg,
            hasher: Some(hasher),
            key: None,
            digest: Zeroizing::new(Vec::new()),
        }))
    }
}

struct SignatureCtx {
    alg: Box<dyn SignatureAlgorithm>,
    hasher: Option<Box<dyn DigestAlgorithm>>,
    key: Option<SigningKey>,
    digest: Zeroizing<Vec<u8>>,
}

impl SignatureCtx {
    fn key(&self) -> Result<&SigningKey, Error> {
        self.key
            .as_ref()
            .ok_or_else(|| Error::Key(format!("no key bound for {}", self.alg.uri())))
    }
}

impl TransformContext for SignatureCtx {
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
            let hasher = self
                .hasher
                .take()
                .ok_or_else(|| Error::InvalidState("digest already finalized".into()))?;
            self.digest = Zeroizing::new(hasher.finalize());
            if operation == TransformOperation::Sign {
                let signature = self.alg.sign_digest(self.key()?, &self.digest)?;
                tracing::debug!(uri = self.alg.uri(), size = signature.len(), "signed");
                output.extend_from_slice(&signature);
            }
        }
        Ok(input.len())
    }

    fn set_key(&mut self, key: SigningKey) -> Result<(), Error> {
        if key.key_id() != self.alg.key_id() {
            return Err(Error::KeyCapabilityMismatch {
                expected: self.alg.key_id(),
                actual: format!("{key:?}"),
            });
        }
        self.key = Some(key);
        Ok(())
    }

    fn verify(&mut self, expected: &[u8]) -> Result<VerifyOutcome, Error> {
        if self.digest.is_empty() {
            return Err(Error::InvalidState("digest not computed".into()));
        }
        let outcome = self.alg.verify_digest(self.key()?, &self.digest, expected)?;
        tracing::debug!(uri = self.alg.uri(), %outcome, "verified");
        Ok(outcome)
    }
}
