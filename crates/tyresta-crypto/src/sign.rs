#![forbid(unsafe_code)]

//! Signature algorithm adapters (DSA, ECDSA, RSA PKCS#1 v1.5).
//!
//! Every adapter works on an already-finalized digest: the transform engine
//! streams the signed content through a [`DigestMethod`] and hands the
//! result here. DSA and ECDSA adapters convert between the provider's
//! native `(r, s)` pair and the fixed-width wire format of [`crate::wire`].

use crate::digest::DigestMethod;
use crate::wire;
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use signature::SignatureEncoding;
use std::borrow::Cow;
use std::fmt;
use tyresta_core::{algorithm, Error, KeyDataId};

/// Key material bound to a signature operation.
#[derive(Clone)]
pub enum SigningKey {
    Rsa(rsa::RsaPrivateKey),
    RsaPublic(rsa::RsaPublicKey),
    Dsa(dsa::SigningKey),
    DsaPublic(dsa::VerifyingKey),
    EcP256(p256::ecdsa::SigningKey),
    EcP256Public(p256::ecdsa::VerifyingKey),
    EcP384(p384::ecdsa::SigningKey),
    EcP384Public(p384::ecdsa::VerifyingKey),
}

impl SigningKey {
    /// The key class this material belongs to.
    pub fn key_id(&self) -> KeyDataId {
        match self {
            Self::Rsa(_) | Self::RsaPublic(_) => KeyDataId::Rsa,
            Self::Dsa(_) | Self::DsaPublic(_) => KeyDataId::Dsa,
            Self::EcP256(_) | Self::EcP256Public(_) | Self::EcP384(_) | Self::EcP384Public(_) => {
                KeyDataId::Ec
            }
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Self::Rsa(_) | Self::Dsa(_) | Self::EcP256(_) | Self::EcP384(_)
        )
    }

    /// Byte length `h` of one signature component for DSA and ECDSA keys.
    ///
    /// DSA uses the length of the subgroup order `q`; ECDSA uses the length
    /// of the curve's base-point order. RSA keys have no half-size.
    pub fn half_size(&self) -> Option<usize> {
        match self {
            Self::Dsa(sk) => Some(dsa_half_size(sk.verifying_key())),
            Self::DsaPublic(vk) => Some(dsa_half_size(vk)),
            Self::EcP256(_) | Self::EcP256Public(_) => Some(p256::FieldBytes::default().len()),
            Self::EcP384(_) | Self::EcP384Public(_) => Some(p384::FieldBytes::default().len()),
            Self::Rsa(_) | Self::RsaPublic(_) => None,
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_private() { "private" } else { "public" };
        match self {
            Self::Rsa(_) | Self::RsaPublic(_) => write!(f, "RSA {kind} key"),
            Self::Dsa(_) | Self::DsaPublic(_) => write!(f, "DSA {kind} key"),
            Self::EcP256(_) | Self::EcP256Public(_) => write!(f, "EC P-256 {kind} key"),
            Self::EcP384(_) | Self::EcP384Public(_) => write!(f, "EC P-384 {kind} key"),
        }
    }
}

/// Result of a verification that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Match,
    Mismatch,
}

impl VerifyOutcome {
    pub fn is_match(self) -> bool {
        self == Self::Match
    }
}

impl From<bool> for VerifyOutcome {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Match
        } else {
            Self::Mismatch
        }
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => f.write_str("signature matches"),
            Self::Mismatch => f.write_str("signature does not match"),
        }
    }
}

/// A signature adapter: digest selection, key class and sign/verify pair.
pub trait SignatureAlgorithm: Send + Sync {
    fn uri(&self) -> &'static str;
    /// Digest function the signed content is hashed with.
    fn digest_method(&self) -> DigestMethod;
    /// Key class this algorithm can bind.
    fn key_id(&self) -> KeyDataId;
    /// Sign a finalized digest, producing the wire-format signature value.
    fn sign_digest(&self, key: &SigningKey, digest: &[u8]) -> Result<Vec<u8>, Error>;
    /// Check a wire-format signature value against a finalized digest.
    fn verify_digest(
        &self,
        key: &SigningKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyOutcome, Error>;
}

/// Create a signature adapter from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn SignatureAlgorithm>, Error> {
    use DigestMethod::*;
    let alg: Box<dyn SignatureAlgorithm> = match uri {
        algorithm::DSA_SHA1 => Box::new(DsaSignature::new(algorithm::DSA_SHA1, Sha1)),
        algorithm::DSA_SHA256 => Box::new(DsaSignature::new(algorithm::DSA_SHA256, Sha256)),

        algorithm::ECDSA_SHA1 => Box::new(EcdsaSignature::new(algorithm::ECDSA_SHA1, Sha1)),
        algorithm::ECDSA_SHA224 => Box::new(EcdsaSignature::new(algorithm::ECDSA_SHA224, Sha224)),
        algorithm::ECDSA_SHA256 => Box::new(EcdsaSignature::new(algorithm::ECDSA_SHA256, Sha256)),
        algorithm::ECDSA_SHA384 => Box::new(EcdsaSignature::new(algorithm::ECDSA_SHA384, Sha384)),
        algorithm::ECDSA_SHA512 => Box::new(EcdsaSignature::new(algorithm::ECDSA_SHA512, Sha512)),

        algorithm::RSA_SHA1 => Box::new(RsaPkcs1v15::new(algorithm::RSA_SHA1, Sha1)),
        algorithm::RSA_SHA224 => Box::new(RsaPkcs1v15::new(algorithm::RSA_SHA224, Sha224)),
        algorithm::RSA_SHA256 => Box::new(RsaPkcs1v15::new(algorithm::RSA_SHA256, Sha256)),
        algorithm::RSA_SHA384 => Box::new(RsaPkcs1v15::new(algorithm::RSA_SHA384, Sha384)),
        algorithm::RSA_SHA512 => Box::new(RsaPkcs1v15::new(algorithm::RSA_SHA512, Sha512)),

        _ => return Err(Error::UnknownAlgorithm(format!("signature algorithm: {uri}"))),
    };
    Ok(alg)
}

fn check_digest_len(method: DigestMethod, digest: &[u8]) -> Result<(), Error> {
    if digest.is_empty() || digest.len() != method.output_size() {
        return Err(Error::InvalidSize(format!(
            "digest is {} bytes, {} expects {}",
            digest.len(),
            method.uri(),
            method.output_size()
        )));
    }
    Ok(())
}

// ── DSA ──────────────────────────────────────────────────────────────

/// XML-DSig DSA: `r || s`, each I2OSP-encoded to the byte length of `q`
/// (20 bytes for the classic 1024/160 domain).
struct DsaSignature {
    uri: &'static str,
    digest: DigestMethod,
}

impl DsaSignature {
    fn new(uri: &'static str, digest: DigestMethod) -> Self {
        Self { uri, digest }
    }
}

/// Half-size for a DSA key, from the subgroup order `q`.
pub fn dsa_half_size(key: &dsa::VerifyingKey) -> usize {
    wire::bytes_for_bits(key.components().q().bits() as usize)
}

impl SignatureAlgorithm for DsaSignature {
    fn uri(&self) -> &'static str {
        self.uri
    }

    fn digest_method(&self) -> DigestMethod {
        self.digest
    }

    fn key_id(&self) -> KeyDataId {
        KeyDataId::Dsa
    }

    fn sign_digest(&self, key: &SigningKey, digest: &[u8]) -> Result<Vec<u8>, Error> {
        check_digest_len(self.digest, digest)?;
        let SigningKey::Dsa(sk) = key else {
            return Err(Error::Key("DSA private key required".into()));
        };
        let half = dsa_half_size(sk.verifying_key());
        let sig: dsa::Signature = sk
            .sign_prehash(digest)
            .map_err(|e| Error::Crypto(format!("DSA sign failed: {e}")))?;
        tracing::trace!(half, "packing DSA signature");
        wire::encode_components(&sig.r().to_bytes_be(), &sig.s().to_bytes_be(), half)
    }

    fn verify_digest(
        &self,
        key: &SigningKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyOutcome, Error> {
        check_digest_len(self.digest, digest)?;
        let vk = match key {
            SigningKey::Dsa(sk) => sk.verifying_key(),
            SigningKey::DsaPublic(vk) => vk,
            _ => return Err(Error::Key("DSA key required".into())),
        };
        let (r, s) = wire::decode_components(signature, dsa_half_size(vk))?;
        let sig = match dsa::Signature::from_components(
            dsa::BigUint::from_bytes_be(r),
            dsa::BigUint::from_bytes_be(s),
        ) {
            Ok(sig) => sig,
            Err(_) => {
                tracing::debug!("DSA signature has a zero component");
                return Ok(VerifyOutcome::Mismatch);
            }
        };
        Ok(vk.verify_prehash(digest, &sig).is_ok().into())
    }
}

// ── ECDSA ────────────────────────────────────────────────────────────

/// ECDSA with TMSAD packing: `r || s`, each I2OSP-encoded to the byte
/// length of the curve order. The curve comes from the bound key.
struct EcdsaSignature {
    uri: &'static str,
    digest: DigestMethod,
}

impl EcdsaSignature {
    fn new(uri: &'static str, digest: DigestMethod) -> Self {
        Self { uri, digest }
    }
}

/// Left-pad a digest shorter than the curve order so the prehash API
/// sees the same integer value.
fn field_prehash(digest: &[u8], field_len: usize) -> Cow<'_, [u8]> {
    if digest.len() >= field_len {
        return Cow::Borrowed(digest);
    }
    let mut padded = vec![0u8; field_len - digest.len()];
    padded.extend_from_slice(digest);
    Cow::Owned(padded)
}

macro_rules! ecdsa_sign {
    ($curve:ident, $sk:expr, $digest:expr) => {{
        let half = $curve::FieldBytes::default().len();
        let prehash = field_prehash($digest, half);
        let sig: $curve::ecdsa::Signature = $sk
            .sign_prehash(&prehash)
            .map_err(|e| Error::Crypto(format!("ECDSA sign failed: {e}")))?;
        let (r, s) = sig.split_bytes();
        wire::encode_components(&r, &s, half)
    }};
}

macro_rules! ecdsa_verify {
    ($curve:ident, $vk:expr, $digest:expr, $signature:expr) => {{
        let half = $curve::FieldBytes::default().len();
        wire::decode_components($signature, half)?;
        match $curve::ecdsa::Signature::from_slice($signature) {
            Ok(sig) => {
                let prehash = field_prehash($digest, half);
                Ok($vk.verify_prehash(&prehash, &sig).is_ok().into())
            }
            Err(_) => {
                tracing::debug!("ECDSA signature component out of range");
                Ok(VerifyOutcome::Mismatch)
            }
        }
    }};
}

impl SignatureAlgorithm for EcdsaSignature {
    fn uri(&self) -> &'static str {
        self.uri
    }

    fn digest_method(&self) -> DigestMethod {
        self.digest
    }

    fn key_id(&self) -> KeyDataId {
        KeyDataId::Ec
    }

    fn sign_digest(&self, key: &SigningKey, digest: &[u8]) -> Result<Vec<u8>, Error> {
        check_digest_len(self.digest, digest)?;
        match key {
            SigningKey::EcP256(sk) => ecdsa_sign!(p256, sk, digest),
            SigningKey::EcP384(sk) => ecdsa_sign!(p384, sk, digest),
            _ => Err(Error::Key("EC private key required".into())),
        }
    }

    fn verify_digest(
        &self,
        key: &SigningKey,
        digest: &[u8],
        signature: &[u8],
    ) -> Result<VerifyOutcome, Error> {
        check_digest_len(self.digest, digest)?;
        match key {
            SigningKey::EcP256(sk) => {
                ecdsa_verify!(p256, sk.verifying_key(), digest, signature)
            }
            SigningKey::EcP256Public(vk) => ecdsa_verify!(p256, vk, digest, signature),
            SigningKey::EcP384(sk) => {
                ecdsa_verify!(p384, sk.verifying_key(), digest, signature)
            }
            SigningKey::EcP384Public(vk) => ecdsa_verify!(p384, vk, digest, signature),
            _ => Err(Error::Key("EC key required".into())),
        }
    }
}

// ── RSA PKCS#1 v1.5 ─────────────────────────────────────────────────

struct RsaPkcs1v15 {
    uri: &'static str,
    digest: DigestMethod,
}

impl RsaPkcs1v15 {
    fn new(uri: &'static str, digest: DigestMethod) -> Self {
        Self { uri, digest }
    }
}

impl SignatureAlgorithm for RsaPkcs1v15 {
    fn uri(&self) -> &'static str {
        self.uri
    }

    fn digest_method(&self) -> DigestMethod {
        self.digest
    }

    fn key_id(&self) -> KeyDataId {
        KeyDataId::Rsa
    }

    fn sign_digest(&self, key: &SigningKey, digest: &[u8]) -> Result<Vec<u8>, Error> {
        check_digest_len(self.digest, digest)?;
        let SigningKey::Rsa(private_key) = key else {
            return Err(Error::Key("RSA private key required".into()));
        };
        macro_rules! do_sign {
            ($hasher:ty) => {{
                let sk = rsa::pkcs1v15::SigningKey::<$hasher>::new(private_key.clone());
                let sig = sk
                    .sign_prehash(digest)
                    .map_err(|e| Error::Crypto(format!("RSA sign failed: {e}")))?;
                Ok(sig.to_vec())
            }};
        }
        match self.digest {
            DigestMethod::Sha1 => do_sign!(sha1::Sha1),
            DigestMethod::Sha224 => do_sign!(sha2::Sha224),
            DigestMethod::Sha256 => do_sign!(sha2::Sha256),
            DigestMethod::Sha384 => do_sign!(sha2::Sha384),
            DigestMethod::Sha512 => do_sign!(sha2::Sha512),
        }
    }

    fn verify_digest(
        &self,
        key: &SigningKey,
        digest: &[u8],
        sig_bytes: &[u8],
    ) -> Result<VerifyOutcome, Error> {
        use rsa::traits::PublicKeyParts;
        check_digest_len(self.digest, digest)?;
        let public_key = match key {
            SigningKey::Rsa(pk) => pk.to_public_key(),
            SigningKey::RsaPublic(pk) => pk.clone(),
            _ => return Err(Error::Key("RSA key required".into())),
        };
        if sig_bytes.len() != public_key.size() {
            return Err(Error::InvalidSize(format!(
                "invalid length {} ({} expected)",
                sig_bytes.len(),
                public_key.size()
            )));
        }
        let Ok(sig) = rsa::pkcs1v15::Signature::try_from(sig_bytes) else {
            return Ok(VerifyOutcome::Mismatch);
        };
        macro_rules! do_verify {
            ($hasher:ty) => {{
                let vk = rsa::pkcs1v15::VerifyingKey::<$hasher>::new(public_key);
                Ok(vk.verify_prehash(digest, &sig).is_ok().into())
            }};
        }
        match self.digest {
            DigestMethod::Sha1 => do_verify!(sha1::Sha1),
            DigestMethod::Sha224 => do_verify!(sha2::Sha224),
            DigestMethod::Sha256 => do_verify!(sha2::Sha256),
            DigestMethod::Sha384 => do_verify!(sha2::Sha384),
            DigestMethod::Sha512 => do_verify!(sha2::Sha512),
        }
    }
}
