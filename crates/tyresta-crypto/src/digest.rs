#![forbid(unsafe_code)]

//! Streaming digest providers.

use digest::Digest;
use tyresta_core::{algorithm, Error};

/// A streaming hash computation.
pub trait DigestAlgorithm: Send {
    /// Feed data into the hash.
    fn update(&mut self, data: &[u8]);
    /// Finalize and return the hash value.
    fn finalize(self: Box<Self>) -> Vec<u8>;
    /// Output length in bytes.
    fn output_size(&self) -> usize;
}

/// The digest functions a signature or digest transform can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestMethod {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestMethod {
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        match uri {
            algorithm::SHA1 => Ok(Self::Sha1),
            algorithm::SHA224 => Ok(Self::Sha224),
            algorithm::SHA256 => Ok(Self::Sha256),
            algorithm::SHA384 => Ok(Self::Sha384),
            algorithm::SHA512 => Ok(Self::Sha512),
            _ => Err(Error::UnknownAlgorithm(format!("digest algorithm: {uri}"))),
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Self::Sha1 => algorithm::SHA1,
            Self::Sha224 => algorithm::SHA224,
            Self::Sha256 => algorithm::SHA256,
            Self::Sha384 => algorithm::SHA384,
            Self::Sha512 => algorithm::SHA512,
        }
    }

    pub fn output_size(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Start a new streaming computation.
    pub fn hasher(self) -> Box<dyn DigestAlgorithm> {
        match self {
            Self::Sha1 => Box::new(Sha1Digest::new()),
            Self::Sha224 => Box::new(Sha224Digest::new()),
            Self::Sha256 => Box::new(Sha256Digest::new()),
            Self::Sha384 => Box::new(Sha384Digest::new()),
            Self::Sha512 => Box::new(Sha512Digest::new()),
        }
    }
}

/// Create a digest computation from its URI.
pub fn from_uri(uri: &str) -> Result<Box<dyn DigestAlgorithm>, Error> {
    Ok(DigestMethod::from_uri(uri)?.hasher())
}

/// Compute a digest in one shot.
pub fn digest(uri: &str, data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut hasher = from_uri(uri)?;
    hasher.update(data);
    Ok(hasher.finalize())
}

// ── Concrete implementations ─────────────────────────────────────────

macro_rules! impl_digest {
    ($name:ident, $hasher:ty) => {
        struct $name {
            inner: $hasher,
        }

        impl $name {
            fn new() -> Self {
                Self {
                    inner: <$hasher>::new(),
                }
            }
        }

        impl DigestAlgorithm for $name {
            fn update(&mut self, data: &[u8]) {
                Digest::update(&mut self.inner, data);
            }

            fn finalize(self: Box<Self>) -> Vec<u8> {
                Digest::finalize(self.inner).to_vec()
            }

            fn output_size(&self) -> usize {
                <$hasher as Digest>::output_size()
            }
        }
    };
}

impl_digest!(Sha1Digest, sha1::Sha1);
impl_digest!(Sha224Digest, sha2::Sha224);
impl_digest!(Sha256Digest, sha2::Sha256);
impl_digest!(Sha384Digest, sha2::Sha384);
impl_digest!(Sha512Digest, sha2::Sha512);

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn test_sha256() {
        let result = digest(algorithm::SHA256, b"hello").unwrap();
        assert_eq!(
            hex(&result),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha1_abc() {
        let result = digest(algorithm::SHA1, b"abc").unwrap();
        assert_eq!(hex(&result), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_output_sizes_agree() {
        for method in [
            DigestMethod::Sha1,
            DigestMethod::Sha224,
            DigestMethod::Sha256,
            DigestMethod::Sha384,
            DigestMethod::Sha512,
        ] {
            let hasher = method.hasher();
            assert_eq!(hasher.output_size(), method.output_size());
            assert_eq!(hasher.finalize().len(), method.output_size());
            assert_eq!(DigestMethod::from_uri(method.uri()).unwrap(), method);
        }
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let data = b"The quick brown fox jumps over the lazy dog";
        let mut hasher = from_uri(algorithm::SHA512).unwrap();
        for chunk in data.chunks(5) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.finalize(), digest(algorithm::SHA512, data).unwrap());
    }

    #[test]
    fn test_unknown_digest() {
        let err = from_uri("urn:example:md2").err().unwrap();
        assert!(matches!(err, Error::UnknownAlgorithm(_)));
    }
}
