#![forbid(unsafe_code)]

//! Key types and data structures.

use tyresta_core::KeyDataId;
use tyresta_crypto::SigningKey;

/// Usage flags for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsage {
    Sign,
    Verify,
    Any,
}

/// The underlying key data.
pub enum KeyData {
    Rsa {
        private: Option<rsa::RsaPrivateKey>,
        public: rsa::RsaPublicKey,
    },
    Dsa {
        private: Option<dsa::SigningKey>,
        public: dsa::VerifyingKey,
    },
    EcP256 {
        private: Option<p256::ecdsa::SigningKey>,
        public: p256::ecdsa::VerifyingKey,
    },
    EcP384 {
        private: Option<p384::ecdsa::SigningKey>,
        public: p384::ecdsa::VerifyingKey,
    },
}

impl KeyData {
    pub fn key_id(&self) -> KeyDataId {
        match self {
            Self::Rsa { .. } => KeyDataId::Rsa,
            Self::Dsa { .. } => KeyDataId::Dsa,
            Self::EcP256 { .. } | Self::EcP384 { .. } => KeyDataId::Ec,
        }
    }

    pub fn has_private(&self) -> bool {
        match self {
            Self::Rsa { private, .. } => private.is_some(),
            Self::Dsa { private, .. } => private.is_some(),
            Self::EcP256 { private, .. } => private.is_some(),
            Self::EcP384 { private, .. } => private.is_some(),
        }
    }
}

impl std::fmt::Debug for KeyData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.has_private() {
            "private+public"
        } else {
            "public"
        };
        match self {
            Self::Rsa { .. } => write!(f, "RSA {kind} key"),
            Self::Dsa { .. } => write!(f, "DSA {kind} key"),
            Self::EcP256 { .. } => write!(f, "EC P-256 {kind} key"),
            Self::EcP384 { .. } => write!(f, "EC P-384 {kind} key"),
        }
    }
}

/// A named key with associated data.
#[derive(Debug)]
pub struct Key {
    /// Optional name for key lookup.
    pub name: Option<String>,
    pub data: KeyData,
    pub usage: KeyUsage,
}

impl Key {
    pub fn new(data: KeyData, usage: KeyUsage) -> Self {
        Self {
            name: None,
            data,
            usage,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_usage(mut self, usage: KeyUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Class of key material held, used for capability checks.
    pub fn key_id(&self) -> KeyDataId {
        self.data.key_id()
    }

    pub fn has_private(&self) -> bool {
        self.data.has_private()
    }

    /// Copy the key material out as a `SigningKey`.
    ///
    /// The private half is used when present. The result is an independent
    /// copy; dropping either side does not affect the other.
    pub fn to_signing_key(&self) -> SigningKey {
        match &self.data {
            KeyData::Rsa { private: Some(pk), .. } => SigningKey::Rsa(pk.clone()),
            KeyData::Rsa { public, .. } => SigningKey::RsaPublic(public.clone()),
            KeyData::Dsa { private: Some(sk), .. } => SigningKey::Dsa(sk.clone()),
            KeyData::Dsa { public, .. } => SigningKey::DsaPublic(public.clone()),
            KeyData::EcP256 { private: Some(sk), .. } => SigningKey::EcP256(sk.clone()),
            KeyData::EcP256 { public, .. } => SigningKey::EcP256Public(*public),
            KeyData::EcP384 { private: Some(sk), .. } => SigningKey::EcP384(sk.clone()),
            KeyData::EcP384 { public, .. } => SigningKey::EcP384Public(*public),
        }
    }
}
