#![forbid(unsafe_code)]

//! Key requirements declared by transforms.
//!
//! A signature transform states what it needs (key class, private or
//! public half, intended usage) before any key is bound. The keys manager
//! uses the requirement to pick a candidate.

use crate::key::{Key, KeyUsage};
use tyresta_core::KeyDataId;

/// Which half of an asymmetric key pair is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Private,
    Public,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRequirement {
    pub key_id: KeyDataId,
    pub key_type: KeyType,
    pub usage: KeyUsage,
}

impl KeyRequirement {
    /// Requirement for producing a signature: a private key usable for signing.
    pub fn for_sign(key_id: KeyDataId) -> Self {
        Self {
            key_id,
            key_type: KeyType::Private,
            usage: KeyUsage::Sign,
        }
    }

    /// Requirement for checking a signature: any key with a public half.
    pub fn for_verify(key_id: KeyDataId) -> Self {
        Self {
            key_id,
            key_type: KeyType::Public,
            usage: KeyUsage::Verify,
        }
    }

    /// Whether `key` satisfies this requirement.
    ///
    /// Every asymmetric key carries its public half, so a `Public`
    /// requirement accepts private keys too.
    pub fn matches(&self, key: &Key) -> bool {
        if key.key_id() != self.key_id {
            return false;
        }
        let type_ok = match self.key_type {
            KeyType::Private => key.has_private(),
            KeyType::Public | KeyType::Any => true,
        };
        let usage_ok = self.usage == KeyUsage::Any
            || key.usage == KeyUsage::Any
            || key.usage == self.usage;
        type_ok && usage_ok
    }
}

impl std::fmt::Display for KeyRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} key ({:?}, usage {:?})",
            self.key_id, self.key_type, self.usage
        )
    }
}
