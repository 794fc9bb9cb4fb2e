#![forbid(unsafe_code)]

//! Key-data identifiers.
//!
//! A `KeyDataId` names the class of key an algorithm can work with. Signature
//! transforms declare the id they need and refuse to bind a key of any
//! other class.

use crate::algorithm;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDataId {
    Rsa,
    Dsa,
    /// Elliptic-curve keys, any named curve.
    Ec,
}

impl KeyDataId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Dsa => "dsa",
            Self::Ec => "ec",
        }
    }

    /// The `KeyValue` type URI for this class.
    pub fn href(self) -> &'static str {
        match self {
            Self::Rsa => algorithm::RSA_KEY_VALUE,
            Self::Dsa => algorithm::DSA_KEY_VALUE,
            Self::Ec => algorithm::EC_KEY_VALUE,
        }
    }
}

impl fmt::Display for KeyDataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
