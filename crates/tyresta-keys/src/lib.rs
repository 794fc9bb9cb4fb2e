#![forbid(unsafe_code)]

//! Key management for tyresta.
//!
//! Holds loaded keys, answers key requirements declared by signature
//! transforms, and loads PKCS#8 / SubjectPublicKeyInfo material from PEM
//! or DER.

pub mod key;
pub mod loader;
pub mod manager;
pub mod requirement;

pub use key::{Key, KeyData, KeyUsage};
pub use manager::KeysManager;
pub use requirement::{KeyRequirement, KeyType};
