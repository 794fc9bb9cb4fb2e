#![forbid(unsafe_code)]

//! Key manager with named key store.

use crate::key::Key;
use crate::requirement::KeyRequirement;
use tyresta_core::Error;

/// Manages a collection of keys for lookup during signature processing.
#[derive(Debug, Default)]
pub struct KeysManager {
    keys: Vec<Key>,
}

impl KeysManager {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn add_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Find a key by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.name.as_deref() == Some(name))
    }

    /// Find the first key satisfying a transform's key requirement.
    ///
    /// Keys are tried in insertion order.
    pub fn resolve_key(&self, requirement: &KeyRequirement) -> Result<&Key, Error> {
        let key = self
            .keys
            .iter()
            .find(|k| requirement.matches(k))
            .ok_or_else(|| Error::KeyNotFound(format!("no key satisfies {requirement}")))?;
        tracing::debug!(key = ?key.name, %requirement, "resolved key");
        Ok(key)
    }

    /// Like [`resolve_key`](Self::resolve_key), restricted to the key called `name`.
    pub fn resolve_named(
        &self,
        name: &str,
        requirement: &KeyRequirement,
    ) -> Result<&Key, Error> {
        let key = self
            .find_by_name(name)
            .ok_or_else(|| Error::KeyNotFound(format!("no key named {name}")))?;
        if !requirement.matches(key) {
            return Err(Error::KeyCapabilityMismatch {
                expected: requirement.key_id,
                actual: format!("{:?}", key.data),
            });
        }
        Ok(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_pem;
    use tyresta_core::KeyDataId;

    fn manager() -> KeysManager {
        let mut mngr = KeysManager::new();
        mngr.add_key(
            load_pem(include_bytes!("../testdata/dsa1024-pubkey.pem"))
                .unwrap()
                .with_name("dsa-pub"),
        );
        mngr.add_key(
            load_pem(include_bytes!("../testdata/dsa1024-key.pem"))
                .unwrap()
                .with_name("dsa"),
        );
        mngr.add_key(
            load_pem(include_bytes!("../testdata/ec-p256-key.pem"))
                .unwrap()
                .with_name("ec"),
        );
        mngr
    }

    #[test]
    fn test_resolve_skips_public_only_for_sign() {
        let mngr = manager();
        let key = mngr.resolve_key(&KeyRequirement::for_sign(KeyDataId::Dsa)).unwrap();
        assert_eq!(key.name.as_deref(), Some("dsa"));

        let key = mngr.resolve_key(&KeyRequirement::for_verify(KeyDataId::Dsa)).unwrap();
        assert_eq!(key.name.as_deref(), Some("dsa-pub"));
    }

    #[test]
    fn test_resolve_missing_class() {
        let mngr = manager();
        let err = mngr
            .resolve_key(&KeyRequirement::for_verify(KeyDataId::Rsa))
            .unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(_)));
    }

    #[test]
    fn test_resolve_named_checks_capability() {
        let mngr = manager();
        assert!(mngr
            .resolve_named("ec", &KeyRequirement::for_sign(KeyDataId::Ec))
            .is_ok());
        let err = mngr
            .resolve_named("dsa-pub", &KeyRequirement::for_sign(KeyDataId::Dsa))
            .unwrap_err();
        assert!(matches!(err, Error::KeyCapabilityMismatch { .. }));
        assert!(matches!(
            mngr.resolve_named("nope", &KeyRequirement::for_sign(KeyDataId::Dsa)),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_len() {
        let mngr = manager();
        assert_eq!(mngr.len(), 3);
        assert!(!mngr.is_empty());
        assert!(KeysManager::default().is_empty());
    }
}
