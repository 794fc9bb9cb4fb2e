#![forbid(unsafe_code)]

//! Process-wide transform klass registry.
//!
//! The registry must be populated with [`init`] before the first
//! [`lookup`]; using it earlier is a programming error and fails with
//! `RegistryNotInitialized`. After start-up it is read-mostly and can be
//! queried from any thread.

use crate::base64_transform::Base64Klass;
use crate::digest_transform::DigestKlass;
use crate::klass::TransformKlass;
use crate::signature::SignatureKlass;
use std::sync::{Arc, PoisonError, RwLock};
use tyresta_core::{algorithm, Error};
use tyresta_crypto::DigestMethod;

static REGISTRY: RwLock<Option<Registry>> = RwLock::new(None);

/// An ordered list of klasses, searchable by href or name.
#[derive(Default)]
pub struct Registry {
    klasses: Vec<Arc<dyn TransformKlass>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in klass.
    pub fn with_defaults() -> Result<Self, Error> {
        let mut registry = Self::new();
        for klass in default_klasses()? {
            registry.register(klass)?;
        }
        Ok(registry)
    }

    /// Add a klass. Fails if its href or name is already taken.
    pub fn register(&mut self, klass: Arc<dyn TransformKlass>) -> Result<(), Error> {
        if self
            .klasses
            .iter()
            .any(|k| k.href() == klass.href() || k.name() == klass.name())
        {
            return Err(Error::DuplicateAlgorithm(klass.href().to_owned()));
        }
        self.klasses.push(klass);
        Ok(())
    }

    /// Find a klass by URI or short name.
    pub fn lookup(&self, uri_or_name: &str) -> Result<Arc<dyn TransformKlass>, Error> {
        self.klasses
            .iter()
            .find(|k| k.href() == uri_or_name || k.name() == uri_or_name)
            .cloned()
            .ok_or_else(|| Error::UnknownAlgorithm(uri_or_name.to_owned()))
    }

    pub fn klasses(&self) -> &[Arc<dyn TransformKlass>] {
        &self.klasses
    }

    pub fn len(&self) -> usize {
        self.klasses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.klasses.is_empty()
    }
}

fn default_klasses() -> Result<Vec<Arc<dyn TransformKlass>>, Error> {
    use algorithm::*;

    let signatures = [
        (NAME_DSA_SHA1, DSA_SHA1),
        (NAME_DSA_SHA256, DSA_SHA256),
        (NAME_ECDSA_SHA1, ECDSA_SHA1),
        (NAME_ECDSA_SHA224, ECDSA_SHA224),
        (NAME_ECDSA_SHA256, ECDSA_SHA256),
        (NAME_ECDSA_SHA384, ECDSA_SHA384),
        (NAME_ECDSA_SHA512, ECDSA_SHA512),
        (NAME_RSA_SHA1, RSA_SHA1),
        (NAME_RSA_SHA224, RSA_SHA224),
        (NAME_RSA_SHA256, RSA_SHA256),
        (NAME_RSA_SHA384, RSA_SHA384),
        (NAME_RSA_SHA512, RSA_SHA512),
    ];
    let digests = [
        (NAME_SHA1, DigestMethod::Sha1),
        (NAME_SHA224, DigestMethod::Sha224),
        (NAME_SHA256, DigestMethod::Sha256),
        (NAME_SHA384, DigestMethod::Sha384),
        (NAME_SHA512, DigestMethod::Sha512),
    ];

    let mut klasses: Vec<Arc<dyn TransformKlass>> = Vec::new();
    for (name, href) in signatures {
        klasses.push(Arc::new(SignatureKlass::new(name, href)?));
    }
    for (name, method) in digests {
        klasses.push(Arc::new(DigestKlass::new(name, method)));
    }
    klasses.push(Arc::new(Base64Klass));
    Ok(klasses)
}

/// Populate the process-wide registry with the built-in klasses.
///
/// Calling `init` again while the registry is live is a no-op.
pub fn init() -> Result<(), Error> {
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if guard.is_some() {
        tracing::debug!("transform registry already initialized");
        return Ok(());
    }
    let registry = Registry::with_defaults()?;
    tracing::debug!(klasses = registry.len(), "transform registry initialized");
    *guard = Some(registry);
    Ok(())
}

/// Add a klass to the process-wide registry.
pub fn register(klass: Arc<dyn TransformKlass>) -> Result<(), Error> {
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    let registry = guard.as_mut().ok_or(Error::RegistryNotInitialized)?;
    tracing::debug!(transform = klass.name(), "registering transform");
    registry.register(klass)
}

/// Find a klass in the process-wide registry by URI or short name.
pub fn lookup(uri_or_name: &str) -> Result<Arc<dyn TransformKlass>, Error> {
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    guard
        .as_ref()
        .ok_or(Error::RegistryNotInitialized)?
        .lookup(uri_or_name)
}

/// Snapshot of every registered klass, in registration order.
pub fn klasses() -> Result<Vec<Arc<dyn TransformKlass>>, Error> {
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    Ok(guard
        .as_ref()
        .ok_or(Error::RegistryNotInitialized)?
        .klasses()
        .to_vec())
}

/// Drop every registered klass. Instances already created keep their
/// klass alive until they are dropped.
pub fn shutdown() {
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if guard.take().is_some() {
        tracing::debug!("transform registry shut down");
    }
}
