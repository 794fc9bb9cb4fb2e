#![forbid(unsafe_code)]

//! `RespondWith` klasses and their process-wide id list.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tyresta_core::ns::{self, node, respond_with};
use tyresta_core::Error;

/// One value of the XKMS `<RespondWith>` element.
pub trait RespondWithKlass: Send + Sync {
    /// Element text, e.g. `"KeyValue"`.
    fn name(&self) -> &'static str;

    fn node_name(&self) -> &'static str {
        node::RESPOND_WITH
    }

    fn node_ns(&self) -> &'static str {
        ns::XKMS
    }
}

pub type RespondWithId = Arc<dyn RespondWithKlass>;

impl fmt::Debug for dyn RespondWithKlass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RespondWith({})", self.name())
    }
}

/// A `RespondWith` value defined by XKMS 2.0.
struct Standard(&'static str);

impl RespondWithKlass for Standard {
    fn name(&self) -> &'static str {
        self.0
    }
}

/// The nine values defined by XKMS 2.0, in document order.
pub fn standard() -> Vec<RespondWithId> {
    [
        respond_with::KEY_NAME,
        respond_with::KEY_VALUE,
        respond_with::PRIVATE_KEY,
        respond_with::RETRIEVAL_METHOD,
        respond_with::X509_CERT,
        respond_with::X509_CHAIN,
        respond_with::X509_CRL,
        respond_with::PGP,
        respond_with::SPKI,
    ]
    .into_iter()
    .map(|name| Arc::new(Standard(name)) as RespondWithId)
    .collect()
}

/// Position of `id` in `list`, compared by name.
pub fn find(list: &[RespondWithId], id: &RespondWithId) -> Option<usize> {
    list.iter().position(|k| k.name() == id.name())
}

pub fn find_by_name(list: &[RespondWithId], name: &str) -> Option<RespondWithId> {
    list.iter().find(|k| k.name() == name).cloned()
}

static IDS: RwLock<Option<Vec<RespondWithId>>> = RwLock::new(None);

/// Create the id list and register the standard klasses.
pub fn init() -> Result<(), Error> {
    {
        let mut guard = IDS.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            return Ok(());
        }
        *guard = Some(Vec::new());
    }
    register_default()
}

/// Register the standard klasses into an initialized list.
pub fn register_default() -> Result<(), Error> {
    for id in standard() {
        register(id)?;
    }
    tracing::debug!("registered default RespondWith klasses");
    Ok(())
}

pub fn register(id: RespondWithId) -> Result<(), Error> {
    let mut guard = IDS.write().unwrap_or_else(PoisonError::into_inner);
    let ids = guard.as_mut().ok_or(Error::RegistryNotInitialized)?;
    if find(ids, &id).is_some() {
        return Err(Error::DuplicateAlgorithm(id.name().to_owned()));
    }
    ids.push(id);
    Ok(())
}

/// Snapshot of the registered ids.
pub fn ids() -> Result<Vec<RespondWithId>, Error> {
    let guard = IDS.read().unwrap_or_else(PoisonError::into_inner);
    guard.clone().ok_or(Error::RegistryNotInitialized)
}

pub fn shutdown() {
    let mut guard = IDS.write().unwrap_or_else(PoisonError::into_inner);
    *guard = None;
}
