//! Process-wide registry lifecycle. Kept in its own test binary with a
//! single test so that `shutdown` cannot race other tests.

use std::sync::Arc;
use tyresta_core::{algorithm, Error};
use tyresta_transforms::{
    registry, TransformContext, TransformKlass, TransformOperation, TransformUsage,
};

struct NullKlass;

struct NullCtx;

impl TransformKlass for NullKlass {
    fn name(&self) -> &'static str {
        "null"
    }

    fn href(&self) -> &'static str {
        "urn:tyresta:null"
    }

    fn usage(&self) -> TransformUsage {
        TransformUsage::Other
    }

    fn new_context(&self) -> Result<Box<dyn TransformContext>, Error> {
        Ok(Box::new(NullCtx))
    }
}

impl TransformContext for NullCtx {
    fn execute(
        &mut self,
        _operation: TransformOperation,
        input: &[u8],
        _last: bool,
        _output: &mut Vec<u8>,
    ) -> Result<usize, Error> {
        Ok(input.len())
    }
}

#[test]
fn registry_lifecycle() {
    assert!(matches!(
        registry::lookup(algorithm::SHA1).err().unwrap(),
        Error::RegistryNotInitialized
    ));
    assert!(matches!(
        registry::register(Arc::new(NullKlass)).unwrap_err(),
        Error::RegistryNotInitialized
    ));

    registry::init().unwrap();
    registry::init().unwrap();
    let before = registry::klasses().unwrap().len();

    registry::register(Arc::new(NullKlass)).unwrap();
    assert!(matches!(
        registry::register(Arc::new(NullKlass)).unwrap_err(),
        Error::DuplicateAlgorithm(_)
    ));
    assert_eq!(registry::klasses().unwrap().len(), before + 1);

    let klass = registry::lookup("null").unwrap();
    assert_eq!(klass.href(), "urn:tyresta:null");
    assert!(matches!(
        registry::lookup("urn:tyresta:missing").err().unwrap(),
        Error::UnknownAlgorithm(_)
    ));

    // Lookups from several threads at once.
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| registry::lookup(algorithm::ECDSA_SHA256).map(|k| k.name())))
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().unwrap(), "ecdsa-sha256");
    }

    registry::shutdown();
    assert!(matches!(
        registry::lookup("null").err().unwrap(),
        Error::RegistryNotInitialized
    ));
    // A klass handed out before shutdown stays usable.
    assert_eq!(klass.name(), "null");

    registry::init().unwrap();
    assert_eq!(registry::klasses().unwrap().len(), before);
}
