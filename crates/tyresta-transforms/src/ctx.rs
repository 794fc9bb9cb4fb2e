#![forbid(unsafe_code)]

//! Transform context: configuration for creating transform instances.

use crate::klass::{TransformKlass, TransformOperation};
use crate::registry;
use crate::transform::Transform;
use tyresta_core::Error;

/// Configuration shared by the transforms a caller creates.
#[derive(Debug, Clone, Default)]
pub struct TransformCtx {
    /// Allowed transform URIs or names. Empty allows every registered klass.
    pub enabled_transforms: Vec<String>,
    /// Debug mode: log the size of every produced result.
    pub debug: bool,
}

impl TransformCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a transform by URI or name.
    pub fn enable(&mut self, uri_or_name: &str) {
        self.enabled_transforms.push(uri_or_name.to_owned());
    }

    pub fn is_enabled(&self, klass: &dyn TransformKlass) -> bool {
        self.enabled_transforms.is_empty()
            || self
                .enabled_transforms
                .iter()
                .any(|t| t == klass.href() || t == klass.name())
    }

    /// Look up `uri_or_name` in the registry and instantiate it for `operation`.
    ///
    /// A klass that exists but is not enabled is reported as unknown.
    pub fn create(
        &self,
        uri_or_name: &str,
        operation: TransformOperation,
    ) -> Result<Transform, Error> {
        let klass = registry::lookup(uri_or_name)?;
        if !self.is_enabled(klass.as_ref()) {
            return Err(Error::UnknownAlgorithm(format!("{uri_or_name} (not enabled)")));
        }
        if self.debug {
            tracing::debug!(
                transform = klass.name(),
                href = klass.href(),
                %operation,
                "creating transform"
            );
        }
        Transform::new(klass, operation)
    }
}
