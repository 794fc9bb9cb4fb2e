#![forbid(unsafe_code)]

//! Transform execution engine for tyresta.
//!
//! An algorithm URI is resolved to a [`TransformKlass`] through the
//! process-wide [`registry`]. The klass creates a [`Transform`] instance
//! that streams data through the algorithm-specific context and, for
//! signature klasses, produces or checks the fixed-width signature value.

pub mod base64_transform;
pub mod chain;
pub mod ctx;
pub mod digest_transform;
pub mod klass;
pub mod registry;
pub mod signature;
pub mod transform;

pub use chain::TransformChain;
pub use ctx::TransformCtx;
pub use klass::{TransformContext, TransformKlass, TransformOperation, TransformUsage};
pub use transform::{FailureReason, Transform, TransformStatus};
