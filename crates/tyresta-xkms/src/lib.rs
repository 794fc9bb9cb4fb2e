#![forbid(unsafe_code)]

//! XKMS server-side boundary for tyresta.
//!
//! Only the parts that share the klass-registry pattern with the transform
//! engine live here: the `RespondWith` klasses and the server context that
//! collects request parameters and result codes. XML marshalling and the
//! Locate/Validate dispatch are left to the caller.

pub mod context;
pub mod respond_with;

pub use context::{MajorResult, MinorResult, ResponseMechanism, ServerMode, XkmsServerCtx};
pub use respond_with::{RespondWithId, RespondWithKlass};
