#![forbid(unsafe_code)]

//! Core types for the tyresta XML Security transform engine.

pub mod algorithm;
pub mod error;
pub mod keydata;
pub mod ns;

pub use error::{Error, Result};
pub use keydata::KeyDataId;
