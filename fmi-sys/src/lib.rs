#![doc=include_str!( "../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

#[cfg(feature = "fmi2")]
pub mod fmi2;

/// A function of the FMI API was called that the loaded library doesn't export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Symbol {0} is not exported by the FMU library")]
pub struct MissingSymbol(pub &'static str);
