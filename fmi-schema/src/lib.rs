#![doc=include_str!( "../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(unsafe_code)]
#![deny(clippy::all)]

use std::fmt::Display;

use thiserror::Error;

#[cfg(feature = "fmi2")]
pub mod fmi2;
pub mod minimal;
pub mod traits;
pub mod utils;

/// FMI generation declared by a model description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorVersion {
    FMI1,
    FMI2,
    FMI3,
}

impl Display for MajorVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let major = match self {
            Self::FMI1 => 1,
            Self::FMI2 => 2,
            Self::FMI3 => 3,
        };
        write!(f, "{major}.0")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Variable {0} not found")]
    VariableNotFound(String),

    #[error(transparent)]
    Semver(#[from] lenient_semver::parser::OwnedError),

    #[error("Unsupported FMI major version {0}")]
    UnsupportedVersion(u64),

    #[error("Invalid model description XML: {0}")]
    XmlParse(String),

    #[error("Inconsistent model description: {0}")]
    Model(String),
}

/// Parse one of the schema types out of `xml`.
///
/// Whitespace around `=` in attributes is accepted.
pub fn deserialize<T: for<'a> hard_xml::XmlRead<'a>>(xml: &str) -> Result<T, Error> {
    let xml = utils::tighten_attributes(xml);
    T::from_str(&xml).map_err(|err| Error::XmlParse(err.to_string()))
}
