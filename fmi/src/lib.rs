//! Loading and driving FMI 2.0 packages (FMUs) from Rust.
//!
//! An [`import`] unpacks the `.fmu` archive and parses its model description. Instances created
//! from an import load the platform library and expose the FMI calls through the
//! [`fmi2::instance`] traits.
//!
//! ```rust,no_run
//! use fmi::{fmi2::{import::Fmi2Import, instance::Common}, import, traits::FmiImport};
//!
//! let import: Fmi2Import = import::from_path("BouncingBall.fmu").unwrap();
//! let mut cs = import.instantiate_cs("ball", false, true).unwrap();
//! cs.setup_experiment(None, 0.0, Some(3.0)).unwrap();
//! ```
//!
//! Packages of an unknown version can be inspected first:
//!
//! ```rust,no_run
//! use fmi::{import, schema::{MajorVersion, traits::FmiModelDescription}};
//!
//! let descr = import::peek_descr_path("BouncingBall.fmu").unwrap();
//! if descr.major_version().unwrap() != MajorVersion::FMI2 {
//!     eprintln!("{} needs FMI {}", descr.model_name(), descr.version_string());
//! }
//! ```
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

pub use fmi_schema as schema;

use schema::MajorVersion;

mod event_flags;
#[cfg(feature = "fmi2")]
pub mod fmi2;
pub mod import;
pub mod traits;

pub use event_flags::EventFlags;
pub use schema::fmi2::InterfaceType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The FMU returned no component")]
    Instantiation,

    #[error("The FMU does not implement {0}")]
    UnsupportedFmuType(InterfaceType),

    #[error("Unsupported platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Unsupported FMI version: {0}")]
    UnsupportedFmiVersion(MajorVersion),

    #[error("Malformed FMU archive: {0}")]
    ArchiveStructure(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Schema(#[from] fmi_schema::Error),

    #[error(transparent)]
    Nul(#[from] std::ffi::NulError),

    #[error(transparent)]
    LibLoading {
        #[from]
        source: libloading::Error,
    },

    #[cfg(feature = "fmi2")]
    #[error(transparent)]
    Fmi2Error(#[from] fmi2::Fmi2Error),
}

/// Instance tag of the model-exchange interface
pub struct ME;

impl traits::InstanceTag for ME {
    const TYPE: InterfaceType = InterfaceType::ModelExchange;
}

/// Instance tag of the co-simulation interface
pub struct CS;

impl traits::InstanceTag for CS {
    const TYPE: InterfaceType = InterfaceType::CoSimulation;
}
