use std::path::{Path, PathBuf};

use fmi_schema::{traits::FmiModelDescription, MajorVersion};

use crate::{Error, InterfaceType};

/// An unpacked FMU of one FMI major version.
pub trait FmiImport: Sized {
    const MAJOR_VERSION: MajorVersion;

    type ModelDescription: FmiModelDescription;

    /// Function table of the platform library
    type Binding;

    type ValueRef;

    /// Take ownership of the extraction directory `dir` and parse its description.
    fn new(dir: tempfile::TempDir, schema_xml: &str) -> Result<Self, Error>;

    /// Root of the extracted archive
    fn archive_path(&self) -> &Path;

    /// Location of the platform library inside [`FmiImport::archive_path`].
    fn shared_lib_path(&self, model_identifier: &str) -> Result<PathBuf, Error>;

    fn resource_path(&self) -> PathBuf {
        self.archive_path().join("resources")
    }

    fn model_description(&self) -> &Self::ModelDescription;

    /// Load the platform library of `model_identifier`.
    fn binding(&self, model_identifier: &str) -> Result<Self::Binding, Error>;
}

/// Selects the interface an instance is created for at compile time.
pub trait InstanceTag {
    const TYPE: InterfaceType;
}

/// A live component created from an [`FmiImport`].
pub trait FmiInstance {
    type ModelDescription: FmiModelDescription;

    type ValueRef;

    fn name(&self) -> &str;

    fn interface_type(&self) -> InterfaceType;

    fn model_description(&self) -> &Self::ModelDescription;
}
