//! Extraction of FMU archives and detection of their FMI version.

use std::{
    io::{Read, Seek},
    path::Path,
};

use fmi_schema::{minimal::MinModelDescription, traits::FmiModelDescription};

use crate::{traits::FmiImport, Error};

const MODEL_DESCRIPTION: &str = "modelDescription.xml";

/// Read only the `modelDescription.xml` out of an FMU archive, without extracting anything.
pub fn peek_descr_path(path: impl AsRef<Path>) -> Result<MinModelDescription, Error> {
    let file = std::fs::File::open(path.as_ref())?;
    peek_descr(file)
}

/// Read only the `modelDescription.xml` out of an FMU archive from a reader.
pub fn peek_descr<R: Read + Seek>(reader: R) -> Result<MinModelDescription, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut descr_file = archive.by_name(MODEL_DESCRIPTION).map_err(|err| match err {
        zip::result::ZipError::FileNotFound => {
            Error::ArchiveStructure(format!("{MODEL_DESCRIPTION} not found"))
        }
        err => err.into(),
    })?;
    let mut descr_xml = String::new();
    descr_file.read_to_string(&mut descr_xml)?;
    let descr = MinModelDescription::deserialize(&descr_xml)?;
    log::debug!(
        "Found FMI {} named '{}'",
        descr.fmi_version,
        descr.model_name
    );
    Ok(descr)
}

/// Creates a new Import by extracting the FMU into the system temporary directory and parsing
/// the modelDescription XML
pub fn from_path<Imp: FmiImport>(path: impl AsRef<Path>) -> Result<Imp, Error> {
    let path = path.as_ref();
    log::debug!("Opening FMU file {path:?}");
    let file = std::fs::File::open(path)?;
    let temp_dir = tempfile::Builder::new()
        .prefix(&extract_prefix(path))
        .tempdir()?;
    new(file, temp_dir)
}

/// Like [`from_path`], but extracts into a new directory inside `parent`, named after the FMU
/// file without its `.fmu` extension.
pub fn from_path_in<Imp: FmiImport>(
    path: impl AsRef<Path>,
    parent: impl AsRef<Path>,
) -> Result<Imp, Error> {
    let path = path.as_ref();
    log::debug!("Opening FMU file {path:?}");
    let file = std::fs::File::open(path)?;
    let temp_dir = tempfile::Builder::new()
        .prefix(&extract_prefix(path))
        .tempdir_in(parent)?;
    new(file, temp_dir)
}

fn extract_prefix(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| format!("{stem}-"))
        .unwrap_or_else(|| "fmi-rs".to_owned())
}

/// Creates a new Import by extracting the FMU into `temp_dir` and parsing the modelDescription XML
pub fn new<R: Read + Seek, Imp: FmiImport>(
    reader: R,
    temp_dir: tempfile::TempDir,
) -> Result<Imp, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;
    log::debug!("Extracting into {temp_dir:?}");
    archive.extract(&temp_dir)?;

    for fname in archive.file_names() {
        log::trace!("  - {}", fname);
    }

    // Open and read the modelDescription XML into a string
    let descr_file_path = temp_dir.path().join(MODEL_DESCRIPTION);
    if !descr_file_path.is_file() {
        return Err(Error::ArchiveStructure(format!(
            "{MODEL_DESCRIPTION} not found"
        )));
    }
    let descr_xml = std::fs::read_to_string(descr_file_path)?;

    // Initial non-version-specific model description
    let descr = MinModelDescription::deserialize(&descr_xml)?;
    let major_version = descr.major_version()?;
    if major_version != Imp::MAJOR_VERSION {
        return Err(Error::UnsupportedFmiVersion(major_version));
    }

    Imp::new(temp_dir, &descr_xml)
}
