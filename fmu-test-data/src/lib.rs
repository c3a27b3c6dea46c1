#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(clippy::all)]

use std::io::{Cursor, Write};

use anyhow::Context;
use fmi::fmi2::import::{platform_folder, Fmi2Import};
use tempfile::NamedTempFile;
use zip::{write::FileOptions, ZipWriter};

/// The description packaged with the model, shared with the schema tests.
pub const MODEL_DESCRIPTION: &str = include_str!("../../fmi-schema/tests/FMI2.xml");

pub const MODEL_IDENTIFIER: &str = "FreeFallingBody";

/// Spring constant of the model, in N/m
pub const STIFFNESS: f64 = 40.0;

pub const GRAVITY: f64 = 9.81;

const LIBRARY: &str = env!("FREE_FALLING_BODY_LIBRARY");

/// Zip the model description and the library compiled for this platform into an FMU.
pub fn package() -> anyhow::Result<Vec<u8>> {
    let folder = platform_folder().with_context(|| {
        format!(
            "No FMI 2.0 platform folder for {}-{}",
            std::env::consts::OS,
            std::env::consts::ARCH
        )
    })?;
    let library = std::fs::read(LIBRARY).context(format!("Reading {LIBRARY}"))?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("modelDescription.xml", FileOptions::default())?;
    zip.write_all(MODEL_DESCRIPTION.as_bytes())?;
    zip.start_file(
        format!(
            "binaries/{folder}/{MODEL_IDENTIFIER}{}",
            std::env::consts::DLL_SUFFIX
        ),
        FileOptions::default().unix_permissions(0o755),
    )?;
    zip.write_all(&library)?;
    Ok(zip.finish()?.into_inner())
}

/// Write the packaged FMU into a temporary file
pub fn extract_fmu() -> anyhow::Result<NamedTempFile> {
    let mut fout = tempfile::Builder::new()
        .prefix(MODEL_IDENTIFIER)
        .suffix(".fmu")
        .tempfile()?;
    fout.write_all(&package()?)
        .context("Writing the FMU to a tempfile")?;
    Ok(fout)
}

/// Import the packaged FMU, extracted into the system temporary directory.
pub fn import() -> anyhow::Result<Fmi2Import> {
    let dir = tempfile::Builder::new()
        .prefix(&format!("{MODEL_IDENTIFIER}-"))
        .tempdir()?;
    Ok(fmi::import::new(Cursor::new(package()?), dir)?)
}

/// Height of `body1` at `time` when released at rest from `anchor`.
pub fn height(mass: f64, anchor: f64, time: f64) -> f64 {
    let omega = (STIFFNESS / mass).sqrt();
    let sag = GRAVITY * mass / STIFFNESS;
    anchor - sag + sag * (omega * time).cos()
}

#[test]
fn test_free_falling_body() {
    use fmi::traits::FmiImport;
    let fmu = import().unwrap();
    assert_eq!(fmu.model_description().model_name, MODEL_IDENTIFIER);
    let library = fmu.shared_lib_path(MODEL_IDENTIFIER).unwrap();
    assert!(fmu.archive_path().join(library).is_file());

    let file = extract_fmu().unwrap();
    assert!(fmi::import::peek_descr_path(file.path()).is_ok());
}

#[test]
fn test_height() {
    assert!((height(1.0, 0.5, 0.0) - 0.5).abs() < 1e-12);
    // Lowest point is twice the static sag below the anchor
    let period = std::f64::consts::TAU / (STIFFNESS / 2.5).sqrt();
    let lowest = height(2.5, 0.5, period / 2.0);
    assert!((lowest - (0.5 - 2.0 * GRAVITY * 2.5 / STIFFNESS)).abs() < 1e-12);
}
