//! The boundary between the HTTP layer and the simulation of a package.

use std::{path::PathBuf, time::Instant};

use anyhow::{bail, Context};
use arrow::record_batch::RecordBatch;
use fmi::{
    fmi2::import::Fmi2Import,
    import,
    schema::{traits::FmiModelDescription, MajorVersion},
};
use fmi_sim::SimOptions;

/// Everything needed to simulate one uploaded package.
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    /// The uploaded FMU archive
    pub package: PathBuf,
    /// Directory the archive is extracted into
    pub extract_parent: PathBuf,
    pub stop_time: f64,
    pub output_interval: f64,
    /// Variables to record, `None` for the model's declared outputs
    pub outputs: Option<Vec<String>>,
    /// `name=value` start values
    pub start_values: Vec<String>,
    pub deadline: Option<Instant>,
}

pub trait SimulationEngine: Send + Sync {
    /// Run the simulation, returning a batch with a `time` column followed by the outputs.
    fn simulate(&self, request: SimulationRequest) -> anyhow::Result<RecordBatch>;
}

/// Simulates FMI 2.0 packages in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct FmiEngine;

impl SimulationEngine for FmiEngine {
    fn simulate(&self, request: SimulationRequest) -> anyhow::Result<RecordBatch> {
        let descr = import::peek_descr_path(&request.package)
            .context("Reading the model description")?;
        let version = descr.major_version()?;
        if version != MajorVersion::FMI2 {
            bail!(fmi::Error::UnsupportedFmiVersion(version));
        }
        log::info!(
            "Simulating '{}' (FMI {}) until t = {}",
            descr.model_name(),
            descr.version_string(),
            request.stop_time
        );

        let import: Fmi2Import = import::from_path_in(&request.package, &request.extract_parent)
            .context("Importing the FMU")?;

        let options = SimOptions {
            start_time: Some(0.0),
            stop_time: Some(request.stop_time),
            output_interval: Some(request.output_interval),
            outputs: request.outputs,
            initial_values: request.start_values,
            deadline: request.deadline,
            ..Default::default()
        };

        Ok(fmi_sim::simulate(&import, &options)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_fmu(dir: &std::path::Path, name: &str, xml: &str) -> PathBuf {
        let path = dir.join(name);
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        zip.start_file("modelDescription.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        path
    }

    fn request(dir: &std::path::Path, package: PathBuf) -> SimulationRequest {
        SimulationRequest {
            package,
            extract_parent: dir.to_owned(),
            stop_time: 10.0,
            output_interval: 1.0 / 60.0,
            outputs: None,
            start_values: vec![],
            deadline: None,
        }
    }

    #[test_log::test]
    fn test_rejects_fmi3() {
        let dir = tempfile::tempdir().unwrap();
        let package = write_fmu(
            dir.path(),
            "Future.fmu",
            r#"<fmiModelDescription fmiVersion="3.0" modelName="Future"/>"#,
        );

        let err = FmiEngine.simulate(request(dir.path(), package)).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported FMI version: 3.0");
    }

    #[test_log::test]
    fn test_not_an_archive() {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("Garbage.fmu");
        std::fs::write(&package, b"definitely not a zip file").unwrap();

        let err = FmiEngine.simulate(request(dir.path(), package)).unwrap_err();
        assert!(format!("{err:#}").starts_with("Reading the model description: "));
    }

    #[test_log::test]
    fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let package = write_fmu(
            dir.path(),
            "FreeFallingBody.fmu",
            include_str!("../../fmi-schema/tests/FMI2.xml"),
        );

        assert!(FmiEngine.simulate(request(dir.path(), package)).is_err());

        // The extraction is removed together with the import
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(leftovers, ["FreeFallingBody.fmu"]);
    }

    #[test_log::test]
    fn test_simulate_package() {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("FreeFallingBody.fmu");
        std::fs::write(&package, fmu_test_data::package().unwrap()).unwrap();

        let batch = FmiEngine
            .simulate(SimulationRequest {
                start_values: vec!["body1.m=2.5".to_owned()],
                deadline: Some(Instant::now() + std::time::Duration::from_secs(60)),
                ..request(dir.path(), package)
            })
            .unwrap();
        assert_eq!(batch.num_rows(), 601);
        assert_eq!(batch.num_columns(), 4);
        assert_eq!(batch.schema().field(0).name(), "time");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
