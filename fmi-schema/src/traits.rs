//! Accessors shared by the version-specific description types.

use crate::{Error, MajorVersion};

/// Experiment settings suggested by the model author. Absent attributes are `None`.
pub trait DefaultExperiment {
    fn start_time(&self) -> Option<f64>;
    fn stop_time(&self) -> Option<f64>;
    fn tolerance(&self) -> Option<f64>;
    fn step_size(&self) -> Option<f64>;
}

pub trait FmiModelDescription {
    fn model_name(&self) -> &str;

    /// The `fmiVersion` attribute as written
    fn version_string(&self) -> &str;

    /// `fmiVersion` read leniently, so `"2.0"` and `"3.0-beta.2"` both parse.
    fn version(&self) -> Result<semver::Version, Error> {
        Ok(lenient_semver::parse(self.version_string()).map_err(|err| err.owned())?)
    }

    fn major_version(&self) -> Result<MajorVersion, Error> {
        let version = self.version()?;
        match version.major {
            1 => Ok(MajorVersion::FMI1),
            2 => Ok(MajorVersion::FMI2),
            3 => Ok(MajorVersion::FMI3),
            major => Err(Error::UnsupportedVersion(major)),
        }
    }
}
