use std::path::{Path, PathBuf};

use super::{
    binding,
    instance::{Instance, CS, ME},
    schema,
};
use crate::{traits::FmiImport, Error};

use fmi_schema::MajorVersion;

/// `binaries/<folder>` of the running platform, as named by FMI 2.0.
pub fn platform_folder() -> Option<&'static str> {
    use std::env::consts::{ARCH, OS};
    Some(match (OS, ARCH) {
        ("linux", "x86_64") => "linux64",
        ("linux", "x86") => "linux32",
        ("windows", "x86_64") => "win64",
        ("windows", "x86") => "win32",
        // FMI 2.0 has a single macOS folder
        ("macos", "x86_64" | "aarch64") => "darwin64",
        _ => return None,
    })
}

/// An extracted FMI 2.0 package. The extraction is deleted on drop.
#[derive(Debug)]
pub struct Fmi2Import {
    dir: tempfile::TempDir,
    model_description: schema::Fmi2ModelDescription,
}

impl FmiImport for Fmi2Import {
    const MAJOR_VERSION: MajorVersion = MajorVersion::FMI2;
    type ModelDescription = schema::Fmi2ModelDescription;
    type Binding = binding::Fmi2Binding;
    type ValueRef = binding::fmi2ValueReference;

    fn new(dir: tempfile::TempDir, schema_xml: &str) -> Result<Self, Error> {
        let model_description = schema::Fmi2ModelDescription::deserialize(schema_xml)?;
        Ok(Self {
            dir,
            model_description,
        })
    }

    #[inline]
    fn archive_path(&self) -> &Path {
        self.dir.path()
    }

    fn shared_lib_path(&self, model_identifier: &str) -> Result<PathBuf, Error> {
        let folder = platform_folder().ok_or_else(|| Error::UnsupportedPlatform {
            os: std::env::consts::OS.to_owned(),
            arch: std::env::consts::ARCH.to_owned(),
        })?;
        let file_name = format!("{model_identifier}{}", std::env::consts::DLL_SUFFIX);
        Ok(["binaries", folder, &file_name].iter().collect())
    }

    fn model_description(&self) -> &Self::ModelDescription {
        &self.model_description
    }

    fn binding(&self, model_identifier: &str) -> Result<Self::Binding, Error> {
        let relative = self.shared_lib_path(model_identifier)?;
        let library = self.archive_path().join(&relative);
        if !library.is_file() {
            return Err(Error::ArchiveStructure(format!(
                "{} is missing",
                relative.display()
            )));
        }
        log::trace!("Loading {library:?}");
        let binding = unsafe { binding::Fmi2Binding::new(library)? };
        let missing = binding.missing_symbols();
        if !missing.is_empty() {
            log::debug!("{model_identifier} does not export {missing:?}");
        }
        Ok(binding)
    }
}

impl Fmi2Import {
    /// `file://` URI of the extracted `resources` directory, passed to `fmi2Instantiate`.
    pub fn canonical_resource_path_string(&self) -> Result<String, Error> {
        let resource_path = std::path::absolute(self.resource_path())?;
        url::Url::from_directory_path(&resource_path)
            .map(|url| url.as_str().to_owned())
            .map_err(|_| {
                Error::ArchiveStructure(format!(
                    "invalid resource location {}",
                    resource_path.display()
                ))
            })
    }

    /// Load the model-exchange library and create a component.
    pub fn instantiate_me(
        &self,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Instance<'_, ME>, Error> {
        Instance::<'_, ME>::new(self, instance_name, visible, logging_on)
    }

    /// Load the co-simulation library and create a component.
    pub fn instantiate_cs(
        &self,
        instance_name: &str,
        visible: bool,
        logging_on: bool,
    ) -> Result<Instance<'_, CS>, Error> {
        Instance::<'_, CS>::new(self, instance_name, visible, logging_on)
    }
}
