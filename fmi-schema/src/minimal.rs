//! Minimal FMI definitions for determining FMI version.

use hard_xml::XmlRead;

use crate::traits::FmiModelDescription;

/// A minimal model description that only contains the FMI version
/// This is used to determine the FMI version of the FMU
#[derive(Default, PartialEq, Debug, XmlRead)]
#[xml(tag = "fmiModelDescription")]
pub struct MinModelDescription {
    #[xml(attr = "fmiVersion")]
    pub fmi_version: String,
    #[xml(attr = "modelName")]
    pub model_name: String,
}

impl MinModelDescription {
    pub fn deserialize(xml: &str) -> Result<Self, crate::Error> {
        crate::deserialize(xml)
    }
}

impl FmiModelDescription for MinModelDescription {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn version_string(&self) -> &str {
        &self.fmi_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MajorVersion;

    #[test]
    fn test_ignores_children() {
        let xml = r#"<fmiModelDescription fmiVersion="2.0" modelName="Pendulum" guid="{abc}">
            <CoSimulation modelIdentifier="Pendulum"/>
            <ModelVariables><ScalarVariable name="x" valueReference="0"><Real/></ScalarVariable></ModelVariables>
        </fmiModelDescription>"#;
        let md = MinModelDescription::deserialize(xml).unwrap();
        assert_eq!(md.model_name, "Pendulum");
        assert_eq!(md.major_version().unwrap(), MajorVersion::FMI2);
    }

    #[test]
    fn test_fmi3_prerelease() {
        let xml = r#"<fmiModelDescription fmiVersion="3.0-beta.2" modelName="BouncingBall"/>"#;
        let md = MinModelDescription::deserialize(xml).unwrap();
        assert_eq!(md.major_version().unwrap(), MajorVersion::FMI3);
        assert_eq!(md.version().unwrap().major, 3);
    }

    #[test]
    fn test_bad_version() {
        let xml = r#"<fmiModelDescription fmiVersion="7.1" modelName="Future"/>"#;
        let md = MinModelDescription::deserialize(xml).unwrap();
        assert_eq!(md.major_version(), Err(crate::Error::UnsupportedVersion(7)));
    }

    #[test]
    fn test_spaced_attributes() {
        let xml = r#"<fmiModelDescription
            fmiVersion = "2.0"
            modelName ='Spaced'/>"#;
        let md = MinModelDescription::deserialize(xml).unwrap();
        assert_eq!(md.model_name, "Spaced");
        assert_eq!(md.major_version().unwrap(), MajorVersion::FMI2);
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(
            MinModelDescription::deserialize("this is not xml"),
            Err(crate::Error::XmlParse(_))
        ));
    }
}
