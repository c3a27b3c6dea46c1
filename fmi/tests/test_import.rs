//! Import tests against synthetic FMU archives that carry a model description but no binaries.

use std::io::Write;

use fmi::{
    fmi2::import::Fmi2Import,
    import,
    schema::{traits::FmiModelDescription, MajorVersion},
    traits::FmiImport,
    Error, InterfaceType,
};

const FMI2_XML: &str = include_str!("../../fmi-schema/tests/FMI2.xml");

fn write_fmu(dir: &std::path::Path, name: &str, entries: &[(&str, &str)]) -> std::path::PathBuf {
    let path = dir.join(name);
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (entry, contents) in entries {
        zip.start_file(*entry, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
    path
}

#[test_log::test]
fn test_peek_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fmu(
        dir.path(),
        "FreeFallingBody.fmu",
        &[
            ("modelDescription.xml", FMI2_XML),
            ("resources/data.txt", "1 2 3"),
        ],
    );

    let descr = import::peek_descr_path(&path).unwrap();
    assert_eq!(descr.major_version().unwrap(), MajorVersion::FMI2);
    assert_eq!(descr.model_name, "FreeFallingBody");

    let extract_parent = dir.path().join("work");
    std::fs::create_dir(&extract_parent).unwrap();
    let import: Fmi2Import = import::from_path_in(&path, &extract_parent).unwrap();
    assert_eq!(import.model_description().model_name, "FreeFallingBody");
    assert!(import.archive_path().starts_with(&extract_parent));
    assert!(import
        .archive_path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("FreeFallingBody-"));
    assert!(import.resource_path().join("data.txt").is_file());

    let resource_url = import.canonical_resource_path_string().unwrap();
    assert!(resource_url.starts_with("file://"));
    assert!(resource_url.ends_with("/resources/"));

    let extracted = import.archive_path().to_path_buf();
    drop(import);
    assert!(!extracted.exists());
}

#[test_log::test]
fn test_missing_binary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fmu(
        dir.path(),
        "FreeFallingBody.fmu",
        &[("modelDescription.xml", FMI2_XML)],
    );
    let import: Fmi2Import = import::from_path(&path).unwrap();

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    assert_eq!(
        import.shared_lib_path("FreeFallingBody").unwrap(),
        std::path::Path::new("binaries/linux64/FreeFallingBody.so")
    );

    assert!(matches!(
        import.instantiate_cs("inst", false, false),
        Err(Error::ArchiveStructure(_)) | Err(Error::UnsupportedPlatform { .. })
    ));
    assert!(matches!(
        import.instantiate_me("inst", false, false),
        Err(Error::ArchiveStructure(_)) | Err(Error::UnsupportedPlatform { .. })
    ));
}

#[test]
fn test_unsupported_interface() {
    let xml = r#"<fmiModelDescription fmiVersion="2.0" modelName="OnlyME" guid="{1}">
        <ModelExchange modelIdentifier="OnlyME"/>
        <ModelVariables/>
    </fmiModelDescription>"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_fmu(dir.path(), "OnlyME.fmu", &[("modelDescription.xml", xml)]);
    let import: Fmi2Import = import::from_path(&path).unwrap();
    assert!(matches!(
        import.instantiate_cs("inst", false, false),
        Err(Error::UnsupportedFmuType(InterfaceType::CoSimulation))
    ));
}

#[test]
fn test_unsupported_version() {
    let xml = r#"<fmiModelDescription fmiVersion="3.0" modelName="BouncingBall" instantiationToken="{1}"/>"#;
    let dir = tempfile::tempdir().unwrap();
    let path = write_fmu(
        dir.path(),
        "BouncingBall.fmu",
        &[("modelDescription.xml", xml)],
    );
    assert_eq!(
        import::peek_descr_path(&path).unwrap().major_version().unwrap(),
        MajorVersion::FMI3
    );
    assert!(matches!(
        import::from_path::<Fmi2Import>(&path),
        Err(Error::UnsupportedFmiVersion(MajorVersion::FMI3))
    ));
}

#[test]
fn test_bad_archives() {
    let dir = tempfile::tempdir().unwrap();

    let no_descr = write_fmu(dir.path(), "Empty.fmu", &[("README.txt", "nothing here")]);
    assert!(matches!(
        import::peek_descr_path(&no_descr),
        Err(Error::ArchiveStructure(_))
    ));
    assert!(matches!(
        import::from_path::<Fmi2Import>(&no_descr),
        Err(Error::ArchiveStructure(_))
    ));

    let garbage = dir.path().join("Garbage.fmu");
    std::fs::write(&garbage, b"definitely not a zip archive").unwrap();
    assert!(matches!(
        import::peek_descr_path(&garbage),
        Err(Error::Zip(_))
    ));

    let bad_xml = write_fmu(dir.path(), "BadXml.fmu", &[("modelDescription.xml", "<fmiModel")]);
    assert!(matches!(
        import::peek_descr_path(&bad_xml),
        Err(Error::Schema(_))
    ));
}
