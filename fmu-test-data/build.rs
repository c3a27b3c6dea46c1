use std::{env, error::Error, path::PathBuf};

/// Compile `models/FreeFallingBody.c` into a shared library the tests package as an FMU.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=models/FreeFallingBody.c");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let dll_suffix = match env::var("CARGO_CFG_TARGET_OS")?.as_str() {
        "windows" => ".dll",
        "macos" => ".dylib",
        _ => ".so",
    };
    let library = out_dir.join(format!("FreeFallingBody{dll_suffix}"));

    let mut build = cc::Build::new();
    build.file("models/FreeFallingBody.c").pic(true);
    let objects = build.compile_intermediates();

    let compiler = build.try_get_compiler()?;
    let mut link = compiler.to_command();
    if compiler.is_like_msvc() {
        link.arg("/LD")
            .args(&objects)
            .arg(format!("/Fe{}", library.display()));
    } else {
        link.arg("-shared")
            .args(&objects)
            .arg("-o")
            .arg(&library)
            .arg("-lm");
    }
    let status = link.status()?;
    if !status.success() {
        return Err(format!("linking {} failed with {status}", library.display()).into());
    }

    println!(
        "cargo:rustc-env=FREE_FALLING_BODY_LIBRARY={}",
        library.display()
    );
    Ok(())
}
