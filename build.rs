//! Builds the frei0r fixture libraries used by the test suite
//!
//! Only runs on Linux. When no C compiler is available a warning is emitted
//! and `FREI0R_FIXTURE_DIR` is left unset; the library itself never needs
//! the fixtures.

use std::env;
use std::path::{Path, PathBuf};

const SOURCE: &str = "tests/fixtures/plugin.c";

/// Output file and preprocessor definitions for each variant
const VARIANTS: &[(&str, &[&str])] = &[
    ("foo.so", &["-DPLUGIN_NAME=\"Foo\"", "-DPLUGIN_TYPE=1"]),
    ("bar.so", &["-DPLUGIN_NAME=\"Bar\"", "-DPLUGIN_TYPE=0"]),
    ("baz.so", &["-DPLUGIN_NAME=\"Baz\"", "-DPLUGIN_TYPE=2"]),
    ("no_entry.so", &["-DOMIT_ENTRY_POINT"]),
    ("unresolved.so", &["-DPLUGIN_NAME=\"Unresolved\"", "-DMISSING_SYMBOL"]),
    ("broken_entry.so", &["-DMISSING_SYMBOL_IN_ENTRY"]),
];

fn main() {
    println!("cargo:rerun-if-changed={SOURCE}");
    println!("cargo:rerun-if-changed=build.rs");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("linux") {
        return;
    }
    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };

    let dir = out_dir.join("fixtures");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        println!("cargo:warning=cannot create fixture dir {}: {e}", dir.display());
        return;
    }

    match build_fixtures(&dir) {
        Ok(()) => println!("cargo:rustc-env=FREI0R_FIXTURE_DIR={}", dir.display()),
        Err(e) => println!("cargo:warning=frei0r test fixtures not built: {e}"),
    }
}

fn build_fixtures(dir: &Path) -> Result<(), String> {
    let compiler = cc::Build::new()
        .cargo_metadata(false)
        .try_get_compiler()
        .map_err(|e| e.to_string())?;

    for (output, defines) in VARIANTS {
        let status = compiler
            .to_command()
            .args(["-shared", "-fPIC", "-o"])
            .arg(dir.join(output))
            .args(*defines)
            .arg(SOURCE)
            .status()
            .map_err(|e| format!("{output}: {e}"))?;

        if !status.success() {
            return Err(format!("{output}: compiler exited with {status}"));
        }
    }

    Ok(())
}
