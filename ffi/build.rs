//! Generate `dashboard_ffi.h` for C hosts.
//!
//! The header is written to `OUT_DIR`. Generation failures are reported as
//! cargo warnings so a missing or partial parse never blocks the Rust build.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("DASHBOARD_FFI_H".to_string()),
        cpp_compat: true,
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("dashboard_ffi.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen: {e}"),
    }
}
