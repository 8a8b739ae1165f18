use std::env;
use std::path::PathBuf;

const HEADER_NAME: &str = "SmokeSimFFI.h";

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    // Header lands at the workspace root next to Cargo.toml
    let output_file = crate_dir.join("../..").join(HEADER_NAME);

    cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("SMOKE_SIM_FFI_H")
        .with_header("/* Periodic 2D smoke simulation: C interface */")
        .with_autogen_warning("/* Generated by cbindgen from crates/ffi, do not edit */")
        .with_cpp_compat(true)
        .with_documentation(true)
        .with_pragma_once(false)
        .generate()
        .expect("Unable to generate C bindings")
        .write_to_file(output_file);

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");
}
