//! Expands the canonical topology into flat lookup tables at build time.

use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../isocrate-tables/src");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let tables = isocrate_tables::generate_tables().expect("canonical topology failed to expand");
    isocrate_tables::write_rust_source(&tables, &out_dir.join("tables.rs"))
        .expect("failed to write generated tables");
}
