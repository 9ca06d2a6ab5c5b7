//! Rust source emission for generated tables

use crate::generator::{CellTables, Tables};
use isocrate_core::Result;
use std::fmt::{Display, Write};
use std::path::Path;

const VALUES_PER_LINE: usize = 16;

/// Render both tables as Rust source: one module per cell shape holding
/// flat `static` arrays.
pub fn rust_source(tables: &Tables) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "// Generated by isocrate-tables. Do not edit.")?;
    writeln!(out)?;
    write_module(&mut out, "regular", &tables.regular)?;
    writeln!(out)?;
    write_module(&mut out, "transition", &tables.transition)?;
    Ok(out)
}

/// Write the Rust source to a file
pub fn write_rust_source(tables: &Tables, path: &Path) -> Result<()> {
    let source = rust_source(tables)?;
    std::fs::write(path, source)?;
    log::debug!("wrote tables to {}", path.display());
    Ok(())
}

fn write_module(out: &mut String, name: &str, tables: &CellTables) -> Result<()> {
    writeln!(out, "#[rustfmt::skip]")?;
    writeln!(out, "pub mod {} {{", name)?;
    writeln!(out, "    pub const SAMPLE_COUNT: usize = {};", tables.sample_count)?;
    writeln!(out, "    pub const EDGE_COUNT: usize = {};", tables.edge_count)?;
    writeln!(out, "    pub const CLASS_COUNT: usize = {};", tables.class_count())?;
    writeln!(out, "    pub const MAX_PATCH_EDGES: usize = {};", tables.max_patch_edges())?;
    write_array(out, "REPRESENTATIVES", "u16", &tables.representatives)?;
    write_array(out, "CLASSES", "u8", &tables.classes)?;
    write_array(out, "OPERATIONS", "u8", &tables.operations)?;
    write_array(out, "PATCH_OFFSETS", "u32", &tables.patch_offsets)?;
    write_array(out, "PATCH_EDGE_OFFSETS", "u32", &tables.patch_edge_offsets)?;
    write_array(out, "PATCH_EDGES", "u8", &tables.patch_edges)?;
    write_array(out, "TRIANGLE_OFFSETS", "u32", &tables.triangle_offsets)?;
    let triangles: Vec<String> = tables
        .triangles
        .iter()
        .map(|[a, b, c]| format!("[{}, {}, {}]", a, b, c))
        .collect();
    write_array(out, "TRIANGLES", "[u8; 3]", &triangles)?;
    write_array(out, "VERTEX_INDEX", "u8", &tables.vertex_index)?;
    write_array(out, "WINDING", "u8", &tables.winding)?;
    writeln!(out, "}}")?;
    Ok(())
}

fn write_array<T: Display>(out: &mut String, name: &str, ty: &str, values: &[T]) -> Result<()> {
    writeln!(out, "    pub static {}: [{}; {}] = [", name, ty, values.len())?;
    for chunk in values.chunks(VALUES_PER_LINE) {
        out.push_str("       ");
        for value in chunk {
            write!(out, " {},", value)?;
        }
        out.push('\n');
    }
    writeln!(out, "    ];")?;
    Ok(())
}
