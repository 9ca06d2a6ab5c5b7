//! isocrate-tablegen - write the generated lookup tables to disk
//!
//! The extractor crate embeds the same tables through its build script; this
//! tool exists for inspecting them or checking them into another project.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use isocrate_tables::{generate_tables, rust_source};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Rust source with flat `static` arrays
    Rust,
    /// serde_json dump of both tables
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "isocrate-tablegen")]
#[command(about = "Generate isosurface lookup tables", long_about = None)]
struct Cli {
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "rust")]
    format: Format,

    /// Print a per-class summary instead of the tables
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let tables = generate_tables().context("table generation failed")?;

    if cli.summary {
        for cell in [&tables.regular, &tables.transition] {
            println!(
                "{:?}: {} classes over {} configurations, longest patch {} edges",
                cell.kind,
                cell.class_count(),
                cell.configuration_count(),
                cell.max_patch_edges()
            );
            for (class, representative) in cell.representatives.iter().enumerate() {
                let members = cell.classes.iter().filter(|&&c| c as usize == class).count();
                let patches = cell.patch_count(*representative as usize);
                println!(
                    "  class {:2}  {:#011b}  {:3} configurations  {} patches",
                    class, representative, members, patches
                );
            }
        }
        return Ok(());
    }

    let text = match cli.format {
        Format::Rust => rust_source(&tables)?,
        Format::Json => serde_json::to_string_pretty(&tables)?,
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {:?} tables to {}", cli.format, path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
