//! Extract a sphere and report mesh statistics
//!
//! Run with: cargo run --package isocrate-demos --bin sphere -- --resolution 32 --output sphere.obj

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use isocrate_core::{Bounded, Mesh, Point3f};
use isocrate_extract::{extract_blocks, merge_meshes, ExtractConfig, Lattice, MeshStyle, NormalMode};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Triangles,
    Polygons,
    Dual,
}

impl From<Style> for MeshStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Triangles => MeshStyle::Triangles,
            Style::Polygons => MeshStyle::Polygons,
            Style::Dual => MeshStyle::Dual,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sphere")]
#[command(about = "Extract the unit sphere x² + y² + z² - 1 = 0", long_about = None)]
struct Cli {
    /// Samples per axis
    #[arg(short, long, default_value_t = 16)]
    resolution: usize,

    /// Half-width of the sampled cube
    #[arg(long, default_value_t = 1.2)]
    extent: f32,

    /// Output face style
    #[arg(short, long, value_enum, default_value = "triangles")]
    style: Style,

    /// Use face-averaged normals instead of field gradients
    #[arg(long)]
    face_normals: bool,

    /// Blocks per axis, extracted in parallel and welded
    #[arg(short, long, default_value_t = 1)]
    blocks: usize,

    /// Write the mesh as Wavefront OBJ
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn unit_sphere(x: f32, y: f32, z: f32) -> f32 {
    x * x + y * y + z * z - 1.0
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.extent <= 1.0 {
        bail!("extent {} does not enclose the unit sphere", cli.extent);
    }

    let lattice = Lattice::from_bounds(
        [cli.resolution; 3],
        Point3f::new(-cli.extent, -cli.extent, -cli.extent),
        Point3f::new(cli.extent, cli.extent, cli.extent),
    )
    .context("invalid lattice")?;
    let mut config = ExtractConfig::default().with_style(cli.style.into());
    if cli.face_normals {
        config = config.with_normals(NormalMode::FaceAverage);
    }

    log::info!(
        "extracting {:?} samples as {:?} in {} block(s) per axis",
        lattice.samples(),
        config.style,
        cli.blocks
    );
    let start = Instant::now();
    let blocks = lattice
        .split([cli.blocks; 3])
        .with_context(|| format!("cannot split into {} blocks per axis", cli.blocks))?;
    let meshes = extract_blocks(&unit_sphere, &blocks, &config).context("extraction failed")?;
    let mesh = merge_meshes(&meshes);
    let elapsed = start.elapsed();

    print_statistics(&mesh);
    println!("Extracted {} block(s) in {:.2?}", blocks.len(), elapsed);

    if let Some(path) = &cli.output {
        write_obj(&mesh, path).with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_statistics(mesh: &Mesh) {
    let radii: Vec<f32> = mesh.positions.iter().map(|p| p.coords.norm()).collect();
    let mean = radii.iter().sum::<f32>() / radii.len().max(1) as f32;
    let worst = radii.iter().map(|r| (r - 1.0).abs()).fold(0.0f32, f32::max);
    let normal_error = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| 1.0 - n.dot(&p.coords.normalize()))
        .fold(0.0f32, f32::max);

    let (min, max) = mesh.bounding_box();
    println!("Vertices:            {}", mesh.vertex_count());
    println!("Faces:               {}", mesh.face_count());
    println!("Closed:              {}", mesh.is_closed());
    println!("Mean radius:         {:.5}", mean);
    println!("Max radius error:    {:.5}", worst);
    println!("Max normal error:    {:.5}", normal_error);
    println!(
        "Bounds:              ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
}

fn write_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "# isocrate sphere")?;
    let vertices = mesh.vertices();
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
    }
    for v in &vertices {
        writeln!(writer, "vn {} {} {}", v.normal.x, v.normal.y, v.normal.z)?;
    }
    for face in mesh.faces() {
        write!(writer, "f")?;
        for &v in face {
            write!(writer, " {0}//{0}", v + 1)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
