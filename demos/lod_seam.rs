//! Stitch a coarse block to a refined neighbour and report the seam
//!
//! The coarse block sits above z = 0 and borders a block at twice its
//! resolution on its NegZ face. The three meshes (coarse, seam, fine) are
//! welded and every seam vertex shared with either side is counted.
//!
//! Run with: cargo run --package isocrate-demos --bin lod_seam -- --cells 8 --width 0.5

use anyhow::{Context, Result};
use clap::Parser;
use isocrate_core::{Mesh, Point3f};
use isocrate_extract::{
    merge_meshes, BoundaryFace, ExtractConfig, Lattice, LatticeSweepExtractor,
    TransitionCellStitcher,
};
use std::collections::HashSet;

#[derive(Parser, Debug)]
#[command(name = "lod_seam")]
#[command(about = "Report how a transition seam joins two levels of detail", long_about = None)]
struct Cli {
    /// Coarse cells per axis
    #[arg(short, long, default_value_t = 8)]
    cells: usize,

    /// Depth of the transition layer as a fraction of a coarse cell
    #[arg(short, long, default_value_t = 0.5)]
    width: f32,
}

/// A wavy sheet crossing the seam plane
fn sheet(x: f32, y: f32, z: f32) -> f32 {
    z - 0.3 * (2.0 * x).sin() * (1.5 * y).cos() + 0.05 * x
}

fn position_keys(mesh: &Mesh) -> HashSet<[u32; 3]> {
    mesh.positions
        .iter()
        .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let n = cli.cells + 1;
    let coarse = Lattice::from_bounds(
        [n, n, n],
        Point3f::new(-2.0, -2.0, 0.0),
        Point3f::new(2.0, 2.0, 2.0),
    )
    .context("invalid coarse lattice")?;
    let fine = Lattice::from_bounds(
        [2 * n - 1, 2 * n - 1, 2 * n - 1],
        Point3f::new(-2.0, -2.0, -2.0),
        Point3f::new(2.0, 2.0, 0.0),
    )
    .context("invalid fine lattice")?;

    let config = ExtractConfig::default()
        .with_transition_face(BoundaryFace::NegZ)
        .with_transition_width(cli.width);
    let coarse_mesh = LatticeSweepExtractor::new(config.clone()).extract(&sheet, &coarse)?;
    let seam = TransitionCellStitcher::new(config).stitch(&sheet, &coarse, BoundaryFace::NegZ)?;
    let fine_mesh = LatticeSweepExtractor::default().extract(&sheet, &fine)?;
    log::info!(
        "coarse {} faces, seam {} faces, fine {} faces",
        coarse_mesh.face_count(),
        seam.face_count(),
        fine_mesh.face_count()
    );

    let seam_keys = position_keys(&seam);
    let shared_coarse = position_keys(&coarse_mesh).intersection(&seam_keys).count();
    let shared_fine = position_keys(&fine_mesh).intersection(&seam_keys).count();

    let joined = merge_meshes([&coarse_mesh, &seam, &fine_mesh]);
    let open_edges = joined
        .edge_use_counts()
        .values()
        .filter(|&&count| count == 1)
        .count();
    let overused_edges = joined
        .edge_use_counts()
        .values()
        .filter(|&&count| count > 2)
        .count();

    println!("Transition width:        {}", cli.width);
    println!("Seam vertices:           {}", seam.vertex_count());
    println!("  shared with coarse:    {}", shared_coarse);
    println!("  shared with fine:      {}", shared_fine);
    println!("Welded mesh vertices:    {}", joined.vertex_count());
    println!("Welded mesh faces:       {}", joined.face_count());
    println!("Open edges (outer rim):  {}", open_edges);
    println!("Non-manifold edges:      {}", overused_edges);
    Ok(())
}
