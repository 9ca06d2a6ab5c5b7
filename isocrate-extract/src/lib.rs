//! Isosurface extraction for isocrate
//!
//! This crate turns a sampled [`ScalarField`](isocrate_core::ScalarField)
//! into a polygon mesh:
//! - [`LatticeSweepExtractor`] sweeps regular cells over one block
//! - [`TransitionCellStitcher`] closes the seam between a block and a
//!   neighbour at twice its resolution
//! - [`extract_blocks`] runs many blocks on the rayon thread pool
//!
//! Both extractors read the lookup tables that `isocrate-tables` generates
//! at build time.

pub mod tables;
pub mod lattice;
pub mod config;
pub mod sample;
pub mod sweep;
pub mod transition;
pub mod parallel;

mod builder;
mod cache;

pub use config::{ExtractConfig, MeshStyle, NormalMode, ZeroSamplePolicy};
pub use lattice::{BoundaryFace, FaceSet, Lattice};
pub use parallel::{extract_blocks, merge_meshes};
pub use sample::{edge_crossing, is_below};
pub use sweep::{extract, LatticeSweepExtractor};
pub use tables::{CellTable, REGULAR, TRANSITION};
pub use transition::{extract_transition, TransitionCellStitcher};
