//! Cell symmetry and lookup-table generation for isocrate
//!
//! This crate holds everything that is decided before a field is ever
//! sampled: the combinatorics of the two cell shapes, their symmetry groups,
//! reduction of configurations to canonical classes, and the expansion of a
//! small hand-authored topology into flat per-configuration tables.
//!
//! Generation runs offline. `isocrate-extract` calls [`generate_tables`] from
//! its build script and embeds the result with [`emit::rust_source`].

pub mod geometry;
pub mod symmetry;
pub mod canonical;
pub mod topology;
pub mod generator;
pub mod emit;

pub use geometry::{Axis, CellKind, CellShape, RegularCell, TransitionCell};
pub use symmetry::{Elementary, OpSequence};
pub use canonical::{Canonical, Canonicalizer};
pub use topology::{CanonicalTopology, REGULAR_TOPOLOGY, TRANSITION_TOPOLOGY};
pub use generator::{
    generate_cell_tables, generate_tables, validate_patches, CellTables, Tables, NO_ENTRY,
};
pub use emit::{rust_source, write_rust_source};
