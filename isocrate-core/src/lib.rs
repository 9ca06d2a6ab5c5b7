//! Core data structures and traits for isocrate
//!
//! This crate provides the types shared by the table generator and the
//! extractors: meshes, scalar fields, and the common error type.

pub mod point;
pub mod mesh;
pub mod field;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use field::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
