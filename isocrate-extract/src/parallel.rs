//! Block-parallel extraction
//!
//! Blocks cut from one lattice with [`Lattice::split`] are independent: each
//! is swept on its own rayon task and the meshes come back in block order.
//! Abutting blocks interpolate their shared crossings to identical bits, so
//! [`merge_meshes`] can join them by welding.

use crate::config::ExtractConfig;
use crate::lattice::Lattice;
use crate::sweep::LatticeSweepExtractor;
use isocrate_core::{Mesh, Result, ScalarField};
use rayon::prelude::*;

/// Extract every block in parallel, one mesh per block in input order
pub fn extract_blocks<F>(field: &F, blocks: &[Lattice], config: &ExtractConfig) -> Result<Vec<Mesh>>
where
    F: ScalarField + Sync + ?Sized,
{
    config.validate()?;
    let extractor = LatticeSweepExtractor::new(config.clone());
    log::debug!("extracting {} blocks on {} threads", blocks.len(), rayon::current_num_threads());

    blocks
        .par_iter()
        .map(|block| extractor.extract(field, block))
        .collect()
}

/// Concatenate block meshes and weld their shared boundary vertices
pub fn merge_meshes<'a, I>(meshes: I) -> Mesh
where
    I: IntoIterator<Item = &'a Mesh>,
{
    let mut merged = Mesh::new();
    for mesh in meshes {
        merged.append(mesh);
    }
    let removed = merged.weld();
    log::debug!("welded {} duplicate boundary vertices", removed);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocrate_core::{Point3f, Sphere};

    #[test]
    fn test_blocks_keep_order() {
        let sphere = Sphere::new(Point3f::new(-0.5, 0.0, 0.0), 0.4);
        let lattice = Lattice::from_bounds(
            [9, 5, 5],
            Point3f::new(-1.0, -1.0, -1.0),
            Point3f::new(1.0, 1.0, 1.0),
        )
        .unwrap();
        let blocks = lattice.split([2, 1, 1]).unwrap();
        let meshes = extract_blocks(&sphere, &blocks, &ExtractConfig::default()).unwrap();
        assert_eq!(meshes.len(), 2);
        // the sphere sits entirely in the first block
        assert!(!meshes[0].is_empty());
        assert!(meshes[1].is_empty());
    }

    #[test]
    fn test_invalid_config_fails_before_work() {
        let max = Point3f::new(1.0, 1.0, 1.0);
        let lattice = Lattice::from_bounds([3, 3, 3], Point3f::origin(), max).unwrap();
        let config = ExtractConfig::default().with_gradient_step(-1.0);
        let field = |x: f32, _y: f32, _z: f32| -> f32 { x - 0.5 };
        assert!(extract_blocks(&field, &[lattice], &config).is_err());
    }

    #[test]
    fn test_merge_welds_shared_vertices() {
        let field = |x: f32, _y: f32, _z: f32| -> f32 { x - 0.3 };
        let max = Point3f::new(1.0, 2.0, 1.0);
        let lattice = Lattice::from_bounds([3, 5, 3], Point3f::origin(), max).unwrap();
        let blocks = lattice.split([1, 2, 1]).unwrap();
        let meshes = extract_blocks(&field, &blocks, &ExtractConfig::default()).unwrap();
        let merged = merge_meshes(&meshes);
        // the x edges of a 5 x 3 sheet of samples
        assert_eq!(merged.vertex_count(), 15);
        assert_eq!(
            merged.face_count(),
            meshes.iter().map(Mesh::face_count).sum::<usize>()
        );
    }
}
