//! Integration tests for isocrate-extract
//!
//! These tests run the sweep and the stitcher on analytic fields and check
//! the properties a caller relies on: orientation, closure, vertex sharing
//! across blocks, and exact agreement along level-of-detail seams.

use isocrate_core::{Bounded, Error, HalfSpace, Mesh, Point3f, Sphere, Vector3f};
use isocrate_extract::*;
use std::collections::HashSet;

fn unit_sphere(x: f32, y: f32, z: f32) -> f32 {
    x * x + y * y + z * z - 1.0
}

fn sphere_lattice() -> Lattice {
    Lattice::from_bounds(
        [16, 16, 16],
        Point3f::new(-1.2, -1.2, -1.2),
        Point3f::new(1.2, 1.2, 1.2),
    )
    .unwrap()
}

fn position_key(p: &Point3f) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

fn position_set(mesh: &Mesh) -> HashSet<[u32; 3]> {
    mesh.positions.iter().map(position_key).collect()
}

fn mean_radius(mesh: &Mesh) -> f32 {
    let total: f32 = mesh.positions.iter().map(|p| p.coords.norm()).sum();
    total / mesh.vertex_count() as f32
}

#[test]
fn test_plane_winding() {
    let normal = Vector3f::new(0.3, -0.5, 0.8).normalize();
    let plane = HalfSpace::new(normal, 0.1);
    let lattice =
        Lattice::from_bounds([7, 6, 5], Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
            .unwrap();

    for style in [MeshStyle::Triangles, MeshStyle::Polygons, MeshStyle::Dual] {
        let extractor = LatticeSweepExtractor::new(ExtractConfig::default().with_style(style));
        let mesh = extractor.extract(&plane, &lattice).unwrap();
        assert!(!mesh.is_empty(), "{:?} produced nothing", style);
        for face_normal in mesh.calculate_face_normals() {
            if face_normal.norm() > 0.0 {
                assert!(face_normal.dot(&normal) > 0.0, "{:?} face faces inward", style);
            }
        }
        for vertex_normal in &mesh.normals {
            assert!(vertex_normal.dot(&normal) > 0.99);
        }
    }
}

#[test]
fn test_sphere_scenario() {
    let lattice = sphere_lattice();
    for style in [MeshStyle::Triangles, MeshStyle::Polygons, MeshStyle::Dual] {
        let extractor = LatticeSweepExtractor::new(ExtractConfig::default().with_style(style));
        let mesh = extractor.extract(&unit_sphere, &lattice).unwrap();

        assert!(mesh.vertex_count() > 0);
        assert!(mesh.is_closed(), "{:?} mesh has open edges", style);
        let bounds = Sphere::new(Point3f::origin(), 1.0);
        assert!(mesh.positions.iter().all(|p| bounds.contains(p, 0.05)));
        let radius = mean_radius(&mesh);
        assert!((radius - 1.0).abs() < 0.05, "{:?} mean radius {}", style, radius);

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(n.dot(&p.coords) > 0.0, "{:?} normal points inward", style);
        }
    }
}

#[test]
fn test_triangle_mesh_matches_polygons() {
    let lattice = sphere_lattice();
    let triangles = extract(&unit_sphere, [16, 16, 16], lattice.min(), lattice.max()).unwrap();
    let config = ExtractConfig::default().with_style(MeshStyle::Polygons);
    let polygons = LatticeSweepExtractor::new(config)
        .extract(&unit_sphere, &lattice)
        .unwrap();

    assert!(triangles.is_triangulated());
    assert_eq!(triangles.positions, polygons.positions);
    assert_eq!(polygons.triangulated().face_count(), triangles.face_count());
}

#[test]
fn test_face_average_normals() {
    let config = ExtractConfig::default().with_normals(NormalMode::FaceAverage);
    let mesh = LatticeSweepExtractor::new(config)
        .extract(&unit_sphere, &sphere_lattice())
        .unwrap();
    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
        assert!((n.norm() - 1.0).abs() < 1e-4);
        assert!(n.dot(&p.coords) > 0.0);
    }
}

#[test]
fn test_sweep_vertex_sharing() {
    let field = |x: f32, y: f32, z: f32| -> f32 { x + 0.7 * y - 0.4 * z - 0.35 };
    let lattice =
        Lattice::from_bounds([4, 4, 4], Point3f::origin(), Point3f::new(1.0, 1.0, 1.0)).unwrap();
    let whole = LatticeSweepExtractor::default().extract(&field, &lattice).unwrap();

    let halves = lattice.split([1, 2, 1]).unwrap();
    assert_eq!(halves.len(), 2);
    let mut joined = Mesh::new();
    for block in &halves {
        joined.append(&LatticeSweepExtractor::default().extract(&field, block).unwrap());
    }
    let duplicates = joined.weld();

    assert!(duplicates > 0);
    assert_eq!(joined.vertex_count(), whole.vertex_count());
    assert_eq!(joined.face_count(), whole.face_count());
    assert_eq!(position_set(&joined), position_set(&whole));
}

#[test]
fn test_parallel_matches_sequential() {
    let lattice = sphere_lattice();
    let config = ExtractConfig::default();
    let whole = LatticeSweepExtractor::new(config.clone())
        .extract(&unit_sphere, &lattice)
        .unwrap();

    let blocks = lattice.split([2, 3, 2]).unwrap();
    let meshes = extract_blocks(&unit_sphere, &blocks, &config).unwrap();
    let merged = merge_meshes(&meshes);

    assert_eq!(merged.vertex_count(), whole.vertex_count());
    assert_eq!(merged.face_count(), whole.face_count());
    assert_eq!(position_set(&merged), position_set(&whole));
    assert!(merged.is_closed());
}

/// Coarse block above z = 0 whose NegZ face borders a refined block
fn coarse_block() -> Lattice {
    Lattice::from_bounds(
        [5, 5, 4],
        Point3f::new(-1.0, -1.0, 0.0),
        Point3f::new(1.0, 1.0, 1.5),
    )
    .unwrap()
}

fn seam_field(x: f32, y: f32, z: f32) -> f32 {
    x + 0.37 * y + 0.2 * z - 0.11
}

#[test]
fn test_transition_stitch_matches_coarse_side() {
    let lattice = coarse_block();
    for width in [0.0, 0.5] {
        let config = ExtractConfig::default()
            .with_transition_face(BoundaryFace::NegZ)
            .with_transition_width(width);
        let coarse = LatticeSweepExtractor::new(config.clone())
            .extract(&seam_field, &lattice)
            .unwrap();
        let seam = TransitionCellStitcher::new(config)
            .stitch(&seam_field, &lattice, BoundaryFace::NegZ)
            .unwrap();
        assert!(!seam.is_empty());

        // vertices on the shifted low-resolution face
        let low_face = lattice.min().z + width * lattice.cell_size().z;
        let seam_positions = position_set(&seam);
        let boundary: Vec<_> = coarse
            .positions
            .iter()
            .filter(|p| p.z == low_face)
            .collect();
        assert!(!boundary.is_empty());
        for p in boundary {
            assert!(
                seam_positions.contains(&position_key(p)),
                "coarse vertex {:?} missing from the seam at width {}",
                p,
                width
            );
        }
    }
}

#[test]
fn test_transition_stitch_matches_fine_side() {
    let lattice = coarse_block();
    let [nx, ny, _] = lattice.samples();
    let min = lattice.min();
    let max = lattice.max();
    let fine = Lattice::from_bounds(
        [2 * nx - 1, 2 * ny - 1, 5],
        Point3f::new(min.x, min.y, min.z - 1.0),
        Point3f::new(max.x, max.y, min.z),
    )
    .unwrap();

    let fine_mesh = LatticeSweepExtractor::default()
        .extract(&seam_field, &fine)
        .unwrap();
    let config = ExtractConfig::default()
        .with_transition_face(BoundaryFace::NegZ)
        .with_transition_width(0.5);
    let seam = TransitionCellStitcher::new(config)
        .stitch(&seam_field, &lattice, BoundaryFace::NegZ)
        .unwrap();

    let seam_positions = position_set(&seam);
    let shared: Vec<_> = fine_mesh.positions.iter().filter(|p| p.z == min.z).collect();
    assert!(!shared.is_empty());
    for p in shared {
        assert!(seam_positions.contains(&position_key(p)), "fine vertex {:?} missing", p);
    }
}

#[test]
fn test_transition_every_face() {
    let sphere = |x: f32, y: f32, z: f32| -> f32 { x * x + y * y + z * z - 1.45 };
    let lattice =
        Lattice::from_bounds([5, 5, 5], Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
            .unwrap();
    let sizes: Vec<usize> = BoundaryFace::ALL
        .iter()
        .map(|&face| {
            extract_transition(&sphere, [5, 5, 5], lattice.min(), lattice.max(), face)
                .unwrap()
                .face_count()
        })
        .collect();
    // the field is symmetric, so is the seam
    assert!(sizes[0] > 0);
    assert!(sizes.iter().all(|&n| n == sizes[0]), "{:?}", sizes);
}

#[test]
fn test_resolution_below_two() {
    let result = extract(&unit_sphere, [1, 4, 4], Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
    assert!(matches!(result, Err(Error::InvalidResolution(_))));

    let result = extract_transition(
        &unit_sphere,
        [4, 0, 4],
        Point3f::origin(),
        Point3f::new(1.0, 1.0, 1.0),
        BoundaryFace::PosY,
    );
    assert!(matches!(result, Err(Error::InvalidResolution(_))));
}

#[test]
fn test_inverted_bounds() {
    let (min, max) = (Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 1.0));
    let result = extract(&unit_sphere, [4, 4, 4], min, max);
    assert!(matches!(result, Err(Error::InvalidBounds(_))));
}

#[test]
fn test_non_finite_field() {
    let field = |x: f32, _y: f32, _z: f32| -> f32 {
        if x > 0.5 {
            f32::NAN
        } else {
            x
        }
    };
    let result = extract(&field, [4, 4, 4], Point3f::origin(), Point3f::new(1.0, 1.0, 1.0));
    assert!(matches!(result, Err(Error::NonFiniteSample { .. })));

    let infinite = |_x: f32, _y: f32, _z: f32| -> f32 { f32::INFINITY };
    let result = extract_transition(
        &infinite,
        [3, 3, 3],
        Point3f::origin(),
        Point3f::new(1.0, 1.0, 1.0),
        BoundaryFace::NegX,
    );
    assert!(matches!(result, Err(Error::NonFiniteSample { .. })));
}

#[test]
fn test_zero_samples() {
    // x = 0 is a lattice plane
    let field = |x: f32, _y: f32, _z: f32| -> f32 { x };
    let lattice =
        Lattice::from_bounds([3, 3, 3], Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0))
            .unwrap();

    let nudged = LatticeSweepExtractor::default().extract(&field, &lattice).unwrap();
    assert!(!nudged.is_empty());
    assert!(nudged.positions.iter().all(|p| p.coords.iter().all(|c| c.is_finite())));
    assert!(nudged.positions.iter().all(|p| p.x.abs() < 1e-6));

    let reject = ExtractConfig::default().with_zero_samples(ZeroSamplePolicy::Reject);
    let result = LatticeSweepExtractor::new(reject).extract(&field, &lattice);
    assert!(matches!(result, Err(Error::DegenerateCell(_))));
}

#[test]
fn test_dual_transition_unsupported() {
    let config = ExtractConfig::default().with_style(MeshStyle::Dual);
    let stitcher = TransitionCellStitcher::new(config);
    let result = stitcher.stitch(&seam_field, &coarse_block(), BoundaryFace::NegZ);
    assert!(matches!(result, Err(Error::Unsupported(_))));
}

#[test]
fn test_invalid_config() {
    let lattice = coarse_block();
    for config in [
        ExtractConfig::default().with_gradient_step(0.0),
        ExtractConfig::default().with_gradient_step(f32::NAN),
        ExtractConfig::default().with_transition_width(1.0),
        ExtractConfig::default().with_transition_width(-0.1),
    ] {
        let result = LatticeSweepExtractor::new(config.clone()).extract(&seam_field, &lattice);
        assert!(matches!(result, Err(Error::InvalidConfig(_))), "{:?}", config);
        let result =
            TransitionCellStitcher::new(config).stitch(&seam_field, &lattice, BoundaryFace::NegZ);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}

#[test]
fn test_overlapping_transition_layers() {
    // one cell between the two z faces
    let lattice =
        Lattice::from_bounds([2, 2, 2], Point3f::origin(), Point3f::new(1.0, 1.0, 1.0)).unwrap();
    let plane = HalfSpace::new(Vector3f::new(1.0, 0.0, 0.0), 0.5);
    let both = ExtractConfig::default()
        .with_transition_face(BoundaryFace::NegZ)
        .with_transition_face(BoundaryFace::PosZ);

    let overlapping = both.clone().with_transition_width(0.75);
    let result = LatticeSweepExtractor::new(overlapping.clone()).extract(&plane, &lattice);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    let result =
        TransitionCellStitcher::new(overlapping).stitch(&plane, &lattice, BoundaryFace::NegZ);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));

    // the stitched face counts even when the sweep configuration omits it
    let one_sided = ExtractConfig::default()
        .with_transition_face(BoundaryFace::NegZ)
        .with_transition_width(0.5);
    assert!(LatticeSweepExtractor::new(one_sided.clone())
        .extract(&plane, &lattice)
        .is_ok());
    let result =
        TransitionCellStitcher::new(one_sided).stitch(&plane, &lattice, BoundaryFace::PosZ);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));

    let blocks = lattice.split([1, 1, 1]).unwrap();
    let result = extract_blocks(&plane, &blocks, &both.clone().with_transition_width(0.75));
    assert!(matches!(result, Err(Error::InvalidConfig(_))));

    let thin = both.with_transition_width(0.25);
    let mesh = LatticeSweepExtractor::new(thin).extract(&plane, &lattice).unwrap();
    assert!(!mesh.is_empty());
    for p in &mesh.positions {
        assert_eq!(p.x, 0.5);
        assert!(p.z >= 0.25 && p.z <= 0.75, "{:?}", p);
    }
    for n in mesh.calculate_face_normals() {
        assert!(n.x > 0.99, "normal {:?}", n);
    }
}

/// Every directed edge is used once and its reverse once
fn assert_watertight(mesh: &Mesh, context: &str) {
    let counts = mesh.edge_use_counts();
    let open = counts.values().filter(|&&count| count == 1).count();
    let overused = counts.values().filter(|&&count| count > 2).count();
    assert_eq!(open, 0, "open edges {}", context);
    assert_eq!(overused, 0, "non-manifold edges {}", context);

    let mut directed = HashSet::new();
    for face in mesh.faces() {
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            assert!(directed.insert((a, b)), "edge {:?} repeated {}", (a, b), context);
        }
    }
    for &(a, b) in &directed {
        assert!(directed.contains(&(b, a)), "edge {:?} has no twin {}", (a, b), context);
    }
}

#[test]
fn test_welded_seam_is_watertight() {
    for (face, offset) in [(BoundaryFace::NegZ, 0.05), (BoundaryFace::PosZ, -0.05)] {
        // a closed surface straddling the plane z = 0
        let blob = move |x: f32, y: f32, z: f32| -> f32 {
            let dz = z - offset;
            x * x + y * y + dz * dz - 0.4624
        };
        let (coarse_z, fine_z) = if face == BoundaryFace::NegZ {
            ((0.0, 1.0), (-1.0, 0.0))
        } else {
            ((-1.0, 0.0), (0.0, 1.0))
        };
        let coarse = Lattice::from_bounds(
            [5, 5, 3],
            Point3f::new(-1.0, -1.0, coarse_z.0),
            Point3f::new(1.0, 1.0, coarse_z.1),
        )
        .unwrap();
        let fine = Lattice::from_bounds(
            [9, 9, 5],
            Point3f::new(-1.0, -1.0, fine_z.0),
            Point3f::new(1.0, 1.0, fine_z.1),
        )
        .unwrap();
        let fine_mesh = LatticeSweepExtractor::default().extract(&blob, &fine).unwrap();

        for width in [0.0, 0.25, 0.5] {
            let config = ExtractConfig::default()
                .with_transition_face(face)
                .with_transition_width(width);
            let coarse_mesh = LatticeSweepExtractor::new(config.clone())
                .extract(&blob, &coarse)
                .unwrap();
            let seam = TransitionCellStitcher::new(config)
                .stitch(&blob, &coarse, face)
                .unwrap();
            assert!(!seam.is_empty());

            let joined = merge_meshes([&coarse_mesh, &seam, &fine_mesh]);
            assert!(joined.is_closed(), "{:?} at width {}", face, width);
            assert_watertight(&joined, &format!("on {:?} at width {}", face, width));
        }
    }
}
