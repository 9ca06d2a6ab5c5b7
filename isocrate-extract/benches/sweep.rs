//! Benchmarks for the lattice sweep and the transition stitcher

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use isocrate_core::Point3f;
use isocrate_extract::{
    extract_blocks, BoundaryFace, ExtractConfig, Lattice, LatticeSweepExtractor, MeshStyle,
    TransitionCellStitcher,
};

/// Sphere with a little surface detail so cells hit more than one class
fn bumpy_sphere(x: f32, y: f32, z: f32) -> f32 {
    let r = (x * x + y * y + z * z).sqrt();
    r - 1.0 + 0.05 * (7.0 * x).sin() * (5.0 * y).cos() * (3.0 * z).sin()
}

fn lattice(resolution: usize) -> Lattice {
    Lattice::from_bounds(
        [resolution; 3],
        Point3f::new(-1.3, -1.3, -1.3),
        Point3f::new(1.3, 1.3, 1.3),
    )
    .expect("valid lattice")
}

fn benchmark_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");

    for resolution in [16, 32, 64] {
        let lattice = lattice(resolution);
        group.throughput(Throughput::Elements(
            lattice.cells().iter().product::<usize>() as u64,
        ));
        for style in [MeshStyle::Triangles, MeshStyle::Dual] {
            let extractor = LatticeSweepExtractor::new(ExtractConfig::default().with_style(style));
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", style), resolution),
                &lattice,
                |b, lattice| {
                    b.iter(|| {
                        extractor
                            .extract(black_box(&bumpy_sphere), lattice)
                            .expect("extract")
                    })
                },
            );
        }
    }

    group.finish();
}

fn benchmark_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocks");
    let lattice = lattice(64);
    let config = ExtractConfig::default();

    for parts in [1, 2, 4] {
        let blocks = lattice.split([parts; 3]).expect("split");
        group.bench_with_input(
            BenchmarkId::from_parameter(parts * parts * parts),
            &blocks,
            |b, blocks| {
                b.iter(|| {
                    extract_blocks(black_box(&bumpy_sphere), blocks, &config).expect("extract")
                })
            },
        );
    }

    group.finish();
}

fn benchmark_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("transition");
    let stitcher = TransitionCellStitcher::new(
        ExtractConfig::default().with_transition_face(BoundaryFace::NegZ),
    );

    for resolution in [16, 32, 64] {
        let lattice = lattice(resolution);
        group.bench_with_input(BenchmarkId::from_parameter(resolution), &lattice, |b, lattice| {
            b.iter(|| {
                stitcher
                    .stitch(black_box(&bumpy_sphere), lattice, BoundaryFace::NegZ)
                    .expect("stitch")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sweep, benchmark_blocks, benchmark_transition);
criterion_main!(benches);
