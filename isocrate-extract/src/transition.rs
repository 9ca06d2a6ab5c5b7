//! Transition cells along a level-of-detail seam
//!
//! A coarse block whose face borders a block at twice the resolution gets a
//! layer of transition cells on that face. Each transition cell covers one
//! coarse face cell: its high-resolution side samples the field on the fine
//! lattice (3 x 3 points, shared with the fine neighbour), its
//! low-resolution side reuses the four coarse corners at the positions the
//! regular sweep places them. Crossings on both sides are interpolated with
//! the same function and the same corner order as the neighbouring
//! extractors, so the seam closes without T-junctions.

use crate::builder::SurfaceBuilder;
use crate::cache::{EdgeVertices, SliceRing};
use crate::config::{ExtractConfig, MeshStyle};
use crate::lattice::{BoundaryFace, Lattice};
use crate::sample::is_below;
use crate::tables::TRANSITION;
use isocrate_core::{Error, Mesh, Point3f, Result, ScalarField};
use isocrate_tables::{CellShape, TransitionCell};

/// Stitches one face of a coarse block to its refined neighbour
#[derive(Debug, Clone, Default)]
pub struct TransitionCellStitcher {
    config: ExtractConfig,
}

impl TransitionCellStitcher {
    /// Create a stitcher; use the same configuration as the coarse sweep
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Build the transition layer on `face` of the coarse block `lattice`
    pub fn stitch<F: ScalarField + ?Sized>(
        &self,
        field: &F,
        lattice: &Lattice,
        face: BoundaryFace,
    ) -> Result<Mesh> {
        self.config.validate()?;
        if self.config.style == MeshStyle::Dual {
            return Err(Error::Unsupported(
                "transition cells do not produce dual meshes".to_string(),
            ));
        }
        lattice.check_transition_faces(
            self.config.transition_faces.with(face),
            self.config.transition_width,
        )?;

        let mut stitch = Stitch::new(field, lattice, face, &self.config);
        stitch.sample_face()?;
        stitch.run()?;
        let mesh = stitch.builder.finish();

        log::debug!(
            "stitched {:?} face of {:?} cells: {} vertices, {} faces",
            face,
            lattice.cells(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Build the transition layer on `face` of the block `[min, max]` sampled at
/// `resolution` points per axis, with the default configuration
pub fn extract_transition<F: ScalarField + ?Sized>(
    field: &F,
    resolution: [usize; 3],
    min: Point3f,
    max: Point3f,
    face: BoundaryFace,
) -> Result<Mesh> {
    let lattice = Lattice::from_bounds(resolution, min, max)?;
    TransitionCellStitcher::default().stitch(field, &lattice, face)
}

struct Stitch<'a, F: ?Sized> {
    lattice: &'a Lattice,
    fine: Lattice,
    face: BoundaryFace,
    config: &'a ExtractConfig,
    builder: SurfaceBuilder<'a, F>,
    /// Fine samples per tangent axis
    extent: [usize; 2],
    /// Fine sample values on the face, row-major in `(u, v)`
    values: Vec<f32>,
    edges: SliceRing<EdgeVertices<16>>,
}

impl<'a, F: ScalarField + ?Sized> Stitch<'a, F> {
    fn new(
        field: &'a F,
        lattice: &'a Lattice,
        face: BoundaryFace,
        config: &'a ExtractConfig,
    ) -> Self {
        let (u, v) = face.tangents();
        let cells = lattice.cells();
        let extent = [2 * cells[u.index()] + 1, 2 * cells[v.index()] + 1];
        Self {
            lattice,
            fine: lattice.refined(),
            face,
            config,
            builder: SurfaceBuilder::new(field, config, lattice.cell_size() * 0.5),
            extent,
            values: vec![0.0; extent[0] * extent[1]],
            edges: SliceRing::new(cells[u.index()], cells[v.index()]),
        }
    }

    /// Lattice index of a point on the face, `(i, j)` along `(u, v)`
    fn face_index(&self, lattice: &Lattice, i: usize, j: usize) -> [usize; 3] {
        let (u, v) = self.face.tangents();
        let mut index = [0; 3];
        index[u.index()] = i;
        index[v.index()] = j;
        let a = self.face.axis().index();
        index[a] = if self.face.is_positive() {
            lattice.samples()[a] - 1
        } else {
            0
        };
        index
    }

    fn sample_face(&mut self) -> Result<()> {
        for j in 0..self.extent[1] {
            for i in 0..self.extent[0] {
                let p = self.fine.position(self.face_index(&self.fine, i, j));
                self.values[j * self.extent[0] + i] = self.builder.sample(&p)?;
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let cells = [
            (self.extent[0] - 1) / 2,
            (self.extent[1] - 1) / 2,
        ];
        for j in 0..cells[1] {
            for i in 0..cells[0] {
                self.cell([i, j, 0])?;
            }
        }
        Ok(())
    }

    /// Fine `(i, j)` of a transition corner; low corners alias their sample
    fn fine_coordinates(&self, cell: [usize; 3], corner: usize) -> (usize, usize) {
        let [su, sv, _] = TransitionCell::corner_position(TransitionCell::corner_sample(corner));
        (2 * cell[0] + su as usize, 2 * cell[1] + sv as usize)
    }

    fn corner_value(&self, cell: [usize; 3], corner: usize) -> f32 {
        let (i, j) = self.fine_coordinates(cell, corner);
        self.values[j * self.extent[0] + i]
    }

    /// Output position of a transition corner
    fn corner_position(&self, cell: [usize; 3], corner: usize) -> Point3f {
        let (i, j) = self.fine_coordinates(cell, corner);
        if corner < TransitionCell::FIRST_LOW_CORNER {
            self.fine.position(self.face_index(&self.fine, i, j))
        } else {
            let faces = self.config.transition_faces.with(self.face);
            let index = self.face_index(self.lattice, i / 2, j / 2);
            self.lattice
                .sample_position(index, faces, self.config.transition_width)
        }
    }

    fn cell(&mut self, cell: [usize; 3]) -> Result<()> {
        let mut configuration = 0usize;
        for sample in 0..TransitionCell::SAMPLE_COUNT {
            if is_below(self.corner_value(cell, sample)) {
                configuration |= 1 << sample;
            }
        }
        if TRANSITION.patch_count(configuration) == 0 {
            return Ok(());
        }

        let mut resolved: EdgeVertices<16> = [None; 16];
        for patch in TRANSITION.patches(configuration) {
            for &edge in patch {
                let edge = edge as usize;
                let vertex = match self.edges.shared_vertex::<TransitionCell>(cell, edge) {
                    Some(vertex) => vertex,
                    None => {
                        let [a, b] = TransitionCell::edge_corners(edge);
                        let pa = self.corner_position(cell, a);
                        let pb = self.corner_position(cell, b);
                        let va = self.corner_value(cell, a);
                        let vb = self.corner_value(cell, b);
                        self.builder.crossing_vertex(&pa, &pb, va, vb)
                    }
                };
                resolved[edge] = Some(vertex);
            }
        }
        *self.edges.get_mut(cell) = resolved;

        // positive faces see the cell through a mirrored frame
        let flip = self.face.is_positive();
        let vertex = |edge: u8| {
            resolved[edge as usize].ok_or_else(|| {
                Error::Authoring(format!(
                    "transition cell {:?} has no vertex on edge {}",
                    cell, edge
                ))
            })
        };
        if self.config.style == MeshStyle::Polygons {
            for patch in TRANSITION.patches(configuration) {
                let mut face = patch.iter().map(|&e| vertex(e)).collect::<Result<Vec<_>>>()?;
                if flip {
                    face.reverse();
                }
                self.builder.add_face(&face);
            }
        } else {
            for &[a, b, c] in TRANSITION.triangles(configuration) {
                let (a, b, c) = (vertex(a)?, vertex(b)?, vertex(c)?);
                self.builder
                    .add_triangle(if flip { [a, c, b] } else { [a, b, c] });
            }
        }
        Ok(())
    }
}
