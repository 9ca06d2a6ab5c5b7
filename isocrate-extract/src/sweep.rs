//! Lattice sweep over regular cells
//!
//! Cells are visited x-fastest, then y, then z. Field samples for two
//! z-slices and the edge vertices of two slices of cells are kept in ring
//! buffers, so every crossing shared with an earlier cell is found there
//! instead of being interpolated again.

use crate::builder::SurfaceBuilder;
use crate::cache::{EdgeVertices, SliceRing};
use crate::config::{ExtractConfig, MeshStyle};
use crate::lattice::Lattice;
use crate::sample::{edge_crossing, is_below};
use crate::tables::REGULAR;
use isocrate_core::{Error, Mesh, Point3f, Result, ScalarField, Vector3f};
use isocrate_tables::{Axis, CellShape, RegularCell};

/// Extracts the zero set of a field over one block of regular cells
#[derive(Debug, Clone, Default)]
pub struct LatticeSweepExtractor {
    config: ExtractConfig,
}

impl LatticeSweepExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Sweep every cell of `lattice` and return the surface
    pub fn extract<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Result<Mesh> {
        self.config.validate()?;
        lattice.check_transition_faces(
            self.config.transition_faces,
            self.config.transition_width,
        )?;

        let mut sweep = Sweep::new(field, lattice, &self.config);
        sweep.run()?;
        let mesh = sweep.builder.finish();

        log::debug!(
            "swept {:?} cells ({:?}): {} vertices, {} faces",
            lattice.cells(),
            self.config.style,
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Extract the surface over the box `[min, max]` sampled at `resolution`
/// points per axis, with the default configuration
pub fn extract<F: ScalarField + ?Sized>(
    field: &F,
    resolution: [usize; 3],
    min: Point3f,
    max: Point3f,
) -> Result<Mesh> {
    let lattice = Lattice::from_bounds(resolution, min, max)?;
    LatticeSweepExtractor::default().extract(field, &lattice)
}

/// Patch vertices of one cell in the dual style
#[derive(Debug, Clone, Copy, Default)]
struct DualCell {
    configuration: u8,
    vertices: [Option<usize>; 4],
}

struct Sweep<'a, F: ?Sized> {
    lattice: &'a Lattice,
    config: &'a ExtractConfig,
    builder: SurfaceBuilder<'a, F>,
    samples: SliceRing<f32>,
    edges: SliceRing<EdgeVertices<12>>,
    duals: SliceRing<DualCell>,
}

fn corner_index(cell: [usize; 3], corner: usize) -> [usize; 3] {
    let [dx, dy, dz] = RegularCell::corner_position(corner);
    [
        cell[0] + dx as usize,
        cell[1] + dy as usize,
        cell[2] + dz as usize,
    ]
}

fn missing_vertex(cell: [usize; 3], edge: usize) -> Error {
    Error::Authoring(format!("cell {:?} has no vertex on edge {}", cell, edge))
}

impl<'a, F: ScalarField + ?Sized> Sweep<'a, F> {
    fn new(field: &'a F, lattice: &'a Lattice, config: &'a ExtractConfig) -> Self {
        let [nx, ny, _] = lattice.samples();
        let [cx, cy, _] = lattice.cells();
        let (dual_x, dual_y) = match config.style {
            MeshStyle::Dual => (cx, cy),
            _ => (0, 0),
        };
        Self {
            lattice,
            config,
            builder: SurfaceBuilder::new(field, config, lattice.cell_size()),
            samples: SliceRing::new(nx, ny),
            edges: SliceRing::new(cx, cy),
            duals: SliceRing::new(dual_x, dual_y),
        }
    }

    fn run(&mut self) -> Result<()> {
        let [cx, cy, cz] = self.lattice.cells();
        self.sample_slice(0)?;
        for z in 0..cz {
            self.sample_slice(z + 1)?;
            self.edges.clear_slice(z);
            if self.config.style == MeshStyle::Dual {
                self.duals.clear_slice(z);
            }
            for y in 0..cy {
                for x in 0..cx {
                    self.cell([x, y, z])?;
                }
            }
        }
        Ok(())
    }

    fn sample_slice(&mut self, z: usize) -> Result<()> {
        let [nx, ny, _] = self.lattice.samples();
        for y in 0..ny {
            for x in 0..nx {
                let value = self.builder.sample(&self.lattice.position([x, y, z]))?;
                *self.samples.get_mut([x, y, z]) = value;
            }
        }
        Ok(())
    }

    fn cell(&mut self, cell: [usize; 3]) -> Result<()> {
        let mut values = [0.0f32; 8];
        let mut configuration = 0usize;
        for (corner, value) in values.iter_mut().enumerate() {
            *value = *self.samples.get(corner_index(cell, corner));
            if is_below(*value) {
                configuration |= 1 << corner;
            }
        }
        if REGULAR.patch_count(configuration) == 0 {
            return Ok(());
        }
        match self.config.style {
            MeshStyle::Triangles | MeshStyle::Polygons => {
                self.polygonize(cell, configuration, &values)
            }
            MeshStyle::Dual => self.dual(cell, configuration, &values),
        }
    }

    /// Output position of a cell corner
    fn corner_position(&self, cell: [usize; 3], corner: usize) -> Point3f {
        self.lattice.sample_position(
            corner_index(cell, corner),
            self.config.transition_faces,
            self.config.transition_width,
        )
    }

    fn crossing(&self, cell: [usize; 3], edge: usize, values: &[f32; 8]) -> Point3f {
        let [a, b] = RegularCell::edge_corners(edge);
        edge_crossing(
            &self.corner_position(cell, a),
            &self.corner_position(cell, b),
            values[a],
            values[b],
        )
    }

    fn polygonize(
        &mut self,
        cell: [usize; 3],
        configuration: usize,
        values: &[f32; 8],
    ) -> Result<()> {
        let mut resolved: EdgeVertices<12> = [None; 12];
        for patch in REGULAR.patches(configuration) {
            for &edge in patch {
                let edge = edge as usize;
                let vertex = match self.edges.shared_vertex::<RegularCell>(cell, edge) {
                    Some(vertex) => vertex,
                    None => {
                        let p = self.crossing(cell, edge, values);
                        self.builder.point_vertex(p)
                    }
                };
                resolved[edge] = Some(vertex);
            }
        }
        *self.edges.get_mut(cell) = resolved;

        let vertex = |edge: u8| {
            resolved[edge as usize].ok_or_else(|| missing_vertex(cell, edge as usize))
        };
        if self.config.style == MeshStyle::Polygons {
            for patch in REGULAR.patches(configuration) {
                let face = patch.iter().map(|&e| vertex(e)).collect::<Result<Vec<_>>>()?;
                self.builder.add_face(&face);
            }
        } else {
            for &[a, b, c] in REGULAR.triangles(configuration) {
                self.builder.add_triangle([vertex(a)?, vertex(b)?, vertex(c)?]);
            }
        }
        Ok(())
    }

    fn dual(&mut self, cell: [usize; 3], configuration: usize, values: &[f32; 8]) -> Result<()> {
        let mut slot = DualCell {
            configuration: configuration as u8,
            vertices: [None; 4],
        };
        for (index, patch) in REGULAR.patches(configuration).enumerate() {
            let mut sum = Vector3f::zeros();
            for &edge in patch {
                sum += self.crossing(cell, edge as usize, values).coords;
            }
            let centroid = Point3f::from(sum / patch.len() as f32);
            slot.vertices[index] = Some(self.builder.point_vertex(centroid));
        }
        *self.duals.get_mut(cell) = slot;

        // one quad per crossing lattice edge leaving this cell's lowest corner,
        // once the three other cells around it have been visited
        for axis in Axis::ALL {
            let (u, v) = axis.tangents();
            let (u, v) = (u.index(), v.index());
            if cell[u] == 0 || cell[v] == 0 {
                continue;
            }
            let exit = match REGULAR.exit_face(configuration, axis.index() * 4) {
                Some(face) => face,
                None => continue,
            };

            let mut quad = [0usize; 4];
            for (slot, (du, dv)) in quad.iter_mut().zip([(1, 1), (0, 1), (0, 0), (1, 0)]) {
                let mut neighbor = cell;
                neighbor[u] -= du;
                neighbor[v] -= dv;
                let edge = RegularCell::edge_from((du << u) | (dv << v), axis);
                let dual = self.duals.get(neighbor);
                *slot = REGULAR
                    .vertex_index(dual.configuration as usize, edge)
                    .and_then(|patch| dual.vertices[patch])
                    .ok_or_else(|| missing_vertex(neighbor, edge))?;
            }
            if exit != RegularCell::face(Axis::from_index(v), 0) {
                quad.reverse();
            }
            self.builder.add_face(&quad);
        }
        Ok(())
    }
}
