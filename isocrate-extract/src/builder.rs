//! Mesh assembly shared by the sweep and the stitcher

use crate::config::{ExtractConfig, NormalMode};
use crate::sample::{edge_crossing, Sampler};
use isocrate_core::{Mesh, Point3f, Result, ScalarField, Vector3f};

/// Appends vertices with normals and keeps track of the ones whose normal
/// must come from the surrounding faces.
pub(crate) struct SurfaceBuilder<'a, F: ?Sized> {
    sampler: Sampler<'a, F>,
    mesh: Mesh,
    normals: NormalMode,
    step: Vector3f,
    deferred: Vec<usize>,
}

impl<'a, F: ScalarField + ?Sized> SurfaceBuilder<'a, F> {
    pub fn new(field: &'a F, config: &ExtractConfig, cell_size: Vector3f) -> Self {
        Self {
            sampler: Sampler::new(field, config.zero_samples),
            mesh: Mesh::new(),
            normals: config.normals,
            step: cell_size * config.gradient_step,
            deferred: Vec::new(),
        }
    }

    /// Sample the field at `p`
    pub fn sample(&mut self, p: &Point3f) -> Result<f32> {
        self.sampler.sample(p)
    }

    /// Add the vertex where the surface crosses the segment `a -> b`
    pub fn crossing_vertex(
        &mut self,
        a: &Point3f,
        b: &Point3f,
        value_a: f32,
        value_b: f32,
    ) -> usize {
        let position = edge_crossing(a, b, value_a, value_b);
        self.point_vertex(position)
    }

    /// Add a vertex at `position`
    pub fn point_vertex(&mut self, position: Point3f) -> usize {
        let normal = match self.normals {
            NormalMode::Gradient => self.sampler.gradient(&position, &self.step),
            NormalMode::FaceAverage => None,
        };
        let index = self.mesh.add_vertex(position, normal.unwrap_or_else(Vector3f::zeros));
        if normal.is_none() {
            self.deferred.push(index);
        }
        index
    }

    pub fn add_face(&mut self, face: &[usize]) {
        self.mesh.add_face(face);
    }

    pub fn add_triangle(&mut self, triangle: [usize; 3]) {
        self.mesh.add_triangle(triangle);
    }

    /// Resolve deferred normals and hand the mesh over
    pub fn finish(mut self) -> Mesh {
        if !self.deferred.is_empty() {
            let averaged = self.mesh.calculate_vertex_normals();
            for &i in &self.deferred {
                self.mesh.normals[i] = averaged[i];
            }
            log::debug!(
                "{} vertices took face-averaged normals",
                self.deferred.len()
            );
        }
        if self.sampler.nudged() > 0 {
            log::warn!(
                "{} zero-valued samples were nudged above the surface",
                self.sampler.nudged()
            );
        }
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use isocrate_core::HalfSpace;

    #[test]
    fn test_gradient_normals() {
        let plane = HalfSpace::new(Vector3f::new(0.0, 0.0, 1.0), 0.0);
        let config = ExtractConfig::default();
        let mut builder = SurfaceBuilder::new(&plane, &config, Vector3f::new(1.0, 1.0, 1.0));
        let a = Point3f::new(0.0, 0.0, -1.0);
        let b = Point3f::new(0.0, 0.0, 1.0);
        let v = builder.crossing_vertex(&a, &b, -1.0, 1.0);
        let mesh = builder.finish();
        assert_eq!(mesh.positions[v], Point3f::origin());
        assert_relative_eq!(mesh.normals[v], Vector3f::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_face_average_normals() {
        let flat = |_x: f32, _y: f32, _z: f32| -> f32 { 1.0 };
        let config = ExtractConfig::default().with_normals(NormalMode::FaceAverage);
        let mut builder = SurfaceBuilder::new(&flat, &config, Vector3f::new(1.0, 1.0, 1.0));
        let a = builder.point_vertex(Point3f::new(0.0, 0.0, 0.0));
        let b = builder.point_vertex(Point3f::new(1.0, 0.0, 0.0));
        let c = builder.point_vertex(Point3f::new(0.0, 1.0, 0.0));
        builder.add_triangle([a, b, c]);
        let mesh = builder.finish();
        assert_eq!(mesh.vertex_count(), 3);
        for n in &mesh.normals {
            assert_relative_eq!(*n, Vector3f::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        }
    }
}
