//! Scalar fields sampled by the extractors

use crate::point::*;

/// A signed scalar function of space.
///
/// The isosurface is the zero set; negative values are inside (below the
/// surface). Implementations must be read-only and reentrant: extractors
/// may evaluate the same point more than once and callers may share one
/// field across threads extracting different blocks.
pub trait ScalarField {
    /// Evaluate the field at `(x, y, z)`
    fn value(&self, x: f32, y: f32, z: f32) -> f32;

    /// Evaluate the field at a point
    fn value_at(&self, p: &Point3f) -> f32 {
        self.value(p.x, p.y, p.z)
    }
}

impl<F> ScalarField for F
where
    F: Fn(f32, f32, f32) -> f32,
{
    fn value(&self, x: f32, y: f32, z: f32) -> f32 {
        self(x, y, z)
    }
}

/// Signed distance to a sphere surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3f, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl ScalarField for Sphere {
    fn value(&self, x: f32, y: f32, z: f32) -> f32 {
        (Point3f::new(x, y, z) - self.center).norm() - self.radius
    }
}

/// Half-space `normal · p - offset`; inside where negative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    pub normal: Vector3f,
    pub offset: f32,
}

impl HalfSpace {
    /// Create a half-space; the normal is normalized so values are distances
    pub fn new(normal: Vector3f, offset: f32) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }
}

impl ScalarField for HalfSpace {
    fn value(&self, x: f32, y: f32, z: f32) -> f32 {
        self.normal.dot(&Vector3f::new(x, y, z)) - self.offset
    }
}
