//! Core traits for isocrate

use crate::{field::Sphere, mesh::*, point::*};

/// Trait for objects with an axis-aligned extent
pub trait Bounded {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::from((min.coords + max.coords) * 0.5)
    }

    /// True when `p` lies inside the box, widened by `tolerance` on every side
    fn contains(&self, p: &Point3f, tolerance: f32) -> bool {
        let (min, max) = self.bounding_box();
        (0..3).all(|a| p[a] >= min[a] - tolerance && p[a] <= max[a] + tolerance)
    }
}

impl Bounded for Mesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let mut positions = self.positions.iter();
        let first = match positions.next() {
            Some(p) => *p,
            None => return (Point3f::origin(), Point3f::origin()),
        };
        positions.fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        })
    }
}

impl Bounded for Sphere {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let r = Vector3f::repeat(self.radius);
        (self.center - r, self.center + r)
    }
}
