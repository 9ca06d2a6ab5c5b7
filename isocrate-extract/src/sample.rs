//! Field evaluation and edge interpolation shared by both extractors

use crate::config::ZeroSamplePolicy;
use isocrate_core::{Error, Point3f, Result, ScalarField, Vector3f};

/// True when a sample lies below the surface (inside)
#[inline]
pub fn is_below(value: f32) -> bool {
    value < 0.0
}

/// Point where the field crosses zero on the segment `a -> b`.
///
/// Both extractors call this with the edge's low corner first, so a crossing
/// shared by two cells interpolates to the same bits on both sides.
#[inline]
pub fn edge_crossing(a: &Point3f, b: &Point3f, value_a: f32, value_b: f32) -> Point3f {
    let t = value_a.abs() / (value_a.abs() + value_b.abs());
    Point3f::new(
        a.x + t * (b.x - a.x),
        a.y + t * (b.y - a.y),
        a.z + t * (b.z - a.z),
    )
}

/// Evaluates a field, enforcing the sample contract
pub(crate) struct Sampler<'a, F: ?Sized> {
    field: &'a F,
    policy: ZeroSamplePolicy,
    nudged: usize,
}

impl<'a, F: ScalarField + ?Sized> Sampler<'a, F> {
    pub fn new(field: &'a F, policy: ZeroSamplePolicy) -> Self {
        Self {
            field,
            policy,
            nudged: 0,
        }
    }

    /// Sample the field for classification and interpolation
    pub fn sample(&mut self, p: &Point3f) -> Result<f32> {
        let value = self.field.value_at(p);
        if !value.is_finite() {
            return Err(Error::NonFiniteSample {
                x: p.x,
                y: p.y,
                z: p.z,
                value,
            });
        }
        if value == 0.0 {
            return match self.policy {
                ZeroSamplePolicy::Nudge => {
                    self.nudged += 1;
                    Ok(f32::MIN_POSITIVE)
                }
                ZeroSamplePolicy::Reject => Err(Error::DegenerateCell(format!(
                    "field is exactly zero at ({}, {}, {})",
                    p.x, p.y, p.z
                ))),
            };
        }
        Ok(value)
    }

    /// Unit gradient by central differences, `None` where it vanishes
    pub fn gradient(&self, p: &Point3f, step: &Vector3f) -> Option<Vector3f> {
        let mut gradient = Vector3f::zeros();
        for a in 0..3 {
            let mut forward = *p;
            let mut backward = *p;
            forward[a] += step[a];
            backward[a] -= step[a];
            gradient[a] =
                (self.field.value_at(&forward) - self.field.value_at(&backward)) / (2.0 * step[a]);
        }
        let length = gradient.norm();
        if length.is_finite() && length > f32::EPSILON {
            Some(gradient / length)
        } else {
            None
        }
    }

    /// Number of zero samples replaced so far
    pub fn nudged(&self) -> usize {
        self.nudged
    }
}
