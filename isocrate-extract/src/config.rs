//! Extraction settings

use crate::lattice::{BoundaryFace, FaceSet};
use isocrate_core::{Error, Result};

/// Shape of the faces written to the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshStyle {
    /// One vertex per crossing edge, patches fan-triangulated
    #[default]
    Triangles,
    /// One vertex per crossing edge, one polygon per patch
    Polygons,
    /// One vertex per patch, one quad per crossing lattice edge
    Dual,
}

/// How vertex normals are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// Central-difference gradient of the field
    #[default]
    Gradient,
    /// Area-weighted average of the incident face normals
    FaceAverage,
}

/// What to do with samples that are exactly zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroSamplePolicy {
    /// Treat the sample as `f32::MIN_POSITIVE` (just above the surface)
    #[default]
    Nudge,
    /// Fail with [`Error::DegenerateCell`]
    Reject,
}

/// Configuration shared by the sweep and the stitcher
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    pub style: MeshStyle,
    pub normals: NormalMode,
    /// Central-difference step, as a fraction of the cell size
    pub gradient_step: f32,
    pub zero_samples: ZeroSamplePolicy,
    /// Block faces that border a finer neighbour
    pub transition_faces: FaceSet,
    /// Depth of the transition layer, as a fraction of a coarse cell
    pub transition_width: f32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            style: MeshStyle::Triangles,
            normals: NormalMode::Gradient,
            gradient_step: 0.25,
            zero_samples: ZeroSamplePolicy::Nudge,
            transition_faces: FaceSet::EMPTY,
            transition_width: 0.5,
        }
    }
}

impl ExtractConfig {
    pub fn with_style(mut self, style: MeshStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_normals(mut self, normals: NormalMode) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_gradient_step(mut self, step: f32) -> Self {
        self.gradient_step = step;
        self
    }

    pub fn with_zero_samples(mut self, policy: ZeroSamplePolicy) -> Self {
        self.zero_samples = policy;
        self
    }

    /// Mark one more face as bordering a finer block
    pub fn with_transition_face(mut self, face: BoundaryFace) -> Self {
        self.transition_faces = self.transition_faces.with(face);
        self
    }

    pub fn with_transition_faces(mut self, faces: FaceSet) -> Self {
        self.transition_faces = faces;
        self
    }

    pub fn with_transition_width(mut self, width: f32) -> Self {
        self.transition_width = width;
        self
    }

    /// Check the numeric settings
    pub fn validate(&self) -> Result<()> {
        if !(self.gradient_step.is_finite() && self.gradient_step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "gradient step {} must be finite and positive",
                self.gradient_step
            )));
        }
        if !(self.transition_width.is_finite()
            && (0.0..1.0).contains(&self.transition_width))
        {
            return Err(Error::InvalidConfig(format!(
                "transition width {} must lie in [0, 1)",
                self.transition_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert_eq!(config.style, MeshStyle::Triangles);
        assert_eq!(config.normals, NormalMode::Gradient);
        assert_eq!(config.zero_samples, ZeroSamplePolicy::Nudge);
        assert!(config.transition_faces.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = ExtractConfig::default()
            .with_style(MeshStyle::Dual)
            .with_normals(NormalMode::FaceAverage)
            .with_gradient_step(0.1)
            .with_zero_samples(ZeroSamplePolicy::Reject)
            .with_transition_face(BoundaryFace::NegX)
            .with_transition_width(0.0);
        assert_eq!(config.style, MeshStyle::Dual);
        assert_eq!(config.gradient_step, 0.1);
        assert!(config.transition_faces.contains(BoundaryFace::NegX));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let bad_step = ExtractConfig::default().with_gradient_step(0.0);
        assert!(matches!(bad_step.validate(), Err(Error::InvalidConfig(_))));
        let bad_width = ExtractConfig::default().with_transition_width(1.0);
        assert!(bad_width.validate().is_err());
        let nan_width = ExtractConfig::default().with_transition_width(f32::NAN);
        assert!(nan_width.validate().is_err());
    }
}
