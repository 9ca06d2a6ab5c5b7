//! Sampling lattices and block faces

use isocrate_core::{Error, Point3f, Result, Vector3f};
use isocrate_tables::Axis;

/// One of the six faces of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryFace {
    NegX,
    PosX,
    NegY,
    PosY,
    NegZ,
    PosZ,
}

impl BoundaryFace {
    pub const ALL: [BoundaryFace; 6] = [
        BoundaryFace::NegX,
        BoundaryFace::PosX,
        BoundaryFace::NegY,
        BoundaryFace::PosY,
        BoundaryFace::NegZ,
        BoundaryFace::PosZ,
    ];

    pub fn axis(self) -> Axis {
        match self {
            BoundaryFace::NegX | BoundaryFace::PosX => Axis::X,
            BoundaryFace::NegY | BoundaryFace::PosY => Axis::Y,
            BoundaryFace::NegZ | BoundaryFace::PosZ => Axis::Z,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(
            self,
            BoundaryFace::PosX | BoundaryFace::PosY | BoundaryFace::PosZ
        )
    }

    /// Tangent axes `(u, v)` of the face, in cyclic order after the normal axis
    pub fn tangents(self) -> (Axis, Axis) {
        self.axis().tangents()
    }

    /// Face on the other side of the shared plane
    pub fn opposite(self) -> BoundaryFace {
        match self {
            BoundaryFace::NegX => BoundaryFace::PosX,
            BoundaryFace::PosX => BoundaryFace::NegX,
            BoundaryFace::NegY => BoundaryFace::PosY,
            BoundaryFace::PosY => BoundaryFace::NegY,
            BoundaryFace::NegZ => BoundaryFace::PosZ,
            BoundaryFace::PosZ => BoundaryFace::NegZ,
        }
    }

    fn bit(self) -> u8 {
        1 << (self.axis().index() * 2 + self.is_positive() as usize)
    }
}

/// A set of block faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceSet(u8);

impl FaceSet {
    pub const EMPTY: FaceSet = FaceSet(0);

    pub fn with(self, face: BoundaryFace) -> Self {
        FaceSet(self.0 | face.bit())
    }

    pub fn contains(self, face: BoundaryFace) -> bool {
        self.0 & face.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = BoundaryFace> {
        BoundaryFace::ALL.into_iter().filter(move |&f| self.contains(f))
    }
}

impl FromIterator<BoundaryFace> for FaceSet {
    fn from_iter<I: IntoIterator<Item = BoundaryFace>>(iter: I) -> Self {
        iter.into_iter().fold(FaceSet::EMPTY, FaceSet::with)
    }
}

/// A block of samples on a regular lattice.
///
/// A block may be a window into a larger lattice: positions are always
/// computed from the global origin and the global sample index, and the
/// last global sample lands exactly on the far corner. Abutting blocks cut
/// from the same lattice therefore produce bit-identical positions on their
/// shared face.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    origin: Point3f,
    far: Point3f,
    cell_size: Vector3f,
    global_samples: [usize; 3],
    start: [usize; 3],
    samples: [usize; 3],
}

impl Lattice {
    /// Lattice with `samples` points per axis spaced `cell_size` apart
    pub fn new(origin: Point3f, cell_size: Vector3f, samples: [usize; 3]) -> Result<Self> {
        check_samples(samples)?;
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidBounds(format!("origin {:?} is not finite", origin)));
        }
        if !cell_size.iter().all(|&c| c.is_finite() && c > 0.0) {
            return Err(Error::InvalidBounds(format!(
                "cell size {:?} must be finite and positive",
                cell_size
            )));
        }
        let far = Point3f::new(
            origin.x + (samples[0] - 1) as f32 * cell_size.x,
            origin.y + (samples[1] - 1) as f32 * cell_size.y,
            origin.z + (samples[2] - 1) as f32 * cell_size.z,
        );
        Ok(Self {
            origin,
            far,
            cell_size,
            global_samples: samples,
            start: [0; 3],
            samples,
        })
    }

    /// Lattice spanning the box `[min, max]` with `resolution` samples per axis
    pub fn from_bounds(resolution: [usize; 3], min: Point3f, max: Point3f) -> Result<Self> {
        check_samples(resolution)?;
        for a in 0..3 {
            if !(min[a].is_finite() && max[a].is_finite() && min[a] < max[a]) {
                return Err(Error::InvalidBounds(format!(
                    "min {:?} must be strictly below max {:?}",
                    min, max
                )));
            }
        }
        let cell_size = Vector3f::new(
            (max.x - min.x) / (resolution[0] - 1) as f32,
            (max.y - min.y) / (resolution[1] - 1) as f32,
            (max.z - min.z) / (resolution[2] - 1) as f32,
        );
        Ok(Self {
            origin: min,
            far: max,
            cell_size,
            global_samples: resolution,
            start: [0; 3],
            samples: resolution,
        })
    }

    /// Samples per axis in this block
    pub fn samples(&self) -> [usize; 3] {
        self.samples
    }

    /// Cells per axis in this block
    pub fn cells(&self) -> [usize; 3] {
        [self.samples[0] - 1, self.samples[1] - 1, self.samples[2] - 1]
    }

    pub fn cell_size(&self) -> Vector3f {
        self.cell_size
    }

    /// Lowest corner of this block
    pub fn min(&self) -> Point3f {
        self.position([0, 0, 0])
    }

    /// Highest corner of this block
    pub fn max(&self) -> Point3f {
        self.position(self.cells())
    }

    /// Position of a block-local sample index
    pub fn position(&self, index: [usize; 3]) -> Point3f {
        let mut p = Point3f::origin();
        for a in 0..3 {
            let global = self.start[a] + index[a];
            p[a] = if global == self.global_samples[a] - 1 {
                self.far[a]
            } else {
                self.origin[a] + global as f32 * self.cell_size[a]
            };
        }
        p
    }

    /// Where the sample at `index` is placed in the output mesh.
    ///
    /// Samples on the listed faces move inward by `width` cells along the
    /// face normal, leaving room for transition cells. The field is still
    /// evaluated at [`Lattice::position`].
    pub fn sample_position(&self, index: [usize; 3], faces: FaceSet, width: f32) -> Point3f {
        let mut p = self.position(index);
        if faces.is_empty() || width == 0.0 {
            return p;
        }
        for face in faces.iter() {
            let a = face.axis().index();
            if face.is_positive() {
                if index[a] == self.samples[a] - 1 {
                    p[a] -= width * self.cell_size[a];
                }
            } else if index[a] == 0 {
                p[a] += width * self.cell_size[a];
            }
        }
        p
    }

    /// Check that transition layers on opposite faces leave every cell
    /// along that axis with positive depth
    pub fn check_transition_faces(&self, faces: FaceSet, width: f32) -> Result<()> {
        let cells = self.cells();
        for face in faces.iter().filter(|f| !f.is_positive()) {
            let a = face.axis().index();
            if faces.contains(face.opposite()) && cells[a] as f32 <= 2.0 * width {
                return Err(Error::InvalidConfig(format!(
                    "transition layers of width {} on {:?} and {:?} overlap across {} cell(s)",
                    width,
                    face,
                    face.opposite(),
                    cells[a]
                )));
            }
        }
        Ok(())
    }

    /// The same block at twice the resolution
    pub fn refined(&self) -> Lattice {
        let double = |n: usize| 2 * n - 1;
        Lattice {
            origin: self.origin,
            far: self.far,
            cell_size: self.cell_size * 0.5,
            global_samples: self.global_samples.map(double),
            start: self.start.map(|s| 2 * s),
            samples: self.samples.map(double),
        }
    }

    /// Window of this block starting at sample `start` with `samples` points per axis
    pub fn window(&self, start: [usize; 3], samples: [usize; 3]) -> Result<Lattice> {
        check_samples(samples)?;
        for a in 0..3 {
            if start[a] + samples[a] > self.samples[a] {
                return Err(Error::InvalidResolution(format!(
                    "window {:?}+{:?} exceeds block samples {:?}",
                    start, samples, self.samples
                )));
            }
        }
        Ok(Lattice {
            start: [
                self.start[0] + start[0],
                self.start[1] + start[1],
                self.start[2] + start[2],
            ],
            samples,
            ..self.clone()
        })
    }

    /// Split into `parts` blocks per axis sharing their boundary samples
    pub fn split(&self, parts: [usize; 3]) -> Result<Vec<Lattice>> {
        let cells = self.cells();
        for a in 0..3 {
            if parts[a] == 0 || parts[a] > cells[a] {
                return Err(Error::InvalidResolution(format!(
                    "cannot split {:?} cells into {:?} parts",
                    cells, parts
                )));
            }
        }
        let bounds = |a: usize, i: usize| cells[a] * i / parts[a];
        let mut blocks = Vec::with_capacity(parts.iter().product());
        for k in 0..parts[2] {
            for j in 0..parts[1] {
                for i in 0..parts[0] {
                    let lo = [bounds(0, i), bounds(1, j), bounds(2, k)];
                    let hi = [bounds(0, i + 1), bounds(1, j + 1), bounds(2, k + 1)];
                    blocks.push(self.window(
                        lo,
                        [hi[0] - lo[0] + 1, hi[1] - lo[1] + 1, hi[2] - lo[2] + 1],
                    )?);
                }
            }
        }
        Ok(blocks)
    }
}

fn check_samples(samples: [usize; 3]) -> Result<()> {
    if samples.iter().any(|&n| n < 2) {
        return Err(Error::InvalidResolution(format!(
            "resolution {:?} needs at least 2 samples per axis",
            samples
        )));
    }
    Ok(())
}
