//! Cell geometry
//!
//! Static combinatorial facts about the two cell shapes swept by the
//! extractors: where the corners sit, which corners bound each edge, which
//! faces meet at an edge, and how the elementary symmetry operations move
//! corners around. Everything here is a pure function of small indices.
//!
//! Positions use integer coordinates. The regular cube spans `0..=1` on every
//! axis. The transition cell spans `0..=2` on its two tangent axes `u` and `v`
//! (three samples per side on the high-resolution face) and `0..=2` on `w`,
//! with the high-resolution face at `w = 0` and the low-resolution face at
//! `w = 2`.

use serde::{Deserialize, Serialize};

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Axis {
        match index % 3 {
            0 => Axis::X,
            1 => Axis::Y,
            _ => Axis::Z,
        }
    }

    /// The two other axes in cyclic order: `(a + 1, a + 2) mod 3`.
    ///
    /// `u × v = a`, so a frame built from these is right-handed.
    pub fn tangents(self) -> (Axis, Axis) {
        let a = self.index();
        (Axis::from_index(a + 1), Axis::from_index(a + 2))
    }

    /// The two other axes in increasing order
    fn others(self) -> (usize, usize) {
        match self {
            Axis::X => (1, 2),
            Axis::Y => (0, 2),
            Axis::Z => (0, 1),
        }
    }
}

/// Which cell shape a table describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// 8-sample cube
    Regular,
    /// 9-sample cell stitching a coarse face to a refined one
    Transition,
}

/// Combinatorial description of a cell shape.
///
/// Samples are the corners `0..SAMPLE_COUNT`; extra corners (the
/// transition cell's low-resolution face) alias a sample's value through
/// [`CellShape::corner_sample`].
pub trait CellShape {
    const KIND: CellKind;
    /// Number of field samples, one configuration bit each
    const SAMPLE_COUNT: usize;
    const CORNER_COUNT: usize;
    const EDGE_COUNT: usize;
    const FACE_COUNT: usize;
    /// Corner spacing between the two sides of the cell along a tangent axis
    const EXTENT: i8;
    /// Axes the symmetry group may rotate about
    const ROTATION_AXES: &'static [Axis];

    fn corner_position(corner: usize) -> [i8; 3];

    /// Sample whose value a corner carries
    fn corner_sample(corner: usize) -> usize;

    /// Bounding corners of an edge, ordered low to high
    fn edge_corners(edge: usize) -> [usize; 2];

    /// Corners around a face, in cyclic order
    fn face_corners(face: usize) -> &'static [usize];

    /// Outward normal of a face
    fn face_normal(face: usize) -> [i8; 3];

    /// Image of a corner under a quarter turn about `axis`.
    ///
    /// Axes outside [`CellShape::ROTATION_AXES`] leave every corner in place.
    fn quarter_turn(corner: usize, axis: Axis) -> usize;

    /// Image of a corner under the shape's mirror
    fn mirror(corner: usize) -> usize;

    fn configuration_count() -> usize {
        1 << Self::SAMPLE_COUNT
    }

    /// Bit mask covering every sample
    fn configuration_mask() -> u16 {
        ((1u32 << Self::SAMPLE_COUNT) - 1) as u16
    }

    /// Samples bounding an edge
    fn edge_samples(edge: usize) -> [usize; 2] {
        let [a, b] = Self::edge_corners(edge);
        [Self::corner_sample(a), Self::corner_sample(b)]
    }

    fn corner_at(position: [i8; 3]) -> Option<usize> {
        (0..Self::CORNER_COUNT).find(|&c| Self::corner_position(c) == position)
    }

    /// Edge joining two corners, in either order
    fn edge_between(a: usize, b: usize) -> Option<usize> {
        (0..Self::EDGE_COUNT).find(|&e| {
            let [p, q] = Self::edge_corners(e);
            (p == a && q == b) || (p == b && q == a)
        })
    }

    /// Face whose corner set equals `corners`
    fn face_with_corners(corners: &[usize]) -> Option<usize> {
        (0..Self::FACE_COUNT).find(|&f| {
            let face = Self::face_corners(f);
            face.len() == corners.len() && corners.iter().all(|c| face.contains(c))
        })
    }

    /// True when `a` and `b` are consecutive around `face`
    fn face_has_edge(face: usize, a: usize, b: usize) -> bool {
        let corners = Self::face_corners(face);
        (0..corners.len()).any(|i| {
            let p = corners[i];
            let q = corners[(i + 1) % corners.len()];
            (p == a && q == b) || (p == b && q == a)
        })
    }

    /// The two faces meeting at an edge, lower index first
    fn edge_faces(edge: usize) -> [usize; 2] {
        let [a, b] = Self::edge_corners(edge);
        let mut faces = [usize::MAX; 2];
        let mut found = 0;
        for face in 0..Self::FACE_COUNT {
            if Self::face_has_edge(face, a, b) {
                if found < 2 {
                    faces[found] = face;
                }
                found += 1;
            }
        }
        debug_assert_eq!(found, 2, "edge {} must border exactly two faces", edge);
        faces
    }

    fn corner_below(configuration: u16, corner: usize) -> bool {
        (configuration >> Self::corner_sample(corner)) & 1 == 1
    }

    /// True when the surface crosses the edge
    fn edge_crosses(configuration: u16, edge: usize) -> bool {
        let [a, b] = Self::edge_corners(edge);
        Self::corner_below(configuration, a) != Self::corner_below(configuration, b)
    }

    /// True when the signs alternate all the way around the face
    fn face_is_ambiguous(configuration: u16, face: usize) -> bool {
        let corners = Self::face_corners(face);
        let changes = (0..corners.len())
            .filter(|&i| {
                Self::corner_below(configuration, corners[i])
                    != Self::corner_below(configuration, corners[(i + 1) % corners.len()])
            })
            .count();
        changes == 4
    }

    fn has_ambiguous_face(configuration: u16) -> bool {
        (0..Self::FACE_COUNT).any(|f| Self::face_is_ambiguous(configuration, f))
    }

    /// The same edge as seen from the neighbouring cell on the negative side
    /// of `axis`, if the edge lies on this cell's `axis = 0` side.
    fn neighbor_edge(edge: usize, axis: Axis) -> Option<usize> {
        let [a, b] = Self::edge_corners(edge);
        let mut pa = Self::corner_position(a);
        let mut pb = Self::corner_position(b);
        let i = axis.index();
        if pa[i] != 0 || pb[i] != 0 {
            return None;
        }
        pa[i] = Self::EXTENT;
        pb[i] = Self::EXTENT;
        Self::edge_between(Self::corner_at(pa)?, Self::corner_at(pb)?)
    }

    /// Face through which the outward-wound surface loop leaves `edge`.
    ///
    /// Depends only on which end of the edge is below the surface: loops
    /// run counter-clockwise around the direction from the below corner to
    /// the above corner. `None` when the edge does not cross.
    fn exit_face(configuration: u16, edge: usize) -> Option<usize> {
        let [a, b] = Self::edge_corners(edge);
        let a_below = Self::corner_below(configuration, a);
        if a_below == Self::corner_below(configuration, b) {
            return None;
        }
        let pa = widen(Self::corner_position(a));
        let pb = widen(Self::corner_position(b));
        let upward = if a_below { sub(pb, pa) } else { sub(pa, pb) };
        let doubled_midpoint = add(pa, pb);

        Self::edge_faces(edge).into_iter().find(|&face| {
            let corners = Self::face_corners(face);
            // direction from the edge midpoint into the face, scaled by 2 * len
            let mut inward = [0i32; 3];
            for &c in corners {
                inward = add(inward, scale(widen(Self::corner_position(c)), 2));
            }
            let inward = sub(inward, scale(doubled_midpoint, corners.len() as i32));
            dot(cross(upward, inward), widen(Self::face_normal(face))) < 0
        })
    }
}

fn widen(p: [i8; 3]) -> [i32; 3] {
    [p[0] as i32, p[1] as i32, p[2] as i32]
}

fn add(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: [i32; 3], s: i32) -> [i32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [i32; 3], b: [i32; 3]) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

// ============================================================
// Regular cell
// ============================================================

/// The 8-sample cube.
///
/// Corner `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`. Edge
/// `axis * 4 + k` runs along `axis`, `k` packing the corner coordinates on the
/// other two axes (increasing axis order). Face `axis * 2 + side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegularCell;

const REGULAR_FACES: [[usize; 4]; 6] = [
    [0, 2, 6, 4],
    [1, 3, 7, 5],
    [0, 4, 5, 1],
    [2, 6, 7, 3],
    [0, 1, 3, 2],
    [4, 5, 7, 6],
];

impl RegularCell {
    /// Edge leaving corner `low` in the positive `axis` direction
    pub fn edge_from(low: usize, axis: Axis) -> usize {
        let (first, second) = axis.others();
        axis.index() * 4 + ((low >> first) & 1) + 2 * ((low >> second) & 1)
    }

    /// Face on the given side (0 = low, 1 = high) of `axis`
    pub fn face(axis: Axis, side: usize) -> usize {
        axis.index() * 2 + side
    }

    fn corner_from_position(p: [i8; 3]) -> usize {
        (p[0] + 2 * p[1] + 4 * p[2]) as usize
    }
}

impl CellShape for RegularCell {
    const KIND: CellKind = CellKind::Regular;
    const SAMPLE_COUNT: usize = 8;
    const CORNER_COUNT: usize = 8;
    const EDGE_COUNT: usize = 12;
    const FACE_COUNT: usize = 6;
    const EXTENT: i8 = 1;
    const ROTATION_AXES: &'static [Axis] = &[Axis::X, Axis::Y, Axis::Z];

    fn corner_position(corner: usize) -> [i8; 3] {
        [
            (corner & 1) as i8,
            ((corner >> 1) & 1) as i8,
            ((corner >> 2) & 1) as i8,
        ]
    }

    fn corner_sample(corner: usize) -> usize {
        corner
    }

    fn edge_corners(edge: usize) -> [usize; 2] {
        let axis = Axis::from_index(edge / 4);
        let k = edge % 4;
        let (first, second) = axis.others();
        let low = ((k & 1) << first) | (((k >> 1) & 1) << second);
        [low, low | (1 << axis.index())]
    }

    fn face_corners(face: usize) -> &'static [usize] {
        &REGULAR_FACES[face]
    }

    fn face_normal(face: usize) -> [i8; 3] {
        let mut normal = [0; 3];
        normal[face / 2] = if face % 2 == 0 { -1 } else { 1 };
        normal
    }

    fn quarter_turn(corner: usize, axis: Axis) -> usize {
        let [x, y, z] = Self::corner_position(corner);
        let turned = match axis {
            Axis::X => [x, 1 - z, y],
            Axis::Y => [z, y, 1 - x],
            Axis::Z => [1 - y, x, z],
        };
        Self::corner_from_position(turned)
    }

    fn mirror(corner: usize) -> usize {
        let [x, y, z] = Self::corner_position(corner);
        Self::corner_from_position([1 - x, y, z])
    }
}

// ============================================================
// Transition cell
// ============================================================

/// The 9-sample transition cell.
///
/// High-resolution samples `u + 3v` sit at `(u, v, 0)`. Low-resolution
/// corners `9 + U + 2V` sit at `(2U, 2V, 2)` and carry the values of samples
/// 0, 2, 6 and 8. Edges 0..=5 run along `u` on the high-resolution face
/// (`2v + u`), 6..=11 along `v` (`6 + 2u + v`), 12..=13 along `u` and
/// 14..=15 along `v` on the low-resolution face. The connectors between a
/// low corner and its aliased sample never cross and carry no index.
///
/// Faces 0..=3 are the high-resolution sub-quads (`su + 2sv`), 4..=7 the side
/// faces (`-v`, `+u`, `+v`, `-u`), 8 the low-resolution face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionCell;

const TRANSITION_EDGES: [[usize; 2]; 16] = [
    [0, 1],
    [1, 2],
    [3, 4],
    [4, 5],
    [6, 7],
    [7, 8],
    [0, 3],
    [3, 6],
    [1, 4],
    [4, 7],
    [2, 5],
    [5, 8],
    [9, 10],
    [11, 12],
    [9, 11],
    [10, 12],
];

const TRANSITION_FACES: [&[usize]; 9] = [
    &[0, 3, 4, 1],
    &[1, 4, 5, 2],
    &[3, 6, 7, 4],
    &[4, 7, 8, 5],
    &[0, 1, 2, 10, 9],
    &[2, 5, 8, 12, 10],
    &[8, 7, 6, 11, 12],
    &[6, 3, 0, 9, 11],
    &[9, 10, 12, 11],
];

const TRANSITION_NORMALS: [[i8; 3]; 9] = [
    [0, 0, -1],
    [0, 0, -1],
    [0, 0, -1],
    [0, 0, -1],
    [0, -1, 0],
    [1, 0, 0],
    [0, 1, 0],
    [-1, 0, 0],
    [0, 0, 1],
];

const LOW_CORNER_SAMPLES: [usize; 4] = [0, 2, 6, 8];

impl TransitionCell {
    /// Number of high-resolution samples per side
    pub const SIDE_SAMPLES: usize = 3;
    /// First corner index on the low-resolution face
    pub const FIRST_LOW_CORNER: usize = 9;
    /// First edge index on the low-resolution face
    pub const FIRST_LOW_EDGE: usize = 12;

    /// True for edges on the low-resolution face
    pub fn is_low_resolution_edge(edge: usize) -> bool {
        edge >= Self::FIRST_LOW_EDGE
    }

    fn high(u: i8, v: i8) -> usize {
        (u + 3 * v) as usize
    }

    fn low(u: i8, v: i8) -> usize {
        Self::FIRST_LOW_CORNER + (u + 2 * v) as usize
    }
}

impl CellShape for TransitionCell {
    const KIND: CellKind = CellKind::Transition;
    const SAMPLE_COUNT: usize = 9;
    const CORNER_COUNT: usize = 13;
    const EDGE_COUNT: usize = 16;
    const FACE_COUNT: usize = 9;
    const EXTENT: i8 = 2;
    const ROTATION_AXES: &'static [Axis] = &[Axis::Z];

    fn corner_position(corner: usize) -> [i8; 3] {
        if corner < Self::FIRST_LOW_CORNER {
            [(corner % 3) as i8, (corner / 3) as i8, 0]
        } else {
            let l = corner - Self::FIRST_LOW_CORNER;
            [2 * (l % 2) as i8, 2 * (l / 2) as i8, 2]
        }
    }

    fn corner_sample(corner: usize) -> usize {
        if corner < Self::FIRST_LOW_CORNER {
            corner
        } else {
            LOW_CORNER_SAMPLES[corner - Self::FIRST_LOW_CORNER]
        }
    }

    fn edge_corners(edge: usize) -> [usize; 2] {
        TRANSITION_EDGES[edge]
    }

    fn face_corners(face: usize) -> &'static [usize] {
        TRANSITION_FACES[face]
    }

    fn face_normal(face: usize) -> [i8; 3] {
        TRANSITION_NORMALS[face]
    }

    fn quarter_turn(corner: usize, axis: Axis) -> usize {
        if axis != Axis::Z {
            return corner;
        }
        let [u, v, _] = Self::corner_position(corner);
        if corner < Self::FIRST_LOW_CORNER {
            Self::high(2 - v, u)
        } else {
            Self::low(1 - v / 2, u / 2)
        }
    }

    fn mirror(corner: usize) -> usize {
        let [u, v, _] = Self::corner_position(corner);
        if corner < Self::FIRST_LOW_CORNER {
            Self::high(2 - u, v)
        } else {
            Self::low(1 - u / 2, v / 2)
        }
    }
}
