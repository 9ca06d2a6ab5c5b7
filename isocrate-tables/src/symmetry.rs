//! Symmetry operations on cell configurations

use crate::geometry::{Axis, CellShape};
use serde::{Deserialize, Serialize};
use std::iter::repeat;

/// A single generator of a cell's symmetry group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Elementary {
    /// Quarter turn about an axis
    Rotate(Axis),
    /// Reflection of the cell
    Mirror,
    /// Complement every sample bit; moves no corner
    Invert,
}

impl Elementary {
    /// Image of a corner
    pub fn corner<C: CellShape>(self, corner: usize) -> usize {
        match self {
            Elementary::Rotate(axis) => C::quarter_turn(corner, axis),
            Elementary::Mirror => C::mirror(corner),
            Elementary::Invert => corner,
        }
    }

    /// Image of an edge
    pub fn edge<C: CellShape>(self, edge: usize) -> Option<usize> {
        let [a, b] = C::edge_corners(edge);
        C::edge_between(self.corner::<C>(a), self.corner::<C>(b))
    }
}

/// Composite symmetry operation, as counts of elementary steps.
///
/// Applied forward the steps run mirror, X turns, Y turns, Z turns, invert.
/// The reverse runs the inverse turns Z, Y, X and then the mirror, undoing
/// the geometric part. Inversion moves no corner, so it only matters for the
/// configuration bits and the winding of patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OpSequence {
    /// Quarter turns about X, Y and Z, each `0..4`
    pub turns: [u8; 3],
    pub mirror: bool,
    pub invert: bool,
}

impl OpSequence {
    pub const IDENTITY: OpSequence = OpSequence {
        turns: [0; 3],
        mirror: false,
        invert: false,
    };

    pub fn new(turns: [u8; 3], mirror: bool, invert: bool) -> Self {
        Self {
            turns: [turns[0] % 4, turns[1] % 4, turns[2] % 4],
            mirror,
            invert,
        }
    }

    /// Pack into one byte: `rx | ry << 2 | rz << 4 | mirror << 6 | invert << 7`
    pub fn pack(self) -> u8 {
        (self.turns[0] & 3)
            | (self.turns[1] & 3) << 2
            | (self.turns[2] & 3) << 4
            | (self.mirror as u8) << 6
            | (self.invert as u8) << 7
    }

    pub fn unpack(bits: u8) -> Self {
        Self {
            turns: [bits & 3, (bits >> 2) & 3, (bits >> 4) & 3],
            mirror: bits & (1 << 6) != 0,
            invert: bits & (1 << 7) != 0,
        }
    }

    /// True when the operation reverses the orientation of surface loops
    pub fn flips_winding(self) -> bool {
        self.mirror != self.invert
    }

    /// Elementary steps in forward order
    pub fn steps(self) -> impl Iterator<Item = Elementary> {
        let mirror = self.mirror.then_some(Elementary::Mirror);
        let invert = self.invert.then_some(Elementary::Invert);
        mirror
            .into_iter()
            .chain(Axis::ALL.into_iter().flat_map(move |axis| {
                repeat(Elementary::Rotate(axis)).take(self.turns[axis.index()] as usize % 4)
            }))
            .chain(invert)
    }

    /// Elementary steps undoing [`OpSequence::steps`]
    pub fn reverse_steps(self) -> impl Iterator<Item = Elementary> {
        let mirror = self.mirror.then_some(Elementary::Mirror);
        let invert = self.invert.then_some(Elementary::Invert);
        Axis::ALL
            .into_iter()
            .rev()
            .flat_map(move |axis| {
                let undo = (4 - self.turns[axis.index()] % 4) % 4;
                repeat(Elementary::Rotate(axis)).take(undo as usize)
            })
            .chain(mirror)
            .chain(invert)
    }

    pub fn forward_corner<C: CellShape>(self, corner: usize) -> usize {
        self.steps().fold(corner, |c, step| step.corner::<C>(c))
    }

    pub fn reverse_corner<C: CellShape>(self, corner: usize) -> usize {
        self.reverse_steps().fold(corner, |c, step| step.corner::<C>(c))
    }

    /// Raw edge to canonical edge
    pub fn forward_edge<C: CellShape>(self, edge: usize) -> Option<usize> {
        let [a, b] = C::edge_corners(edge);
        C::edge_between(self.forward_corner::<C>(a), self.forward_corner::<C>(b))
    }

    /// Canonical edge to raw edge
    pub fn reverse_edge<C: CellShape>(self, edge: usize) -> Option<usize> {
        let [a, b] = C::edge_corners(edge);
        C::edge_between(self.reverse_corner::<C>(a), self.reverse_corner::<C>(b))
    }

    pub fn forward_face<C: CellShape>(self, face: usize) -> Option<usize> {
        let image: Vec<usize> = C::face_corners(face)
            .iter()
            .map(|&c| self.forward_corner::<C>(c))
            .collect();
        C::face_with_corners(&image)
    }

    pub fn reverse_face<C: CellShape>(self, face: usize) -> Option<usize> {
        let image: Vec<usize> = C::face_corners(face)
            .iter()
            .map(|&c| self.reverse_corner::<C>(c))
            .collect();
        C::face_with_corners(&image)
    }

    /// Transform a raw configuration; sample `s` moves to the image of corner `s`
    pub fn apply<C: CellShape>(self, configuration: u16) -> u16 {
        let mut image = 0u16;
        for sample in 0..C::SAMPLE_COUNT {
            if (configuration >> sample) & 1 == 1 {
                image |= 1 << self.forward_corner::<C>(sample);
            }
        }
        if self.invert {
            image ^= C::configuration_mask();
        }
        image
    }
}
