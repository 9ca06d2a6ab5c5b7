//! Two-slice ring buffers carried through a sweep
//!
//! A sweep visits cells x-fastest, then y, then z. Everything a cell needs
//! from already-visited neighbours lives in the current or the previous
//! z-slice, so two slices indexed by `z & 1` are enough.

use isocrate_tables::{Axis, CellShape};

/// Per-slice storage for a `width x height` grid, two slices deep
#[derive(Debug, Clone)]
pub(crate) struct SliceRing<T> {
    width: usize,
    height: usize,
    slots: Vec<T>,
}

impl<T: Clone + Default> SliceRing<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slots: vec![T::default(); 2 * width * height],
        }
    }

    #[inline]
    fn index(&self, [x, y, z]: [usize; 3]) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((z & 1) * self.height + y) * self.width + x
    }

    #[inline]
    pub fn get(&self, at: [usize; 3]) -> &T {
        &self.slots[self.index(at)]
    }

    #[inline]
    pub fn get_mut(&mut self, at: [usize; 3]) -> &mut T {
        let i = self.index(at);
        &mut self.slots[i]
    }

    /// Reset the slice that `z` maps to
    pub fn clear_slice(&mut self, z: usize) {
        let len = self.width * self.height;
        let start = (z & 1) * len;
        self.slots[start..start + len].fill(T::default());
    }
}

/// Edge-to-vertex slots of one cell
pub(crate) type EdgeVertices<const E: usize> = [Option<usize>; E];

impl<const E: usize> SliceRing<EdgeVertices<E>>
where
    [Option<usize>; E]: Default,
{
    /// Vertex already resolved for `edge` by the previous voxel, line or slice.
    ///
    /// Only edges on the cell's `x = 0`, `y = 0` or `z = 0` faces can have
    /// been seen before; neighbours are consulted in that order.
    pub fn shared_vertex<C: CellShape>(&self, [x, y, z]: [usize; 3], edge: usize) -> Option<usize> {
        let previous = |axis: Axis, cell: [usize; 3]| {
            C::neighbor_edge(edge, axis).and_then(|n| self.get(cell)[n])
        };
        (x > 0)
            .then(|| previous(Axis::X, [x - 1, y, z]))
            .flatten()
            .or_else(|| (y > 0).then(|| previous(Axis::Y, [x, y - 1, z])).flatten())
            .or_else(|| (z > 0).then(|| previous(Axis::Z, [x, y, z - 1])).flatten())
    }
}
