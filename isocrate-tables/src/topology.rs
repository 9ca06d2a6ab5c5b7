//! Hand-authored canonical surface topology
//!
//! One entry per canonical class, keyed by the class representative (the
//! smallest configuration in its orbit). Each patch is a closed loop of
//! crossing edges wound counter-clockwise when seen from above the surface.
//! Ambiguous faces separate the below-surface corners.
//!
//! These loops are the only hand-written facts behind the lookup tables;
//! the generator expands them to every configuration and rejects any loop
//! that disagrees with the cell geometry.

/// Surface topology of one canonical class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalTopology {
    /// Smallest configuration of the class
    pub representative: u16,
    /// Oriented edge loops
    pub patches: &'static [&'static [u8]],
}

const fn topology(representative: u16, patches: &'static [&'static [u8]]) -> CanonicalTopology {
    CanonicalTopology {
        representative,
        patches,
    }
}

/// Longest patch in the regular topology
pub const REGULAR_MAX_PATCH_EDGES: usize = 7;
/// Longest patch in the transition topology
pub const TRANSITION_MAX_PATCH_EDGES: usize = 11;

#[rustfmt::skip]
pub static REGULAR_TOPOLOGY: [CanonicalTopology; 17] = [
    topology(0b0000_0000, &[]),
    topology(0b0000_0001, &[&[0, 4, 8]]),
    topology(0b0000_0011, &[&[4, 8, 9, 5]]),
    topology(0b0000_0110, &[&[0, 9, 5], &[1, 10, 4]]),
    topology(0b0000_0111, &[&[1, 10, 8, 9, 5]]),
    topology(0b0000_1111, &[&[8, 9, 11, 10]]),
    topology(0b0001_0110, &[&[0, 9, 5], &[1, 10, 4], &[2, 8, 6]]),
    topology(0b0001_0111, &[&[1, 10, 6, 2, 9, 5]]),
    topology(0b0001_1000, &[&[1, 5, 11], &[2, 8, 6]]),
    topology(0b0001_1001, &[&[0, 4, 6, 2], &[1, 5, 11]]),
    topology(0b0001_1011, &[&[1, 4, 6, 2, 9, 11]]),
    topology(0b0001_1110, &[&[0, 9, 11, 10, 4], &[2, 8, 6]]),
    topology(0b0011_1100, &[&[4, 5, 11, 10], &[6, 7, 9, 8]]),
    topology(0b0011_1101, &[&[0, 5, 11, 10, 6, 7, 9]]),
    topology(0b0110_1001, &[&[0, 4, 8], &[1, 5, 11], &[2, 7, 9], &[3, 6, 10]]),
    topology(0b0110_1011, &[&[1, 4, 8, 2, 7, 11], &[3, 6, 10]]),
    topology(0b0110_1111, &[&[2, 7, 11, 3, 6, 8]]),
];

#[rustfmt::skip]
pub static TRANSITION_TOPOLOGY: [CanonicalTopology; 73] = [
    topology(0b0_0000_0000, &[]),
    topology(0b0_0000_0001, &[&[0, 6, 14, 12]]),
    topology(0b0_0000_0010, &[&[0, 1, 8]]),
    topology(0b0_0000_0011, &[&[1, 8, 6, 14, 12]]),
    topology(0b0_0000_0101, &[&[0, 6, 14, 15, 10, 1]]),
    topology(0b0_0000_0111, &[&[6, 14, 15, 10, 8]]),
    topology(0b0_0000_1010, &[&[0, 1, 8], &[2, 7, 6]]),
    topology(0b0_0000_1011, &[&[1, 8, 2, 7, 14, 12]]),
    topology(0b0_0000_1100, &[&[1, 12, 15, 10], &[2, 7, 6]]),
    topology(0b0_0000_1101, &[&[0, 2, 7, 14, 15, 10, 1]]),
    topology(0b0_0000_1110, &[&[0, 12, 15, 10, 8], &[2, 7, 6]]),
    topology(0b0_0000_1111, &[&[2, 7, 14, 15, 10, 8]]),
    topology(0b0_0001_0000, &[&[2, 8, 3, 9]]),
    topology(0b0_0001_0001, &[&[0, 6, 14, 12], &[2, 8, 3, 9]]),
    topology(0b0_0001_0010, &[&[0, 1, 3, 9, 2]]),
    topology(0b0_0001_0011, &[&[1, 3, 9, 2, 6, 14, 12]]),
    topology(0b0_0001_0101, &[&[0, 6, 14, 15, 10, 1], &[2, 8, 3, 9]]),
    topology(0b0_0001_0111, &[&[2, 6, 14, 15, 10, 3, 9]]),
    topology(0b0_0001_1010, &[&[0, 1, 3, 9, 7, 6]]),
    topology(0b0_0001_1011, &[&[1, 3, 9, 7, 14, 12]]),
    topology(0b0_0001_1100, &[&[1, 12, 15, 10], &[3, 9, 7, 6, 8]]),
    topology(0b0_0001_1101, &[&[0, 8, 3, 9, 7, 14, 15, 10, 1]]),
    topology(0b0_0001_1110, &[&[0, 12, 15, 10, 3, 9, 7, 6]]),
    topology(0b0_0010_1000, &[&[2, 7, 6], &[3, 10, 11]]),
    topology(0b0_0010_1001, &[&[0, 2, 7, 14, 12], &[3, 10, 11]]),
    topology(0b0_0010_1010, &[&[0, 1, 8], &[2, 7, 6], &[3, 10, 11]]),
    topology(0b0_0010_1011, &[&[1, 8, 2, 7, 14, 12], &[3, 10, 11]]),
    topology(0b0_0010_1101, &[&[0, 2, 7, 14, 15, 11, 3, 1]]),
    topology(0b0_0011_1000, &[&[6, 8, 10, 11, 9, 7]]),
    topology(0b0_0011_1001, &[&[0, 8, 10, 11, 9, 7, 14, 12]]),
    topology(0b0_0011_1010, &[&[0, 1, 10, 11, 9, 7, 6]]),
    topology(0b0_0011_1011, &[&[1, 10, 11, 9, 7, 14, 12]]),
    topology(0b0_0011_1101, &[&[0, 8, 1], &[7, 14, 15, 11, 9]]),
    topology(0b0_0100_0100, &[&[1, 12, 15, 10], &[4, 13, 14, 7]]),
    topology(0b0_0100_0101, &[&[0, 6, 7, 4, 13, 15, 10, 1]]),
    topology(0b0_0100_0110, &[&[0, 12, 15, 10, 8], &[4, 13, 14, 7]]),
    topology(0b0_0100_1110, &[&[0, 12, 15, 10, 8], &[2, 4, 13, 14, 6]]),
    topology(0b0_0101_0100, &[&[1, 12, 15, 10], &[2, 8, 3, 9], &[4, 13, 14, 7]]),
    topology(0b0_0101_0101, &[&[0, 6, 7, 4, 13, 15, 10, 1], &[2, 8, 3, 9]]),
    topology(0b0_0101_0110, &[&[0, 12, 15, 10, 3, 9, 2], &[4, 13, 14, 7]]),
    topology(0b0_0101_0111, &[&[2, 6, 7, 4, 13, 15, 10, 3, 9]]),
    topology(0b0_0101_1110, &[&[0, 12, 15, 10, 3, 9, 4, 13, 14, 6]]),
    topology(0b0_0110_0001, &[&[0, 6, 7, 4, 13, 12], &[3, 10, 11]]),
    topology(0b0_0110_0010, &[&[0, 1, 8], &[3, 10, 11], &[4, 13, 14, 7]]),
    topology(0b0_0110_0011, &[&[1, 8, 6, 7, 4, 13, 12], &[3, 10, 11]]),
    topology(0b0_0110_0101, &[&[0, 6, 7, 4, 13, 15, 11, 3, 1]]),
    topology(0b0_0110_0110, &[&[0, 12, 15, 11, 3, 8], &[4, 13, 14, 7]]),
    topology(0b0_0110_1010, &[&[0, 1, 8], &[2, 4, 13, 14, 6], &[3, 10, 11]]),
    topology(0b0_0110_1011, &[&[1, 8, 2, 4, 13, 12], &[3, 10, 11]]),
    topology(0b0_0110_1100, &[&[1, 12, 15, 11, 3], &[2, 4, 13, 14, 6]]),
    topology(0b0_0110_1110, &[&[0, 12, 15, 11, 3, 8], &[2, 4, 13, 14, 6]]),
    topology(0b0_0111_0001, &[&[0, 6, 7, 4, 13, 12], &[2, 8, 10, 11, 9]]),
    topology(0b0_0111_0010, &[&[0, 1, 10, 11, 9, 2], &[4, 13, 14, 7]]),
    topology(0b0_0111_0011, &[&[1, 10, 11, 9, 2, 6, 7, 4, 13, 12]]),
    topology(0b0_0111_0101, &[&[0, 6, 7, 4, 13, 15, 11, 9, 2, 8, 1]]),
    topology(0b0_0111_0110, &[&[0, 12, 15, 11, 9, 2], &[4, 13, 14, 7]]),
    topology(0b0_0111_0111, &[&[2, 6, 7, 4, 13, 15, 11, 9]]),
    topology(0b0_0111_1100, &[&[1, 12, 15, 11, 9, 4, 13, 14, 6, 8]]),
    topology(0b0_0111_1110, &[&[0, 12, 15, 11, 9, 4, 13, 14, 6]]),
    topology(0b0_1010_1010, &[&[0, 1, 8], &[2, 7, 6], &[3, 10, 11], &[4, 9, 5]]),
    topology(0b0_1010_1011, &[&[1, 8, 2, 7, 14, 12], &[3, 10, 11], &[4, 9, 5]]),
    topology(0b0_1010_1101, &[&[0, 2, 7, 14, 15, 11, 3, 1], &[4, 9, 5]]),
    topology(0b0_1010_1111, &[&[2, 7, 14, 15, 11, 3, 8], &[4, 9, 5]]),
    topology(0b0_1011_1010, &[&[0, 1, 10, 11, 5, 4, 7, 6]]),
    topology(0b0_1110_0101, &[&[0, 6, 7, 9, 5, 13, 15, 11, 3, 1]]),
    topology(0b0_1110_0111, &[&[3, 8, 6, 7, 9, 5, 13, 15, 11]]),
    topology(0b0_1110_1110, &[&[0, 12, 15, 11, 3, 8], &[2, 9, 5, 13, 14, 6]]),
    topology(0b0_1110_1111, &[&[2, 9, 5, 13, 15, 11, 3, 8]]),
    topology(0b0_1111_0101, &[&[0, 6, 7, 2, 8, 1], &[5, 13, 15, 11]]),
    topology(0b0_1111_1110, &[&[0, 12, 15, 11, 5, 13, 14, 6]]),
    topology(0b1_0101_0101, &[&[0, 6, 7, 4, 5, 11, 10, 1], &[2, 8, 3, 9]]),
    topology(0b1_0101_0111, &[&[2, 6, 7, 4, 5, 11, 10, 3, 9]]),
    topology(0b1_0101_1111, &[&[3, 9, 4, 5, 11, 10]]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn check_sorted(table: &[CanonicalTopology]) {
        for pair in table.windows(2) {
            assert!(pair[0].representative < pair[1].representative);
        }
    }

    #[test]
    fn test_representatives_sorted() {
        check_sorted(&REGULAR_TOPOLOGY);
        check_sorted(&TRANSITION_TOPOLOGY);
    }

    #[test]
    fn test_patch_lengths() {
        let longest = |table: &[CanonicalTopology]| {
            table
                .iter()
                .flat_map(|t| t.patches.iter())
                .map(|p| p.len())
                .max()
                .unwrap_or(0)
        };
        assert_eq!(longest(&REGULAR_TOPOLOGY), REGULAR_MAX_PATCH_EDGES);
        assert_eq!(longest(&TRANSITION_TOPOLOGY), TRANSITION_MAX_PATCH_EDGES);
        for t in REGULAR_TOPOLOGY.iter().chain(TRANSITION_TOPOLOGY.iter()) {
            assert!(t.patches.len() <= 4);
            assert!(t.patches.iter().all(|p| p.len() >= 3));
        }
    }

    #[test]
    fn test_trivial_class_is_empty() {
        assert!(REGULAR_TOPOLOGY[0].patches.is_empty());
        assert!(TRANSITION_TOPOLOGY[0].patches.is_empty());
    }
}
