//! Reduction of configurations to canonical classes

use crate::geometry::{Axis, CellShape};
use crate::symmetry::OpSequence;
use isocrate_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Canonical form of one raw configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canonical {
    /// Index into the sorted representative list
    pub class: usize,
    /// Smallest configuration in the orbit
    pub representative: u16,
    /// Operation taking the raw configuration to `representative`
    pub op: OpSequence,
}

/// Finds canonical classes over a cell shape's symmetry group.
///
/// The group is enumerated once, in a fixed order, and the first operation
/// reaching the orbit minimum wins. Inversion is skipped for configurations
/// with an ambiguous face, since the ambiguity policy is not symmetric under
/// complement.
#[derive(Debug, Clone)]
pub struct Canonicalizer<C: CellShape> {
    representatives: Vec<u16>,
    group: Vec<OpSequence>,
    _shape: PhantomData<C>,
}

impl<C: CellShape> Canonicalizer<C> {
    /// Create a canonicalizer over an ascending list of class representatives
    pub fn new(representatives: impl IntoIterator<Item = u16>) -> Result<Self> {
        let representatives: Vec<u16> = representatives.into_iter().collect();
        if representatives.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::Authoring(
                "class representatives must be strictly ascending".to_string(),
            ));
        }
        if let Some(&last) = representatives.last() {
            if last as usize >= C::configuration_count() {
                return Err(Error::Authoring(format!(
                    "representative {:#b} is outside the {:?} configuration range",
                    last,
                    C::KIND
                )));
            }
        }
        Ok(Self {
            representatives,
            group: Self::symmetry_group(),
            _shape: PhantomData,
        })
    }

    /// Every operation of the shape's group, in enumeration order
    pub fn symmetry_group() -> Vec<OpSequence> {
        let turns = |axis: Axis| if C::ROTATION_AXES.contains(&axis) { 4 } else { 1 };
        let mut group = Vec::new();
        for mirror in [false, true] {
            for x in 0..turns(Axis::X) {
                for y in 0..turns(Axis::Y) {
                    for z in 0..turns(Axis::Z) {
                        for invert in [false, true] {
                            group.push(OpSequence::new([x, y, z], mirror, invert));
                        }
                    }
                }
            }
        }
        group
    }

    pub fn group(&self) -> &[OpSequence] {
        &self.group
    }

    pub fn representatives(&self) -> &[u16] {
        &self.representatives
    }

    pub fn class_count(&self) -> usize {
        self.representatives.len()
    }

    /// Smallest image of `configuration` and the first operation producing it
    pub fn orbit_minimum(&self, configuration: u16) -> (u16, OpSequence) {
        let allow_invert = !C::has_ambiguous_face(configuration);
        let mut best = (configuration, OpSequence::IDENTITY);
        for &op in &self.group {
            if op.invert && !allow_invert {
                continue;
            }
            let image = op.apply::<C>(configuration);
            if image < best.0 {
                best = (image, op);
            }
        }
        best
    }

    pub fn canonicalize(&self, configuration: u16) -> Result<Canonical> {
        if configuration as usize >= C::configuration_count() {
            return Err(Error::InvalidConfig(format!(
                "configuration {:#b} has more than {} sample bits",
                configuration,
                C::SAMPLE_COUNT
            )));
        }
        let (representative, op) = self.orbit_minimum(configuration);
        let class = self
            .representatives
            .binary_search(&representative)
            .map_err(|_| {
                Error::Authoring(format!(
                    "configuration {:#b} reduces to {:#b}, which has no authored class",
                    configuration, representative
                ))
            })?;
        Ok(Canonical {
            class,
            representative,
            op,
        })
    }

    /// Distinct orbit minima over every configuration, ascending
    pub fn discover_classes() -> Vec<u16> {
        let unclassified = Self {
            representatives: Vec::new(),
            group: Self::symmetry_group(),
            _shape: PhantomData,
        };
        let mut classes: Vec<u16> = (0..C::configuration_count())
            .map(|config| unclassified.orbit_minimum(config as u16).0)
            .collect();
        classes.sort_unstable();
        classes.dedup();
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{RegularCell, TransitionCell};

    #[test]
    fn test_group_sizes() {
        assert_eq!(Canonicalizer::<RegularCell>::symmetry_group().len(), 2 * 64 * 2);
        assert_eq!(Canonicalizer::<TransitionCell>::symmetry_group().len(), 2 * 4 * 2);
        assert_eq!(
            Canonicalizer::<RegularCell>::symmetry_group()[0],
            OpSequence::IDENTITY
        );
    }

    #[test]
    fn test_discovered_class_counts() {
        assert_eq!(Canonicalizer::<RegularCell>::discover_classes().len(), 17);
        assert_eq!(Canonicalizer::<TransitionCell>::discover_classes().len(), 73);
    }

    #[test]
    fn test_single_corner_class() {
        let canon =
            Canonicalizer::<RegularCell>::new(Canonicalizer::<RegularCell>::discover_classes())
                .unwrap();
        for corner in 0..8 {
            let c = canon.canonicalize(1 << corner).unwrap();
            assert_eq!(c.representative, 1);
            assert_eq!(c.class, 1);
            assert_eq!(c.op.apply::<RegularCell>(1 << corner), 1);
        }
        // seven below is the complement of one below
        let c = canon.canonicalize(0xFE).unwrap();
        assert_eq!(c.representative, 1);
        assert!(c.op.invert);
    }

    #[test]
    fn test_ambiguous_configurations_never_invert() {
        let canon =
            Canonicalizer::<RegularCell>::new(Canonicalizer::<RegularCell>::discover_classes())
                .unwrap();
        for config in 0..=255u16 {
            if RegularCell::has_ambiguous_face(config) {
                assert!(!canon.canonicalize(config).unwrap().op.invert);
            }
        }
    }

    #[test]
    fn test_unknown_class_is_authoring_error() {
        let canon = Canonicalizer::<RegularCell>::new([0u16]).unwrap();
        assert!(matches!(canon.canonicalize(1), Err(Error::Authoring(_))));
        assert!(matches!(canon.canonicalize(256), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unsorted_representatives_rejected() {
        assert!(Canonicalizer::<RegularCell>::new([1u16, 0]).is_err());
        assert!(Canonicalizer::<RegularCell>::new([0u16, 300]).is_err());
    }
}
