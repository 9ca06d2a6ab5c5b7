//! Table generation
//!
//! Expands the hand-authored canonical topologies into one fully resolved
//! entry per raw configuration. Each canonical patch is mapped back into the
//! raw configuration's frame with the reverse of its canonicalizing
//! operation, reversed when that operation flips orientation, and then
//! checked against the cell geometry. Any disagreement aborts generation.

use crate::canonical::Canonicalizer;
use crate::geometry::{CellKind, CellShape, RegularCell, TransitionCell};
use crate::symmetry::OpSequence;
use crate::topology::{CanonicalTopology, REGULAR_TOPOLOGY, TRANSITION_TOPOLOGY};
use isocrate_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Marker for "no entry" in the per-edge tables
pub const NO_ENTRY: u8 = 0xFF;

/// Flat lookup tables for one cell shape.
///
/// Ranges are stored as offset arrays with one trailing sentinel:
/// the patches of configuration `c` are `patch_offsets[c]..patch_offsets[c + 1]`,
/// the edges of patch `p` are `patch_edges[patch_edge_offsets[p]..patch_edge_offsets[p + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTables {
    pub kind: CellKind,
    pub sample_count: usize,
    pub edge_count: usize,
    /// Class representatives, ascending
    pub representatives: Vec<u16>,
    /// Canonical class per configuration
    pub classes: Vec<u8>,
    /// Packed [`OpSequence`] per configuration
    pub operations: Vec<u8>,
    pub patch_offsets: Vec<u32>,
    pub patch_edge_offsets: Vec<u32>,
    /// Oriented edge loops, counter-clockwise seen from above
    pub patch_edges: Vec<u8>,
    pub triangle_offsets: Vec<u32>,
    /// Fan triangles of every patch, as edge triples
    pub triangles: Vec<[u8; 3]>,
    /// `vertex_index[c * edge_count + e]`: patch of configuration `c` owning edge `e`
    pub vertex_index: Vec<u8>,
    /// `winding[c * edge_count + e]`: face through which the surface leaves edge `e`
    pub winding: Vec<u8>,
}

impl CellTables {
    pub fn configuration_count(&self) -> usize {
        1 << self.sample_count
    }

    pub fn class_count(&self) -> usize {
        self.representatives.len()
    }

    pub fn class_of(&self, configuration: usize) -> usize {
        self.classes[configuration] as usize
    }

    pub fn operation(&self, configuration: usize) -> OpSequence {
        OpSequence::unpack(self.operations[configuration])
    }

    pub fn patch_count(&self, configuration: usize) -> usize {
        (self.patch_offsets[configuration + 1] - self.patch_offsets[configuration]) as usize
    }

    /// Oriented edge loops of one configuration
    pub fn patches(&self, configuration: usize) -> impl Iterator<Item = &[u8]> + '_ {
        let start = self.patch_offsets[configuration] as usize;
        let end = self.patch_offsets[configuration + 1] as usize;
        (start..end).map(move |p| {
            let a = self.patch_edge_offsets[p] as usize;
            let b = self.patch_edge_offsets[p + 1] as usize;
            &self.patch_edges[a..b]
        })
    }

    pub fn triangles(&self, configuration: usize) -> &[[u8; 3]] {
        let start = self.triangle_offsets[configuration] as usize;
        let end = self.triangle_offsets[configuration + 1] as usize;
        &self.triangles[start..end]
    }

    /// Patch owning the crossing on `edge`, if any
    pub fn vertex_index(&self, configuration: usize, edge: usize) -> Option<usize> {
        match self.vertex_index[configuration * self.edge_count + edge] {
            NO_ENTRY => None,
            patch => Some(patch as usize),
        }
    }

    pub fn exit_face(&self, configuration: usize, edge: usize) -> Option<usize> {
        match self.winding[configuration * self.edge_count + edge] {
            NO_ENTRY => None,
            face => Some(face as usize),
        }
    }

    /// Longest patch over all configurations
    pub fn max_patch_edges(&self) -> usize {
        self.patch_edge_offsets
            .windows(2)
            .map(|w| (w[1] - w[0]) as usize)
            .max()
            .unwrap_or(0)
    }
}

/// Tables for both cell shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    pub regular: CellTables,
    pub transition: CellTables,
}

/// Generate the regular and transition tables from the built-in topology
pub fn generate_tables() -> Result<Tables> {
    Ok(Tables {
        regular: generate_cell_tables::<RegularCell>(&REGULAR_TOPOLOGY)?,
        transition: generate_cell_tables::<TransitionCell>(&TRANSITION_TOPOLOGY)?,
    })
}

/// Expand a canonical topology over every configuration of a cell shape
pub fn generate_cell_tables<C: CellShape>(topology: &[CanonicalTopology]) -> Result<CellTables> {
    let canonicalizer = Canonicalizer::<C>::new(topology.iter().map(|t| t.representative))?;

    for entry in topology {
        let (minimum, _) = canonicalizer.orbit_minimum(entry.representative);
        if minimum != entry.representative {
            return Err(Error::Authoring(format!(
                "{:?} class {:#b} is not the smallest of its orbit ({:#b})",
                C::KIND,
                entry.representative,
                minimum
            )));
        }
        validate_patches::<C, _>(entry.representative, entry.patches)?;
    }

    let count = C::configuration_count();
    let mut tables = CellTables {
        kind: C::KIND,
        sample_count: C::SAMPLE_COUNT,
        edge_count: C::EDGE_COUNT,
        representatives: canonicalizer.representatives().to_vec(),
        classes: Vec::with_capacity(count),
        operations: Vec::with_capacity(count),
        patch_offsets: vec![0],
        patch_edge_offsets: vec![0],
        patch_edges: Vec::new(),
        triangle_offsets: vec![0],
        triangles: Vec::new(),
        vertex_index: vec![NO_ENTRY; count * C::EDGE_COUNT],
        winding: vec![NO_ENTRY; count * C::EDGE_COUNT],
    };

    for configuration in 0..count {
        let config = configuration as u16;
        let canonical = canonicalizer.canonicalize(config)?;
        let patches = expand_patches::<C>(topology[canonical.class].patches, canonical.op)?;
        validate_patches::<C, _>(config, &patches)?;

        tables.classes.push(canonical.class as u8);
        tables.operations.push(canonical.op.pack());

        for (index, patch) in patches.iter().enumerate() {
            for &edge in patch {
                tables.vertex_index[configuration * C::EDGE_COUNT + edge as usize] = index as u8;
            }
            for i in 1..patch.len() - 1 {
                tables.triangles.push([patch[0], patch[i], patch[i + 1]]);
            }
            tables.patch_edges.extend_from_slice(patch);
            tables.patch_edge_offsets.push(tables.patch_edges.len() as u32);
        }
        tables
            .patch_offsets
            .push((tables.patch_edge_offsets.len() - 1) as u32);
        tables.triangle_offsets.push(tables.triangles.len() as u32);

        for edge in 0..C::EDGE_COUNT {
            if let Some(face) = C::exit_face(config, edge) {
                tables.winding[configuration * C::EDGE_COUNT + edge] = face as u8;
            }
        }
    }

    log::info!(
        "generated {:?} tables: {} classes, {} configurations, {} patches, {} triangles",
        C::KIND,
        tables.class_count(),
        count,
        tables.patch_edge_offsets.len() - 1,
        tables.triangles.len()
    );
    Ok(tables)
}

/// Map canonical patches into the raw frame of `op`'s source configuration
fn expand_patches<C: CellShape>(patches: &[&[u8]], op: OpSequence) -> Result<Vec<Vec<u8>>> {
    patches
        .iter()
        .map(|patch| {
            let mut edges = patch
                .iter()
                .map(|&edge| {
                    op.reverse_edge::<C>(edge as usize)
                        .map(|e| e as u8)
                        .ok_or_else(|| {
                            Error::Authoring(format!(
                                "{:?} edge {} has no image under {:?}",
                                C::KIND,
                                edge,
                                op
                            ))
                        })
                })
                .collect::<Result<Vec<u8>>>()?;
            if op.flips_winding() {
                edges.reverse();
            }
            Ok(edges)
        })
        .collect()
}

/// Check a configuration's patches against the cell geometry.
///
/// Every crossing edge must belong to exactly one patch, every patch edge
/// must cross, and consecutive edges of a loop must share the face through
/// which the surface leaves the earlier one.
pub fn validate_patches<C: CellShape, P: AsRef<[u8]>>(
    configuration: u16,
    patches: &[P],
) -> Result<()> {
    let authoring = |message: String| {
        Error::Authoring(format!(
            "{:?} configuration {:#b}: {}",
            C::KIND,
            configuration,
            message
        ))
    };

    let mut owner = vec![None; C::EDGE_COUNT];
    for (index, patch) in patches.iter().enumerate() {
        let patch = patch.as_ref();
        if patch.len() < 3 {
            return Err(authoring(format!("patch {} has fewer than three edges", index)));
        }
        for &edge in patch {
            let edge = edge as usize;
            if edge >= C::EDGE_COUNT {
                return Err(authoring(format!("edge {} out of range", edge)));
            }
            if !C::edge_crosses(configuration, edge) {
                return Err(authoring(format!("patch {} uses non-crossing edge {}", index, edge)));
            }
            if let Some(other) = owner[edge].replace(index) {
                return Err(authoring(format!(
                    "edge {} claimed by patches {} and {}",
                    edge, other, index
                )));
            }
        }
        for j in 0..patch.len() {
            let edge = patch[j] as usize;
            let next = patch[(j + 1) % patch.len()] as usize;
            let exit = C::exit_face(configuration, edge)
                .ok_or_else(|| authoring(format!("edge {} has no exit face", edge)))?;
            if !C::edge_faces(next).contains(&exit) {
                return Err(authoring(format!(
                    "patch {} winds from edge {} to edge {} against face {}",
                    index, edge, next, exit
                )));
            }
        }
    }

    if let Some(edge) =
        (0..C::EDGE_COUNT).find(|&e| C::edge_crosses(configuration, e) && owner[e].is_none())
    {
        return Err(authoring(format!("crossing edge {} is not claimed", edge)));
    }
    Ok(())
}
