//! Lookup tables embedded at build time

use isocrate_tables::{OpSequence, NO_ENTRY};

#[allow(dead_code)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/tables.rs"));
}

/// Borrowed view of one cell shape's generated tables
#[derive(Debug, Clone, Copy)]
pub struct CellTable {
    pub sample_count: usize,
    pub edge_count: usize,
    pub class_count: usize,
    pub max_patch_edges: usize,
    classes: &'static [u8],
    operations: &'static [u8],
    patch_offsets: &'static [u32],
    patch_edge_offsets: &'static [u32],
    patch_edges: &'static [u8],
    triangle_offsets: &'static [u32],
    triangles: &'static [[u8; 3]],
    vertex_index: &'static [u8],
    winding: &'static [u8],
}

macro_rules! cell_table {
    ($module:ident) => {
        CellTable {
            sample_count: generated::$module::SAMPLE_COUNT,
            edge_count: generated::$module::EDGE_COUNT,
            class_count: generated::$module::CLASS_COUNT,
            max_patch_edges: generated::$module::MAX_PATCH_EDGES,
            classes: &generated::$module::CLASSES,
            operations: &generated::$module::OPERATIONS,
            patch_offsets: &generated::$module::PATCH_OFFSETS,
            patch_edge_offsets: &generated::$module::PATCH_EDGE_OFFSETS,
            patch_edges: &generated::$module::PATCH_EDGES,
            triangle_offsets: &generated::$module::TRIANGLE_OFFSETS,
            triangles: &generated::$module::TRIANGLES,
            vertex_index: &generated::$module::VERTEX_INDEX,
            winding: &generated::$module::WINDING,
        }
    };
}

/// Tables for the 8-sample regular cell
pub static REGULAR: CellTable = cell_table!(regular);

/// Tables for the 9-sample transition cell
pub static TRANSITION: CellTable = cell_table!(transition);

impl CellTable {
    pub fn configuration_count(&self) -> usize {
        1 << self.sample_count
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

    /// Oriented edge loops, counter-clockwise seen from above the surface
    pub fn patches(&self, configuration: usize) -> impl Iterator<Item = &'static [u8]> + '_ {
        let start = self.patch_offsets[configuration] as usize;
        let end = self.patch_offsets[configuration + 1] as usize;
        let offsets = self.patch_edge_offsets;
        let edges = self.patch_edges;
        (start..end).map(move |p| &edges[offsets[p] as usize..offsets[p + 1] as usize])
    }

    /// Fan triangles as edge triples
    pub fn triangles(&self, configuration: usize) -> &'static [[u8; 3]] {
        let start = self.triangle_offsets[configuration] as usize;
        let end = self.triangle_offsets[configuration + 1] as usize;
        &self.triangles[start..end]
    }

    /// Patch owning the crossing on `edge`
    pub fn vertex_index(&self, configuration: usize, edge: usize) -> Option<usize> {
        match self.vertex_index[configuration * self.edge_count + edge] {
            NO_ENTRY => None,
            patch => Some(patch as usize),
        }
    }

    /// Face through which the surface leaves `edge`
    pub fn exit_face(&self, configuration: usize, edge: usize) -> Option<usize> {
        match self.winding[configuration * self.edge_count + edge] {
            NO_ENTRY => None,
            face => Some(face as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isocrate_tables::generate_tables;

    #[test]
    fn test_embedded_tables_match_generator() {
        let tables = generate_tables().unwrap();
        let pairs = [(&REGULAR, &tables.regular), (&TRANSITION, &tables.transition)];
        for (embedded, generated) in pairs {
            assert_eq!(embedded.class_count, generated.class_count());
            assert_eq!(embedded.edge_count, generated.edge_count);
            for config in 0..embedded.configuration_count() {
                assert_eq!(embedded.class_of(config), generated.class_of(config));
                assert_eq!(embedded.operation(config), generated.operation(config));
                assert!(embedded.patches(config).eq(generated.patches(config)));
                assert_eq!(embedded.triangles(config), generated.triangles(config));
                for edge in 0..embedded.edge_count {
                    assert_eq!(
                        embedded.vertex_index(config, edge),
                        generated.vertex_index(config, edge)
                    );
                    assert_eq!(embedded.exit_face(config, edge), generated.exit_face(config, edge));
                }
            }
        }
    }

    #[test]
    fn test_patch_limits() {
        assert_eq!(REGULAR.max_patch_edges, 7);
        assert_eq!(TRANSITION.max_patch_edges, 11);
        assert_eq!(REGULAR.patch_count(0b0110_1001), 4);
    }
}
