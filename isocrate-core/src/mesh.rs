//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A polygon mesh with shared vertices.
///
/// Every vertex carries a position and a unit normal. Faces are stored flat:
/// face `i` is `indices[face_offsets[i]..face_offsets[i + 1]]`, listed
/// counter-clockwise when seen from the outside (positive field side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3f>,
    pub normals: Vec<Vector3f>,
    indices: Vec<usize>,
    face_offsets: Vec<usize>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            face_offsets: vec![0],
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.face_offsets.len() - 1
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.face_count() == 0
    }

    /// Position and normal of one vertex
    pub fn vertex(&self, index: usize) -> NormalPoint3f {
        NormalPoint3f {
            position: self.positions[index],
            normal: self.normals[index],
        }
    }

    /// Interleaved position/normal pairs, ready for a vertex buffer
    pub fn vertices(&self) -> Vec<NormalPoint3f> {
        (0..self.vertex_count()).map(|i| self.vertex(i)).collect()
    }

    /// Add a vertex to the mesh, returning its index
    pub fn add_vertex(&mut self, position: Point3f, normal: Vector3f) -> usize {
        let index = self.positions.len();
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    /// Add a polygon face (three or more vertex indices)
    pub fn add_face(&mut self, face: &[usize]) {
        debug_assert!(face.len() >= 3, "faces need at least three vertices");
        self.indices.extend_from_slice(face);
        self.face_offsets.push(self.indices.len());
    }

    /// Add a triangle face
    pub fn add_triangle(&mut self, triangle: [usize; 3]) {
        self.add_face(&triangle);
    }

    /// Vertex indices of one face
    pub fn face(&self, index: usize) -> &[usize] {
        &self.indices[self.face_offsets[index]..self.face_offsets[index + 1]]
    }

    /// Iterate over all faces
    pub fn faces(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.face_offsets
            .windows(2)
            .map(move |range| &self.indices[range[0]..range[1]])
    }

    /// True when every face is a triangle
    pub fn is_triangulated(&self) -> bool {
        self.faces().all(|face| face.len() == 3)
    }

    /// Fan-triangulate every polygon face, sharing the vertex buffers
    pub fn triangulated(&self) -> Mesh {
        let mut mesh = Mesh {
            positions: self.positions.clone(),
            normals: self.normals.clone(),
            indices: Vec::with_capacity(self.indices.len() * 2),
            face_offsets: vec![0],
        };
        for face in self.faces() {
            for i in 1..face.len() - 1 {
                mesh.add_triangle([face[0], face[i], face[i + 1]]);
            }
        }
        mesh
    }

    /// Area-weighted (unnormalized) normal of a face, via Newell's method
    pub fn face_area_normal(&self, index: usize) -> Vector3f {
        let face = self.face(index);
        let mut normal = Vector3f::zeros();
        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let pa = self.positions[a].coords;
            let pb = self.positions[b].coords;
            normal += pa.cross(&pb);
        }
        normal * 0.5
    }

    /// Calculate unit face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        (0..self.face_count())
            .map(|i| {
                let n = self.face_area_normal(i);
                let length = n.norm();
                if length > 0.0 {
                    n / length
                } else {
                    n
                }
            })
            .collect()
    }

    /// Vertex normals averaged from the incident faces, weighted by area.
    ///
    /// Vertices without any non-degenerate incident face get a zero vector.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertex_count()];
        for i in 0..self.face_count() {
            let n = self.face_area_normal(i);
            for &v in self.face(i) {
                normals[v] += n;
            }
        }
        for n in &mut normals {
            let length = n.norm();
            if length > 0.0 {
                *n /= length;
            }
        }
        normals
    }

    /// Number of faces using each undirected edge, keyed `(low, high)`
    pub fn edge_use_counts(&self) -> HashMap<(usize, usize), usize> {
        let mut counts = HashMap::new();
        for face in self.faces() {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// True when every edge is shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.edge_use_counts().values().all(|&count| count == 2)
    }

    /// Append another mesh, offsetting its face indices
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.positions.len();
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        for face in other.faces() {
            self.indices.extend(face.iter().map(|&v| v + offset));
            self.face_offsets.push(self.indices.len());
        }
    }

    /// Merge vertices whose positions are bit-identical.
    ///
    /// Used to join meshes extracted from abutting blocks: shared boundary
    /// crossings interpolate identically on both sides. The first occurrence
    /// of each position keeps its normal. Returns the number of vertices
    /// removed.
    pub fn weld(&mut self) -> usize {
        let mut first: HashMap<[u32; 3], usize> = HashMap::with_capacity(self.positions.len());
        let mut remap = Vec::with_capacity(self.positions.len());
        let mut positions = Vec::with_capacity(self.positions.len());
        let mut normals = Vec::with_capacity(self.normals.len());

        for (position, normal) in self.positions.iter().zip(&self.normals) {
            // +0.0 folds negative zero into positive zero
            let key = [
                (position.x + 0.0).to_bits(),
                (position.y + 0.0).to_bits(),
                (position.z + 0.0).to_bits(),
            ];
            let index = *first.entry(key).or_insert_with(|| {
                positions.push(*position);
                normals.push(*normal);
                positions.len() - 1
            });
            remap.push(index);
        }

        let removed = self.positions.len() - positions.len();
        for index in &mut self.indices {
            *index = remap[*index];
        }
        self.positions = positions;
        self.normals = normals;
        removed
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
