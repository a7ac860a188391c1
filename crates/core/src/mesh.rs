//! Triangle meshes and the face table a vertex pick reads from.

use glam::Vec3;
use thiserror::Error;

/// Read-only mapping from triangle id to its three vertex ids.
pub trait FaceTable {
    /// Vertex ids of triangle `triangle_id`, or `None` if there is no such triangle.
    fn face(&self, triangle_id: u32) -> Option<[u32; 3]>;

    /// Number of triangles in the table.
    fn face_count(&self) -> usize;

    /// Vertex id at `corner` (0, 1 or 2) of triangle `triangle_id`.
    fn corner(&self, triangle_id: u32, corner: usize) -> Option<u32> {
        self.face(triangle_id)
            .and_then(|face| face.get(corner).copied())
    }
}

impl FaceTable for [[u32; 3]] {
    fn face(&self, triangle_id: u32) -> Option<[u32; 3]> {
        self.get(triangle_id as usize).copied()
    }

    fn face_count(&self) -> usize {
        self.len()
    }
}

impl FaceTable for Vec<[u32; 3]> {
    fn face(&self, triangle_id: u32) -> Option<[u32; 3]> {
        self.as_slice().face(triangle_id)
    }

    fn face_count(&self) -> usize {
        self.len()
    }
}

/// Errors raised while assembling a [`TriMesh`].
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// A face references a vertex past the end of the position list.
    #[error("face {face} corner {corner} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending face index.
        face: usize,
        /// Corner within the face (0, 1 or 2).
        corner: usize,
        /// Referenced vertex id.
        vertex: u32,
        /// Number of positions in the mesh.
        vertex_count: usize,
    },
    /// A vertex position contains NaN or infinity.
    #[error("vertex {vertex} has a non-finite position {position:?}")]
    NonFinitePosition {
        /// Offending vertex id.
        vertex: usize,
        /// The rejected position.
        position: [f32; 3],
    },
    /// More vertices or faces than a `u32` id can address.
    #[error("mesh has {count} {what}, more than u32 ids can address")]
    TooLarge {
        /// Which list overflowed ("vertices" or "faces").
        what: &'static str,
        /// Length of the list.
        count: usize,
    },
}

/// Indexed triangle mesh: vertex positions plus a validated face table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    positions: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Build a mesh, checking every face index and vertex position.
    pub fn new(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        if u32::try_from(positions.len()).is_err() {
            return Err(MeshError::TooLarge {
                what: "vertices",
                count: positions.len(),
            });
        }
        if u32::try_from(faces.len()).is_err() {
            return Err(MeshError::TooLarge {
                what: "faces",
                count: faces.len(),
            });
        }

        if let Some((vertex, position)) = positions
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite())
        {
            return Err(MeshError::NonFinitePosition {
                vertex,
                position: position.to_array(),
            });
        }

        for (face_index, face) in faces.iter().enumerate() {
            for (corner, &vertex) in face.iter().enumerate() {
                if vertex as usize >= positions.len() {
                    return Err(MeshError::VertexOutOfRange {
                        face: face_index,
                        corner,
                        vertex,
                        vertex_count: positions.len(),
                    });
                }
            }
        }

        Ok(Self { positions, faces })
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Face table (three vertex ids per triangle).
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Position of vertex `vertex_id`.
    pub fn vertex(&self, vertex_id: u32) -> Option<Vec3> {
        self.positions.get(vertex_id as usize).copied()
    }

    /// Corner positions of triangle `triangle_id`.
    pub fn triangle(&self, triangle_id: u32) -> Option<[Vec3; 3]> {
        let [a, b, c] = self.face(triangle_id)?;
        // Indices were validated on construction.
        Some([
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ])
    }

    /// Iterate `(triangle_id, corners)` over every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = (u32, [Vec3; 3])> + '_ {
        self.faces.iter().enumerate().map(|(id, &[a, b, c])| {
            (
                id as u32,
                [
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                ],
            )
        })
    }

    /// Axis-aligned bounds `(min, max)` of the referenced vertices.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut corners = self.triangles().flat_map(|(_, corners)| corners);
        let first = corners.next()?;
        Some(corners.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}

impl FaceTable for TriMesh {
    fn face(&self, triangle_id: u32) -> Option<[u32; 3]> {
        self.faces.face(triangle_id)
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }
}
