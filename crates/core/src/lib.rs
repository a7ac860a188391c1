#![warn(missing_docs)]
//! Core primitives shared across the workspace.
//!
//! Everything a pick query exchanges with its collaborators lives here: the
//! [`Ray`] built from a screen coordinate, the [`Hit`] records an
//! intersection capability produces, the [`RayIntersector`] seam itself and
//! the [`FaceTable`] used to map a hit triangle back to its vertices.

pub mod hit;
pub mod intersector;
pub mod mesh;

// Re-export commonly used types
pub use hit::{Hit, Ray};
pub use intersector::RayIntersector;
pub use mesh::{FaceTable, MeshError, TriMesh};
