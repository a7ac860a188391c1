#![warn(missing_docs)]
//! Screen-space picking against triangle meshes.
//!
//! Turns a click into a world-space point on a mesh, or into the mesh vertex
//! closest to where the click landed:
//!
//! - **Unproject**: the screen position is mapped to world space at the near
//!   and far planes, giving a ray.
//! - **Intersect**: the ray is handed to a [`RayIntersector`], which returns
//!   every triangle it crosses.
//! - **Resolve**: one hit becomes the hit position, two or more become the
//!   midpoint of the first two (the near and far walls of a closed surface);
//!   a vertex pick snaps the first hit to its heaviest barycentric corner.
//!
//! # Example
//!
//! ```rust,no_run
//! use glam::{IVec2, Vec3};
//! use meshpick_camera::{Camera, Viewport};
//! use meshpick_core::TriMesh;
//! use meshpick_picking::{unproject_in_mesh, MeshIntersector};
//!
//! let mesh = TriMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]])?;
//! let intersector = MeshIntersector::new(mesh);
//! let camera = Camera::default().state(Viewport::from_size(800, 600));
//!
//! let pick = unproject_in_mesh(IVec2::new(410, 310), &camera, &intersector);
//! if let Some(point) = pick.point {
//!     println!("picked {point} ({} hits)", pick.hit_count);
//! }
//! # Ok::<(), meshpick_core::MeshError>(())
//! ```

pub mod aabb;
pub mod mesh_intersector;
pub mod query;
pub mod resolve;

// Re-export commonly used types
pub use aabb::Aabb;
pub use mesh_intersector::{intersect_triangle, IntersectOptions, MeshIntersector};
pub use meshpick_core::{FaceTable, Hit, Ray, RayIntersector};
pub use query::{
    camera_ray, screen_ray, unproject_in_mesh, unproject_in_mesh_explicit,
    unproject_in_mesh_with_hits, unproject_vertex_in_mesh, unproject_vertex_in_mesh_with,
};
pub use resolve::{
    estimate_point, resolve_vertex, HitSelection, PickPoint, PointPick, VertexPick,
};
