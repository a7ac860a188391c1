//! Reference ray/mesh intersector.
//!
//! Answers a ray query the way a first-hit acceleration structure is usually
//! driven for picking: shoot, record the nearest hit, re-shoot from just past
//! it, and stop once the ray escapes the mesh. The returned hits are
//! therefore ordered by increasing `t`.

use glam::Vec3;
use meshpick_core::{Hit, RayIntersector, TriMesh};
use tracing::{trace, warn};

use crate::aabb::Aabb;

/// Relative determinant threshold below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-7;

/// Tuning for [`MeshIntersector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectOptions {
    /// Smallest accepted ray parameter.
    pub tnear: f32,
    /// Largest accepted ray parameter.
    pub tfar: f32,
    /// World-space distance to step past a hit before re-shooting.
    pub epsilon: f32,
    /// Upper bound on shots per query.
    pub max_shots: u32,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            tnear: 0.0,
            tfar: f32::INFINITY,
            epsilon: 1e-4,
            max_shots: 256,
        }
    }
}

/// Brute-force intersector over an owned [`TriMesh`].
#[derive(Debug, Clone)]
pub struct MeshIntersector {
    mesh: TriMesh,
    bounds: Option<Aabb>,
    options: IntersectOptions,
}

impl MeshIntersector {
    /// Build an intersector with default options.
    pub fn new(mesh: TriMesh) -> Self {
        Self::with_options(mesh, IntersectOptions::default())
    }

    /// Build an intersector with explicit options.
    pub fn with_options(mesh: TriMesh, options: IntersectOptions) -> Self {
        let bounds = Aabb::from_mesh(&mesh).map(|aabb| aabb.expanded(options.epsilon));
        Self {
            mesh,
            bounds,
            options,
        }
    }

    /// The mesh being intersected.
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    /// Active options.
    pub fn options(&self) -> &IntersectOptions {
        &self.options
    }

    /// Nearest hit with `t` in `[tnear, tfar]`, ignoring triangle `skip`.
    ///
    /// Equal distances resolve to the lowest triangle id.
    fn closest_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        tnear: f32,
        tfar: f32,
        skip: Option<u32>,
    ) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = tfar;

        for (id, [a, b, c]) in self.mesh.triangles() {
            if skip == Some(id) {
                continue;
            }
            if let Some((t, u, v)) = intersect_triangle(origin, direction, a, b, c) {
                let better = match closest {
                    Some(_) => t < closest_t,
                    None => t <= closest_t,
                };
                if t >= tnear && better {
                    closest_t = t;
                    closest = Some(Hit::new(t, u, v, id));
                }
            }
        }

        closest
    }
}

impl RayIntersector for MeshIntersector {
    fn intersect_ray(&self, origin: Vec3, direction: Vec3, hits: &mut Vec<Hit>) -> u32 {
        let IntersectOptions {
            tnear,
            tfar,
            epsilon,
            max_shots,
        } = self.options;

        let Some(bounds) = self.bounds else {
            return 0;
        };
        let Some((_, t_exit)) = bounds.ray_interval(origin, direction, tnear, tfar) else {
            trace!("ray misses mesh bounds");
            return 1;
        };

        // Step size in ray units so `epsilon` stays a world-space distance
        let step = epsilon / direction.length();
        let mut min_t = tnear;
        let mut last_id = None;
        let mut shots = 0;

        while shots < max_shots {
            shots += 1;
            match self.closest_hit(origin, direction, min_t, t_exit, last_id) {
                Some(hit) => {
                    trace!(t = hit.t, id = hit.id, shot = shots, "ray hit triangle");
                    hits.push(hit);
                    min_t = hit.t + step;
                    last_id = Some(hit.id);
                }
                None => return shots,
            }
        }

        warn!(max_shots, hits = hits.len(), "ray query stopped at shot limit");
        shots
    }
}

/// Möller–Trumbore ray/triangle test.
///
/// Returns `(t, u, v)` with `u`, `v` the barycentric weights of `b` and `c`,
/// for any `t` (callers apply their own range). Rays parallel to the
/// triangle plane miss.
pub fn intersect_triangle(
    origin: Vec3,
    direction: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<(f32, f32, f32)> {
    let edge1 = b - a;
    let edge2 = c - a;
    let h = direction.cross(edge2);
    let det = edge1.dot(h);

    if det.abs() <= PARALLEL_EPSILON * edge1.length() * h.length() {
        return None; // Ray is parallel to triangle
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    Some((t, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> TriMesh {
        TriMesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        )
        .expect("valid mesh")
    }

    /// Two parallel triangles at z = 0 and z = -1, listed far-first.
    fn stacked_triangles() -> TriMesh {
        TriMesh::new(
            vec![
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
                Vec3::ZERO,
                Vec3::X,
                Vec3::Y,
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        )
        .expect("valid mesh")
    }

    #[test]
    fn moller_trumbore_reports_barycentrics() {
        let (t, u, v) = intersect_triangle(
            Vec3::new(0.2, 0.2, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        )
        .expect("ray should hit");
        assert!((t - 5.0).abs() < 1e-6);
        assert!((u - 0.2).abs() < 1e-6);
        assert!((v - 0.2).abs() < 1e-6);
    }

    #[test]
    fn moller_trumbore_misses_outside_and_parallel() {
        let outside = intersect_triangle(
            Vec3::new(0.8, 0.8, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(outside.is_none());

        let parallel = intersect_triangle(
            Vec3::new(0.2, 0.2, 1.0),
            Vec3::X,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(parallel.is_none());
    }

    #[test]
    fn single_hit_takes_two_shots() {
        let intersector = MeshIntersector::new(single_triangle());
        let mut hits = Vec::new();
        let shots = intersector.intersect_ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(shots, 2);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 0);
        assert!((hits[0].t - 5.0).abs() < 1e-6);
    }

    #[test]
    fn hits_are_ordered_by_distance() {
        let intersector = MeshIntersector::new(stacked_triangles());
        let mut hits = Vec::new();
        let shots = intersector.intersect_ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(shots, 3);
        let ids: Vec<u32> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert!(hits[0].t < hits[1].t);
    }

    #[test]
    fn miss_leaves_hits_empty() {
        let intersector = MeshIntersector::new(single_triangle());
        let mut hits = Vec::new();
        let shots = intersector.intersect_ray(Vec3::new(3.0, 3.0, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(shots, 1);
        assert!(hits.is_empty());
    }

    #[test]
    fn empty_mesh_shoots_nothing() {
        let mesh = TriMesh::new(Vec::new(), Vec::new()).expect("valid mesh");
        let intersector = MeshIntersector::new(mesh);
        let mut hits = Vec::new();
        assert_eq!(intersector.intersect_ray(Vec3::ZERO, Vec3::NEG_Z, &mut hits), 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn tfar_excludes_distant_triangles() {
        let options = IntersectOptions {
            tfar: 5.5,
            ..IntersectOptions::default()
        };
        let intersector = MeshIntersector::with_options(stacked_triangles(), options);
        let mut hits = Vec::new();
        intersector.intersect_ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn shot_limit_caps_the_query() {
        let options = IntersectOptions {
            max_shots: 1,
            ..IntersectOptions::default()
        };
        let intersector = MeshIntersector::with_options(stacked_triangles(), options);
        let mut hits = Vec::new();
        let shots = intersector.intersect_ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(shots, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn appends_without_clearing() {
        let intersector = MeshIntersector::new(single_triangle());
        let mut hits = vec![Hit::new(9.0, 0.0, 0.0, 42)];
        intersector.intersect_ray(Vec3::new(0.2, 0.2, 5.0), Vec3::NEG_Z, &mut hits);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 42);
    }
}
