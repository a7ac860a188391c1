//! Rays and the intersection records a ray query produces.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A world-space ray.
///
/// The direction is deliberately left unnormalized: a ray built from a near
/// and a far unprojected point spans the whole view frustum for `t` in
/// `[0, 1]`, and hit distances are measured in multiples of `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin of the ray in world space.
    pub origin: Vec3,
    /// Direction of the ray (not necessarily unit length).
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray passing from `from` through `to`.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    /// Evaluate the ray at parameter `t`: `origin + direction * t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One recorded ray-triangle intersection.
///
/// `u` and `v` are the barycentric weights of corners 1 and 2; corner 0
/// carries the implied weight `1 - u - v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Signed distance along the ray, in units of the ray direction.
    pub t: f32,
    /// Barycentric weight of corner 1.
    pub u: f32,
    /// Barycentric weight of corner 2.
    pub v: f32,
    /// Index of the hit triangle in the mesh face table.
    pub id: u32,
}

impl Hit {
    /// Create a new hit record.
    pub fn new(t: f32, u: f32, v: f32, id: u32) -> Self {
        Self { t, u, v, id }
    }

    /// Barycentric weights for corners 0, 1 and 2: `(1 - u - v, u, v)`.
    pub fn barycentric(&self) -> [f32; 3] {
        [1.0 - self.u - self.v, self.u, self.v]
    }

    /// Corner of the hit triangle carrying the largest barycentric weight.
    ///
    /// Exact ties resolve to the lowest corner index.
    pub fn nearest_corner(&self) -> usize {
        let weights = self.barycentric();
        let mut best = 0;
        for (corner, &weight) in weights.iter().enumerate().skip(1) {
            if weight > weights[best] {
                best = corner;
            }
        }
        best
    }

    /// Whether the barycentric coordinates lie inside or on the triangle,
    /// allowing `tolerance` of slack on each bound.
    pub fn is_inside(&self, tolerance: f32) -> bool {
        self.u >= -tolerance && self.v >= -tolerance && self.u + self.v <= 1.0 + tolerance
    }
}
