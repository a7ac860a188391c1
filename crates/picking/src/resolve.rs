//! Hit resolution: turn a hit list into a pick point or a picked vertex.

use glam::{DVec3, Vec3};
use meshpick_core::{FaceTable, Hit, Ray};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Output container a resolved pick point can be converted into.
///
/// Resolution happens in single precision; implementors perform the cast to
/// their own scalar type at this boundary.
pub trait PickPoint: Sized {
    /// Convert a world-space point.
    fn from_world(point: Vec3) -> Self;
}

impl PickPoint for Vec3 {
    fn from_world(point: Vec3) -> Self {
        point
    }
}

impl PickPoint for DVec3 {
    fn from_world(point: Vec3) -> Self {
        point.as_dvec3()
    }
}

impl PickPoint for [f32; 3] {
    fn from_world(point: Vec3) -> Self {
        point.to_array()
    }
}

impl PickPoint for [f64; 3] {
    fn from_world(point: Vec3) -> Self {
        point.as_dvec3().to_array()
    }
}

/// Result of a point pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPick {
    /// Estimated world-space point, `None` when the ray hit nothing.
    pub point: Option<Vec3>,
    /// Total number of hits the query produced (not capped at two).
    pub hit_count: usize,
}

impl PointPick {
    /// A pick that hit nothing.
    pub fn miss() -> Self {
        Self {
            point: None,
            hit_count: 0,
        }
    }

    /// Whether the ray hit the mesh at all.
    pub fn is_hit(&self) -> bool {
        self.hit_count > 0
    }

    /// The point converted to the caller's representation.
    pub fn point_as<P: PickPoint>(&self) -> Option<P> {
        self.point.map(P::from_world)
    }

    /// Write the point into `out` and return the hit count.
    ///
    /// `out` is left untouched when nothing was hit, so callers that
    /// pre-initialize it keep their default.
    pub fn write_into<P: PickPoint>(&self, out: &mut P) -> usize {
        if let Some(point) = self.point {
            *out = P::from_world(point);
        }
        self.hit_count
    }
}

/// Collapse a hit list into a single point along `ray`.
///
/// - no hits: no point
/// - one hit: the hit position
/// - two or more: the midpoint of the first two entries *as listed*; later
///   hits are ignored. On a closed surface the first pair brackets the near
///   and far walls, so the midpoint sits inside the solid.
pub fn estimate_point(ray: &Ray, hits: &[Hit]) -> PointPick {
    let point = match hits {
        [] => None,
        [only] => Some(ray.at(only.t)),
        [first, second, ..] => Some(0.5 * (ray.at(first.t) + ray.at(second.t))),
    };
    PointPick {
        point,
        hit_count: hits.len(),
    }
}

/// Which hit a vertex pick snaps to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitSelection {
    /// First entry of the hit list, whatever order the intersector used.
    #[default]
    First,
    /// Smallest non-negative `t`; falls back to the first entry when every
    /// hit lies behind the ray origin.
    Nearest,
}

impl HitSelection {
    /// Select a hit from `hits`.
    pub fn select(self, hits: &[Hit]) -> Option<&Hit> {
        match self {
            HitSelection::First => hits.first(),
            HitSelection::Nearest => hits
                .iter()
                .filter(|hit| hit.t >= 0.0)
                .min_by(|a, b| a.t.total_cmp(&b.t))
                .or_else(|| hits.first()),
        }
    }
}

/// Result of a vertex pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexPick {
    /// Triangle the selected hit landed on.
    pub triangle_id: u32,
    /// Vertex of that triangle nearest (by barycentric weight) to the hit.
    pub vertex_id: u32,
    /// Corner of the triangle the vertex sits at (0, 1 or 2).
    pub corner: usize,
}

/// Snap `hit` to the corner of its triangle with the largest barycentric weight.
///
/// Returns `None` if the face table has no entry for the hit triangle.
pub fn resolve_vertex<F: FaceTable + ?Sized>(hit: &Hit, faces: &F) -> Option<VertexPick> {
    let corner = hit.nearest_corner();
    let Some(vertex_id) = faces.corner(hit.id, corner) else {
        warn!(
            triangle = hit.id,
            face_count = faces.face_count(),
            "hit triangle missing from face table"
        );
        return None;
    };
    Some(VertexPick {
        triangle_id: hit.id,
        vertex_id,
        corner,
    })
}
