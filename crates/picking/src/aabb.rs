//! Axis-aligned bounds used to reject rays that miss a whole mesh.

use glam::Vec3;
use meshpick_core::TriMesh;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box.
    pub min: Vec3,
    /// Maximum corner of the box.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Bounds of every triangle in `mesh`, or `None` for an empty mesh.
    pub fn from_mesh(mesh: &TriMesh) -> Option<Self> {
        mesh.bounds().map(|(min, max)| Self::new(min, max))
    }

    /// Grow the box by `margin` on every side.
    ///
    /// Planar meshes produce zero-thickness boxes; a small margin keeps the
    /// slab test from rejecting rays that graze them.
    pub fn expanded(self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Parameter interval `(t_enter, t_exit)` over which the ray
    /// `origin + t * direction` lies inside the box, clipped to `[tnear, tfar]`.
    ///
    /// Returns `None` when the ray misses the box inside that range. Zero
    /// direction components produce infinite slab distances, which the
    /// min/max reductions absorb.
    pub fn ray_interval(
        &self,
        origin: Vec3,
        direction: Vec3,
        tnear: f32,
        tfar: f32,
    ) -> Option<(f32, f32)> {
        let inv_dir = direction.recip();

        let t1 = (self.min - origin) * inv_dir;
        let t2 = (self.max - origin) * inv_dir;

        let t_enter = t1.min(t2).max_element().max(tnear);
        let t_exit = t1.max(t2).min_element().min(tfar);

        // Empty interval: the ray misses, or the box is outside [tnear, tfar]
        if t_enter > t_exit {
            return None;
        }

        Some((t_enter, t_exit))
    }
}
