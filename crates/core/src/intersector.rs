//! The ray-intersection capability a pick query consumes.

use glam::Vec3;

use crate::Hit;

/// An acceleration structure able to answer "every triangle this ray crosses".
///
/// Implementations append one [`Hit`] per intersection to `hits` and return
/// how many rays they shot internally to produce them (retries, re-shots past
/// a previous hit, and so on). Callers clear `hits` before the call and never
/// interpret the shot count beyond diagnostics.
///
/// The order of the appended hits is the implementation's discovery order.
/// Callers must not assume it is sorted by `t` unless the implementation
/// documents that guarantee.
pub trait RayIntersector {
    /// Intersect the ray `origin + t * direction` with the mesh.
    fn intersect_ray(&self, origin: Vec3, direction: Vec3, hits: &mut Vec<Hit>) -> u32;
}

impl<T: RayIntersector + ?Sized> RayIntersector for &T {
    fn intersect_ray(&self, origin: Vec3, direction: Vec3, hits: &mut Vec<Hit>) -> u32 {
        (**self).intersect_ray(origin, direction, hits)
    }
}

impl<T: RayIntersector + ?Sized> RayIntersector for Box<T> {
    fn intersect_ray(&self, origin: Vec3, direction: Vec3, hits: &mut Vec<Hit>) -> u32 {
        (**self).intersect_ray(origin, direction, hits)
    }
}
