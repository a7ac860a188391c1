//! An intersector that replays a fixed hit list.

use std::cell::Cell;

use glam::Vec3;
use meshpick_core::{Hit, Ray, RayIntersector};

/// Returns the same hits, in the same order, for every ray it is given.
///
/// Lets tests control hit ordering independently of geometry and inspect
/// the ray a query actually shot.
#[derive(Debug, Default)]
pub struct ScriptedIntersector {
    hits: Vec<Hit>,
    rays_shot: u32,
    calls: Cell<usize>,
    last_ray: Cell<Option<Ray>>,
}

impl ScriptedIntersector {
    /// Replay `hits` on every query, reporting one ray shot.
    pub fn new(hits: Vec<Hit>) -> Self {
        Self {
            hits,
            rays_shot: 1,
            ..Default::default()
        }
    }

    /// An intersector that never hits anything.
    pub fn miss() -> Self {
        Self::new(Vec::new())
    }

    /// Report `rays_shot` instead of one.
    pub fn with_rays_shot(mut self, rays_shot: u32) -> Self {
        self.rays_shot = rays_shot;
        self
    }

    /// Number of queries answered so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// The most recent ray queried.
    pub fn last_ray(&self) -> Option<Ray> {
        self.last_ray.get()
    }
}

impl RayIntersector for ScriptedIntersector {
    fn intersect_ray(&self, origin: Vec3, direction: Vec3, hits: &mut Vec<Hit>) -> u32 {
        self.calls.set(self.calls.get() + 1);
        self.last_ray.set(Some(Ray::new(origin, direction)));
        hits.extend_from_slice(&self.hits);
        self.rays_shot
    }
}
