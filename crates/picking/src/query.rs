//! Screen-space pick entry points.
//!
//! Every query follows the same path: unproject the screen position at the
//! near (depth 0) and far (depth 1) planes, shoot the ray between them
//! through a [`RayIntersector`], then resolve the hit list.

use glam::{IVec2, Mat4, Vec2};
use meshpick_camera::{unproject, CameraState, Viewport};
use meshpick_core::{FaceTable, Hit, Ray, RayIntersector};
use tracing::debug;

use crate::resolve::{estimate_point, resolve_vertex, HitSelection, PointPick, VertexPick};

/// World-space ray through window position `screen_pos`.
///
/// The origin lies on the near plane and `direction` spans to the far plane.
pub fn screen_ray(screen_pos: Vec2, model: &Mat4, proj: &Mat4, viewport: &Viewport) -> Ray {
    let near = unproject(screen_pos.extend(0.0), model, proj, viewport);
    let far = unproject(screen_pos.extend(1.0), model, proj, viewport);
    Ray::between(near, far)
}

/// World-space ray through pixel `pixel` of the frame described by `camera`.
pub fn camera_ray(pixel: IVec2, camera: &CameraState) -> Ray {
    screen_ray(pixel.as_vec2(), &camera.view, &camera.proj, &camera.viewport)
}

fn shoot<I: RayIntersector + ?Sized>(ray: &Ray, intersector: &I, hits: &mut Vec<Hit>) -> PointPick {
    hits.clear();
    let rays_shot = intersector.intersect_ray(ray.origin, ray.direction, hits);
    debug!(hits = hits.len(), rays_shot, "pick ray query finished");
    estimate_point(ray, hits)
}

/// Pick a point on the mesh under pixel `pixel`.
pub fn unproject_in_mesh<I: RayIntersector + ?Sized>(
    pixel: IVec2,
    camera: &CameraState,
    intersector: &I,
) -> PointPick {
    let mut hits = Vec::new();
    unproject_in_mesh_with_hits(pixel, camera, intersector, &mut hits)
}

/// Like [`unproject_in_mesh`], also handing back the raw hit list.
///
/// `hits` is cleared before the query.
pub fn unproject_in_mesh_with_hits<I: RayIntersector + ?Sized>(
    pixel: IVec2,
    camera: &CameraState,
    intersector: &I,
    hits: &mut Vec<Hit>,
) -> PointPick {
    shoot(&camera_ray(pixel, camera), intersector, hits)
}

/// Pick a point on the mesh at sub-pixel position `screen_pos` with
/// explicit model-view, projection and viewport.
///
/// `hits` is cleared before the query and receives the raw hit list.
pub fn unproject_in_mesh_explicit<I: RayIntersector + ?Sized>(
    screen_pos: Vec2,
    model: &Mat4,
    proj: &Mat4,
    viewport: &Viewport,
    intersector: &I,
    hits: &mut Vec<Hit>,
) -> PointPick {
    shoot(&screen_ray(screen_pos, model, proj, viewport), intersector, hits)
}

/// Snap the pick at `screen_pos` to the nearest vertex of the first hit triangle.
///
/// "First" means the first entry of the intersector's hit list, which is
/// only the nearest triangle when the intersector orders hits by distance.
/// Use [`unproject_vertex_in_mesh_with`] and [`HitSelection::Nearest`] to
/// select by distance regardless of intersector ordering.
pub fn unproject_vertex_in_mesh<F, I>(
    screen_pos: Vec2,
    faces: &F,
    model: &Mat4,
    proj: &Mat4,
    viewport: &Viewport,
    intersector: &I,
) -> Option<VertexPick>
where
    F: FaceTable + ?Sized,
    I: RayIntersector + ?Sized,
{
    unproject_vertex_in_mesh_with(
        HitSelection::First,
        screen_pos,
        faces,
        model,
        proj,
        viewport,
        intersector,
    )
}

/// Vertex pick with an explicit hit selection policy.
pub fn unproject_vertex_in_mesh_with<F, I>(
    selection: HitSelection,
    screen_pos: Vec2,
    faces: &F,
    model: &Mat4,
    proj: &Mat4,
    viewport: &Viewport,
    intersector: &I,
) -> Option<VertexPick>
where
    F: FaceTable + ?Sized,
    I: RayIntersector + ?Sized,
{
    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(screen_pos, model, proj, viewport, intersector, &mut hits);
    if !pick.is_hit() {
        return None;
    }
    let hit = selection.select(&hits)?;
    resolve_vertex(hit, faces)
}
