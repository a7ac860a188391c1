//! End-to-end pick scenarios: camera -> ray -> intersector -> resolver.

use glam::{DVec3, IVec2, Mat4, Vec2, Vec3};
use meshpick_camera::{project, Camera, CameraState, Viewport};
use meshpick_picking::{
    estimate_point, resolve_vertex, unproject_in_mesh, unproject_in_mesh_explicit,
    unproject_in_mesh_with_hits, unproject_vertex_in_mesh, unproject_vertex_in_mesh_with, Hit,
    HitSelection, MeshIntersector, Ray, RayIntersector, VertexPick,
};
use meshpick_testkit::{
    assert_vec3_near, init_tracing, single_triangle, stacked_quads, unit_cube,
    ScriptedIntersector,
};

/// Orthographic camera looking down -Z from z = 5 over `[-2, 2]^2`, 400x400 pixels.
fn ortho_down() -> CameraState {
    CameraState::new(
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y),
        Mat4::orthographic_rh_gl(-2.0, 2.0, -2.0, 2.0, 0.1, 100.0),
        Viewport::from_size(400, 400),
    )
}

fn perspective() -> CameraState {
    Camera::default().state(Viewport::from_size(640, 480))
}

#[test]
fn single_triangle_scenario_from_raw_ray() {
    init_tracing();
    let mesh = single_triangle();
    let intersector = MeshIntersector::new(mesh.clone());
    let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::new(0.0, 0.0, -1.0));

    let mut hits = Vec::new();
    intersector.intersect_ray(ray.origin, ray.direction, &mut hits);
    assert_eq!(hits.len(), 1);
    let hit = hits[0];
    assert!((hit.t - 5.0).abs() < 1e-5);
    assert!((hit.u - 0.2).abs() < 1e-5);
    assert!((hit.v - 0.2).abs() < 1e-5);
    assert_eq!(hit.id, 0);

    let pick = estimate_point(&ray, &hits);
    assert_eq!(pick.hit_count, 1);
    assert_vec3_near(pick.point.expect("hit"), Vec3::new(0.2, 0.2, 0.0), 1e-5);

    let [w0, w1, w2] = hit.barycentric();
    assert!((w0 - 0.6).abs() < 1e-5 && (w1 - 0.2).abs() < 1e-5 && (w2 - 0.2).abs() < 1e-5);
    let vertex = resolve_vertex(&hit, &mesh).expect("vertex resolves");
    assert_eq!(
        vertex,
        VertexPick {
            triangle_id: 0,
            vertex_id: 0,
            corner: 0,
        }
    );
}

#[test]
fn single_triangle_scenario_through_the_camera() {
    init_tracing();
    let mesh = single_triangle();
    let intersector = MeshIntersector::new(mesh.clone());
    let camera = perspective();
    let target = Vec3::new(0.2, 0.2, 0.0);
    let win = camera.project(target);

    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(
        win.truncate(),
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
        &mut hits,
    );
    assert_eq!(pick.hit_count, 1);
    assert_vec3_near(pick.point.expect("hit"), target, 1e-3);

    let vertex = unproject_vertex_in_mesh(
        win.truncate(),
        &mesh,
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
    )
    .expect("vertex pick succeeds");
    assert_eq!((vertex.triangle_id, vertex.vertex_id), (0, 0));
}

#[test]
fn clicking_near_a_corner_snaps_to_it() {
    let mesh = single_triangle();
    let intersector = MeshIntersector::new(mesh.clone());
    let camera = perspective();

    for (corner_point, expected_vertex) in [
        (Vec3::new(0.8, 0.1, 0.0), 1),
        (Vec3::new(0.1, 0.8, 0.0), 2),
        (Vec3::new(0.05, 0.05, 0.0), 0),
    ] {
        let win = camera.project(corner_point).truncate();
        let vertex = unproject_vertex_in_mesh(
            win,
            &mesh,
            &camera.view,
            &camera.proj,
            &camera.viewport,
            &intersector,
        )
        .expect("vertex pick succeeds");
        assert_eq!(vertex.vertex_id, expected_vertex, "near {corner_point}");
    }
}

#[test]
fn closed_cube_pick_averages_front_and_back_walls() {
    let intersector = MeshIntersector::new(unit_cube());
    let camera = perspective();
    let entry = Vec3::new(0.1, -0.2, 0.5);
    let win = camera.project(entry).truncate();

    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(
        win,
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
        &mut hits,
    );
    assert_eq!(pick.hit_count, 2);
    assert!(hits[0].t < hits[1].t);

    // The ray runs from the eye at (0, 0, 5) through `entry`; it leaves the
    // cube at z = -0.5.
    let exit = Vec3::new(0.1 * 5.5 / 4.5, -0.2 * 5.5 / 4.5, -0.5);
    assert_vec3_near(pick.point.expect("hit"), (entry + exit) * 0.5, 1e-3);
}

#[test]
fn legacy_pixel_pick_on_cube_lands_inside() {
    let intersector = MeshIntersector::new(unit_cube());
    let camera = perspective();

    let mut hits = Vec::new();
    let pick = unproject_in_mesh_with_hits(IVec2::new(335, 250), &camera, &intersector, &mut hits);
    assert_eq!(pick.hit_count, 2);
    assert_eq!(hits.len(), 2);
    let point = pick.point.expect("hit");
    assert!(point.z.abs() < 1e-3, "midpoint should sit mid-cube, got {point}");
    assert!(point.x > 0.0 && point.y > 0.0);

    let plain = unproject_in_mesh(IVec2::new(335, 250), &camera, &intersector);
    assert_eq!(plain, pick);
}

#[test]
fn stacked_quads_report_every_hit_but_average_two() {
    let intersector = MeshIntersector::new(stacked_quads(4, 1.0));
    let camera = ortho_down();

    // World (0.3, 0.1) sits at window (230, 210) in this camera
    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(
        Vec2::new(230.0, 210.0),
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
        &mut hits,
    );
    assert_eq!(pick.hit_count, 4);
    assert_vec3_near(pick.point.expect("hit"), Vec3::new(0.3, 0.1, -0.5), 1e-3);

    assert!(hits.windows(2).all(|pair| pair[0].t < pair[1].t));
    let quads: Vec<u32> = hits.iter().map(|hit| hit.id / 2).collect();
    assert_eq!(quads, vec![0, 1, 2, 3]);
}

#[test]
fn miss_leaves_caller_point_untouched() {
    let intersector = MeshIntersector::new(single_triangle());
    let camera = perspective();

    // Far corner of the window looks well away from the triangle
    let pick = unproject_in_mesh(IVec2::new(5, 5), &camera, &intersector);
    let mut out = DVec3::new(1.0, 2.0, 3.0);
    assert_eq!(pick.write_into(&mut out), 0);
    assert_eq!(out, DVec3::new(1.0, 2.0, 3.0));

    let win = Vec2::new(5.0, 5.0);
    let vertex = unproject_vertex_in_mesh(
        win,
        &single_triangle(),
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
    );
    assert!(vertex.is_none());
}

#[test]
fn scripted_order_is_respected_not_sorted() {
    let camera = ortho_down();
    let faces = stacked_quads(3, 1.0);
    // Deliberately out of distance order: the far quad is listed first
    let intersector = ScriptedIntersector::new(vec![
        Hit::new(0.07, 0.1, 0.1, 4),
        Hit::new(0.05, 0.1, 0.1, 0),
        Hit::new(0.06, 0.1, 0.1, 2),
    ]);

    let mut hits = Vec::new();
    let pick = unproject_in_mesh_explicit(
        Vec2::new(230.0, 210.0),
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
        &mut hits,
    );
    assert_eq!(pick.hit_count, 3);
    let ray = intersector.last_ray().expect("ray was shot");
    let expected = (ray.at(0.07) + ray.at(0.05)) * 0.5;
    assert_vec3_near(pick.point.expect("hit"), expected, 1e-6);

    let first = unproject_vertex_in_mesh(
        Vec2::new(230.0, 210.0),
        &faces,
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
    )
    .expect("first listed hit resolves");
    assert_eq!(first.triangle_id, 4);
    assert_eq!(first.vertex_id, 8);

    let nearest = unproject_vertex_in_mesh_with(
        HitSelection::Nearest,
        Vec2::new(230.0, 210.0),
        &faces,
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
    )
    .expect("nearest hit resolves");
    assert_eq!(nearest.triangle_id, 0);
    assert_eq!(nearest.vertex_id, 0);
}

#[test]
fn each_query_shoots_exactly_once() {
    let camera = perspective();
    let intersector = ScriptedIntersector::new(vec![Hit::new(0.1, 0.0, 0.0, 0)]).with_rays_shot(7);
    let first = unproject_in_mesh(IVec2::new(12, 34), &camera, &intersector);
    let first_ray = intersector.last_ray().expect("ray was shot");
    let second = unproject_in_mesh(IVec2::new(12, 34), &camera, &intersector);
    let second_ray = intersector.last_ray().expect("ray was shot");

    assert_eq!(intersector.calls(), 2);
    assert_eq!(first, second);
    assert_eq!(first_ray, second_ray);
}

#[test]
fn zero_to_one_depth_camera_picks_the_same_point() {
    let intersector = MeshIntersector::new(unit_cube());
    let gl = perspective();
    let wgpu_style = Camera {
        clip_depth: meshpick_camera::ClipDepth::ZeroToOne,
        ..Camera::default()
    }
    .state(Viewport::from_size(640, 480));

    let a = unproject_in_mesh(IVec2::new(335, 250), &gl, &intersector);
    let b = unproject_in_mesh(IVec2::new(335, 250), &wgpu_style, &intersector);
    assert_eq!(a.hit_count, b.hit_count);
    assert_vec3_near(a.point.expect("hit"), b.point.expect("hit"), 1e-3);
    let win = project(a.point.expect("hit"), &gl.view, &gl.proj, &gl.viewport);
    assert!((win.x - 335.0).abs() < 0.05 && (win.y - 250.0).abs() < 0.05);
}

#[test]
fn empty_hit_list_fails_vertex_pick_and_clears_scratch() {
    let camera = perspective();
    let intersector = ScriptedIntersector::miss();
    let mut hits = vec![Hit::new(1.0, 0.2, 0.2, 0)];

    let pick = unproject_in_mesh_with_hits(IVec2::new(320, 240), &camera, &intersector, &mut hits);
    assert_eq!(pick.hit_count, 0);
    assert!(pick.point.is_none());
    assert!(hits.is_empty());

    let vertex = unproject_vertex_in_mesh(
        Vec2::new(320.0, 240.0),
        &single_triangle(),
        &camera.view,
        &camera.proj,
        &camera.viewport,
        &intersector,
    );
    assert!(vertex.is_none());
    assert_eq!(intersector.calls(), 2);
}
