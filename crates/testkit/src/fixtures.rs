//! Small meshes with known geometry.

use glam::Vec3;
use meshpick_core::TriMesh;

fn build(positions: Vec<Vec3>, faces: Vec<[u32; 3]>) -> TriMesh {
    TriMesh::new(positions, faces).expect("fixture mesh is valid")
}

/// One triangle: V0 = (0,0,0), V1 = (1,0,0), V2 = (0,1,0), face 0 = (V0, V1, V2).
pub fn single_triangle() -> TriMesh {
    build(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]])
}

/// Closed axis-aligned cube spanning `[-0.5, 0.5]` on every axis.
///
/// Faces are listed -Z, +Z, -X, +X, -Y, +Y, two triangles each.
pub fn unit_cube() -> TriMesh {
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
    ];
    build(positions, faces)
}

/// `count` parallel quads covering `[-1, 1]` in x and y, at
/// `z = 0, -spacing, -2 * spacing, ...`.
///
/// Quad `i` is made of triangles `2i` and `2i + 1`.
pub fn stacked_quads(count: usize, spacing: f32) -> TriMesh {
    let mut positions = Vec::with_capacity(count * 4);
    let mut faces = Vec::with_capacity(count * 2);
    for layer in 0..count {
        let z = -(layer as f32) * spacing;
        let base = positions.len() as u32;
        positions.extend([
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(-1.0, 1.0, z),
        ]);
        faces.push([base, base + 1, base + 2]);
        faces.push([base, base + 2, base + 3]);
    }
    build(positions, faces)
}
