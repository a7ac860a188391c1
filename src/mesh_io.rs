//! Mesh file loading: a JSON index list and a Wavefront OBJ subset.

use glam::Vec3;
use meshpick_core::{MeshError, TriMesh};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading a mesh file.
#[derive(Debug, Error)]
pub enum MeshLoadError {
    /// Wrap IO errors when reading the file.
    #[error("failed to read mesh: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues for JSON meshes.
    #[error("failed to parse mesh JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed OBJ statement.
    #[error("OBJ line {line}: {message}")]
    Obj {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// File extension is neither `.json` nor `.obj`.
    #[error("unsupported mesh format {0:?} (expected .json or .obj)")]
    UnknownFormat(String),
    /// Parsed geometry failed mesh validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[derive(Debug, Deserialize)]
struct JsonMesh {
    positions: Vec<[f32; 3]>,
    faces: Vec<[u32; 3]>,
}

/// Load a mesh, picking the parser from the file extension.
pub fn load_mesh(path: &Path) -> Result<TriMesh, MeshLoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let contents = fs::read_to_string(path)?;
    let mesh = match extension.as_str() {
        "json" => load_json_str(&contents)?,
        "obj" => load_obj_str(&contents)?,
        _ => return Err(MeshLoadError::UnknownFormat(extension)),
    };
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Parse `{"positions": [[x, y, z], ...], "faces": [[a, b, c], ...]}`.
pub fn load_json_str(input: &str) -> Result<TriMesh, MeshLoadError> {
    let raw: JsonMesh = serde_json::from_str(input)?;
    let positions = raw.positions.into_iter().map(Vec3::from_array).collect();
    Ok(TriMesh::new(positions, raw.faces)?)
}

/// Parse the `v` and `f` statements of a Wavefront OBJ file.
///
/// Polygons are fan-triangulated around their first corner. Face corners may
/// use the `v`, `v/vt`, `v//vn` and `v/vt/vn` forms; negative indices count
/// back from the most recent vertex. Every other statement is ignored.
pub fn load_obj_str(input: &str) -> Result<TriMesh, MeshLoadError> {
    let mut positions = Vec::new();
    let mut faces = Vec::new();
    let mut skipped = 0usize;

    for (index, raw_line) in input.lines().enumerate() {
        let line = index + 1;
        let statement = raw_line.split('#').next().unwrap_or_default().trim();
        let mut tokens = statement.split_whitespace();
        match tokens.next() {
            None => {}
            Some("v") => {
                let coords = tokens
                    .take(3)
                    .map(|token| token.parse::<f32>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|err| obj_error(line, format!("bad vertex coordinate: {err}")))?;
                let [x, y, z] = coords[..] else {
                    return Err(obj_error(line, "vertex needs three coordinates"));
                };
                positions.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let corners = tokens
                    .map(|token| obj_vertex_index(token, positions.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(obj_error(line, "face needs at least three corners"));
                }
                for pair in corners[1..].windows(2) {
                    faces.push([corners[0], pair[0], pair[1]]);
                }
            }
            Some(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(skipped, "ignored unsupported OBJ statements");
    }
    if faces.is_empty() {
        warn!(vertices = positions.len(), "OBJ file has no faces");
    }
    Ok(TriMesh::new(positions, faces)?)
}

/// Resolve one face corner token to a 0-based vertex id.
fn obj_vertex_index(token: &str, vertex_count: usize, line: usize) -> Result<u32, MeshLoadError> {
    let position = token.split('/').next().unwrap_or_default();
    let index: i64 = position
        .parse()
        .map_err(|_| obj_error(line, format!("bad face corner {token:?}")))?;

    let resolved = match index {
        0 => return Err(obj_error(line, "face index 0 is invalid (OBJ is 1-based)")),
        i if i > 0 => i - 1,
        i => vertex_count as i64 + i,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return Err(obj_error(
            line,
            format!("face corner {token:?} is outside the {vertex_count} vertices seen so far"),
        ));
    }
    u32::try_from(resolved).map_err(|_| obj_error(line, format!("face corner {token:?} too large")))
}

fn obj_error(line: usize, message: impl Into<String>) -> MeshLoadError {
    MeshLoadError::Obj {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_mesh_loads() {
        let mesh = load_json_str(
            r#"{"positions": [[0,0,0],[1,0,0],[0,1,0]], "faces": [[0,1,2]]}"#,
        )
        .expect("valid mesh");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn json_mesh_with_bad_index_is_rejected() {
        let err = load_json_str(r#"{"positions": [[0,0,0]], "faces": [[0,1,2]]}"#)
            .expect_err("index out of range");
        assert!(matches!(
            err,
            MeshLoadError::Mesh(MeshError::VertexOutOfRange { vertex: 1, .. })
        ));
    }

    #[test]
    fn obj_quad_is_fan_triangulated() {
        let obj = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";
        let mesh = load_obj_str(obj).expect("valid obj");
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn obj_negative_and_slash_indices() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf -3/1 -2/1/1 -1\n";
        let mesh = load_obj_str(obj).expect("valid obj");
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn obj_errors_carry_line_numbers() {
        let err = load_obj_str("v 0 0 0\nv 1 0\n").expect_err("short vertex");
        assert!(matches!(err, MeshLoadError::Obj { line: 2, .. }));

        let err = load_obj_str("v 0 0 0\nf 1 2 3\n").expect_err("forward reference");
        assert!(matches!(err, MeshLoadError::Obj { line: 2, .. }));

        let err = load_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").expect_err("zero index");
        assert!(err.to_string().contains("1-based"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "meshpick_unknown_{}.ply",
            std::process::id()
        ));
        fs::write(&path, "ply").expect("write");
        let err = load_mesh(&path).expect_err("unsupported");
        assert!(matches!(err, MeshLoadError::UnknownFormat(ref ext) if ext == "ply"));
        let _ = fs::remove_file(&path);
    }
}
