//! Wavefront OBJ vertex import for model actors.
//!
//! Only positions and faces are read. Faces are fanned into triangles and the
//! result is a flat triangle list, three vertices per triangle, which is what
//! colliders and the triangle count in the stats line expect.

use std::path::Path;

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Prefix of generated cube meshes, followed by the edge length
pub const CUBE_PRESET_PREFIX: &str = "preset:cube:";

/// Resource path of a generated cube with edge `size`
pub fn cube_preset_path(size: f32) -> String {
    format!("{CUBE_PRESET_PREFIX}{}", shared::text::format_float(size))
}

/// Resolve a vertex data path: a cube preset or an OBJ file on disk.
pub fn load_mesh(path: &str) -> Result<Vec<Vec3>, MeshError> {
    match path.strip_prefix(CUBE_PRESET_PREFIX) {
        Some(size) => {
            let size: f32 = size
                .trim()
                .parse()
                .map_err(|_| parse_error(0, &format!("invalid cube size '{size}'")))?;
            Ok(cube(size))
        }
        None => load_obj(Path::new(path)),
    }
}

/// Axis aligned cube centred on the origin, 12 triangles
pub fn cube(size: f32) -> Vec<Vec3> {
    let h = size * 0.5;
    let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h, y * h, z * h);
    // Quads as (a, b, c, d), fanned to (a, b, c) and (a, c, d)
    let quads = [
        [(-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.), (1., -1., -1.)],
        [(1., -1., 1.), (1., 1., 1.), (-1., 1., 1.), (-1., -1., 1.)],
        [(-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.), (-1., -1., -1.)],
        [(1., -1., -1.), (1., 1., -1.), (1., 1., 1.), (1., -1., 1.)],
        [(-1., 1., -1.), (-1., 1., 1.), (1., 1., 1.), (1., 1., -1.)],
        [(-1., -1., 1.), (-1., -1., -1.), (1., -1., -1.), (1., -1., 1.)],
    ];

    let mut vertices = Vec::with_capacity(36);
    for quad in quads {
        let [a, b, c, d] = quad.map(|(x, y, z)| corner(x, y, z));
        vertices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    vertices
}

/// Load the triangle list of an OBJ file
pub fn load_obj(path: &Path) -> Result<Vec<Vec3>, MeshError> {
    let contents = std::fs::read_to_string(path)?;
    parse_obj(&contents)
}

/// Parse OBJ text into a triangle list
pub fn parse_obj(contents: &str) -> Result<Vec<Vec3>, MeshError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<Vec3> = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "vertex needs 3 coordinates"));
                }
                let x = parse_float(parts[1], line_num)?;
                let y = parse_float(parts[2], line_num)?;
                let z = parse_float(parts[3], line_num)?;
                positions.push(Vec3::new(x, y, z));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "face needs at least 3 vertices"));
                }
                let corners = parts[1..]
                    .iter()
                    .map(|corner| resolve_index(corner, positions.len(), line_num))
                    .collect::<Result<Vec<usize>, MeshError>>()?;
                for i in 1..corners.len() - 1 {
                    triangles.push(positions[corners[0]]);
                    triangles.push(positions[corners[i]]);
                    triangles.push(positions[corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(triangles)
}

/// Resolve a face corner (`7`, `7/1`, `7//3`, `-1`) to a zero-based position index.
fn resolve_index(corner: &str, count: usize, line_num: usize) -> Result<usize, MeshError> {
    let raw = corner.split('/').next().unwrap_or(corner);
    let index: i64 = raw
        .parse()
        .map_err(|_| parse_error(line_num, &format!("invalid face index '{corner}'")))?;

    let resolved = if index < 0 {
        count as i64 + index
    } else {
        index - 1
    };
    if resolved < 0 || resolved >= count as i64 {
        return Err(parse_error(line_num, &format!("face index {index} out of range")));
    }
    Ok(resolved as usize)
}

fn parse_float(s: &str, line_num: usize) -> Result<f32, MeshError> {
    s.parse()
        .map_err(|_| parse_error(line_num, &format!("invalid number '{s}'")))
}

fn parse_error(line_num: usize, message: &str) -> MeshError {
    MeshError::Parse {
        line: line_num + 1,
        message: message.to_string(),
    }
}
