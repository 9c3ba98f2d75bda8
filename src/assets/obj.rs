//! Minimal Wavefront OBJ reader.
//!
//! Supports `v`, `vt`, `vn` and `f` statements. Face corners may be written as `v`,
//! `v/vt`, `v//vn` or `v/vt/vn` (1-based, negative indices count from the end). Faces
//! with more than three corners are split into a fan. Every other statement is ignored.
//!
//! The output is unrolled: one vertex per face corner with sequential indices, so corners
//! that share a position but not a normal or UV never get merged.

use super::AssetError;
use crate::renderer::mesh::MeshData;
use crate::renderer::vertex::Vertex;
use std::io::BufRead;
use std::path::Path;

/// Tint applied to every loaded model vertex.
pub const MODEL_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

const FALLBACK_UV: [f32; 2] = [0.0, 0.0];
const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// One face corner as read from the file, indices already resolved to 0-based.
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct ObjBuilder {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    mesh: MeshData,
}

impl ObjBuilder {
    fn push_corner(&mut self, corner: Corner) {
        let position = self.positions[corner.position];
        let normal = corner.normal.map_or(FALLBACK_NORMAL, |i| self.normals[i]);
        let tex_coords = corner.uv.map_or(FALLBACK_UV, |i| self.uvs[i]);

        self.mesh.indices.push(self.mesh.vertices.len() as u32);
        self.mesh.vertices.push(Vertex {
            position,
            normal,
            tex_coords,
            color: MODEL_COLOR,
        });
    }
}

/// Parses OBJ text from any buffered reader.
///
/// # Errors
/// [`AssetError::Obj`] for malformed numbers, out-of-range indices or faces with fewer
/// than three corners; [`AssetError::Io`] if the reader fails.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<MeshData, AssetError> {
    let mut obj = ObjBuilder::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssetError::io("<obj stream>", e))?;
        let line_no = number + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => obj.positions.push(parse_floats::<3>(tokens, line_no)?),
            Some("vt") => obj.uvs.push(parse_floats::<2>(tokens, line_no)?),
            Some("vn") => obj.normals.push(parse_floats::<3>(tokens, line_no)?),
            Some("f") => {
                let corners = tokens
                    .map(|t| parse_corner(t, &obj, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(obj_error(line_no, "face needs at least three corners"));
                }
                for i in 1..corners.len() - 1 {
                    obj.push_corner(corners[0]);
                    obj.push_corner(corners[i]);
                    obj.push_corner(corners[i + 1]);
                }
            }
            _ => {}
        }
    }

    Ok(obj.mesh)
}

/// Reads and parses the OBJ file at `path`.
pub fn load_obj(path: &Path) -> Result<MeshData, AssetError> {
    let file = std::fs::File::open(path).map_err(|e| AssetError::io(path, e))?;
    let mesh = parse_obj(std::io::BufReader::new(file))?;
    log::info!(
        "Loaded model {} ({} triangles)",
        path.display(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

fn obj_error(line: usize, message: impl Into<String>) -> AssetError {
    AssetError::Obj {
        line,
        message: message.into(),
    }
}

/// Reads the first `N` floats; extra components (such as a `w`) are ignored.
fn parse_floats<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    for slot in &mut out {
        let token = tokens
            .next()
            .ok_or_else(|| obj_error(line, format!("expected {N} components")))?;
        *slot = token
            .parse()
            .map_err(|_| obj_error(line, format!("invalid number {token:?}")))?;
    }
    Ok(out)
}

fn parse_corner(token: &str, obj: &ObjBuilder, line: usize) -> Result<Corner, AssetError> {
    let mut parts = token.split('/');
    let position = parts
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| obj_error(line, format!("missing position index in {token:?}")))?;
    let uv = parts.next().filter(|p| !p.is_empty());
    let normal = parts.next().filter(|p| !p.is_empty());

    Ok(Corner {
        position: resolve_index(position, obj.positions.len(), line)?,
        uv: uv
            .map(|i| resolve_index(i, obj.uvs.len(), line))
            .transpose()?,
        normal: normal
            .map(|i| resolve_index(i, obj.normals.len(), line))
            .transpose()?,
    })
}

fn resolve_index(token: &str, len: usize, line: usize) -> Result<usize, AssetError> {
    let raw: i64 = token
        .parse()
        .map_err(|_| obj_error(line, format!("invalid index {token:?}")))?;
    let index = match raw {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => -1,
    };
    if index < 0 || index as usize >= len {
        return Err(obj_error(
            line,
            format!("index {raw} out of range ({len} entries)"),
        ));
    }
    Ok(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
# triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.5
vt 1 0
vt 0 1
vn 0 0 1
";

    fn parse(faces: &str) -> MeshData {
        parse_obj(format!("{HEADER}{faces}").as_bytes()).expect("valid obj")
    }

    #[test]
    fn test_positions_only_uses_fallbacks() {
        let mesh = parse("f 1 2 3\n");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert!(mesh.vertices.iter().all(|v| v.tex_coords == FALLBACK_UV));
        assert!(mesh.vertices.iter().all(|v| v.normal == FALLBACK_NORMAL));
        assert!(mesh.vertices.iter().all(|v| v.color == MODEL_COLOR));
    }

    #[test]
    fn test_position_and_uv() {
        let mesh = parse("f 1/1 2/2 3/3\n");
        assert_eq!(mesh.vertices[0].tex_coords, [0.5, 0.5]);
        assert_eq!(mesh.vertices[2].tex_coords, [0.0, 1.0]);
        assert_eq!(mesh.vertices[0].normal, FALLBACK_NORMAL);
    }

    #[test]
    fn test_position_and_normal() {
        let mesh = parse("f 1//1 2//1 3//1\n");
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(mesh.vertices.iter().all(|v| v.tex_coords == FALLBACK_UV));
    }

    #[test]
    fn test_full_corner_and_negative_indices() {
        let mesh = parse("f -3/1/1 -2/2/-1 -1/3/1\n");
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[1].tex_coords, [1.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    /// Corners are never shared between faces.
    #[test]
    fn test_vertices_are_unrolled() {
        let mesh = parse("f 1 2 3\nf 3 2 1\n");
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    /// A quad becomes a two-triangle fan.
    #[test]
    fn test_quad_is_triangulated() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n".as_bytes())
            .expect("valid obj");
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[3].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[5].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        let err = parse_obj(format!("{HEADER}f 1 2 9\n").as_bytes()).unwrap_err();
        assert!(matches!(err, AssetError::Obj { line: 9, .. }));
    }

    #[test]
    fn test_bad_number_is_error() {
        let err = parse_obj("v 0 zero 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, AssetError::Obj { line: 1, .. }));
    }
}
