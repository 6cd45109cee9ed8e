use glam::DVec3;

use crate::domain::{Wireframe, WireframeEdge};
use crate::error::{SkinError, SkinResult};

/// Parse a Wavefront OBJ containing only vertices and line elements
///
/// # Records
/// - `v x y z [w]`: vertex position, `w` ignored
/// - `l i j [k ...]`: polyline, each consecutive pair becomes an edge
/// - `f ...`: rejected, the input must be edges only
///
/// Indices are 1-based; negative indices count back from the last vertex read
/// so far. Texture indices (`l 1/1 2/2`) are accepted and dropped. Everything
/// else (`o`, `g`, `vn`, comments) is skipped.
pub fn parse_obj(text: &str) -> SkinResult<Wireframe> {
    let mut vertices = Vec::new();
    let mut edges = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = match raw.split_once('#') {
            Some((content, _)) => content,
            None => raw,
        };
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };

        match keyword {
            "v" => vertices.push(parse_position(fields, line_no)?),
            "l" => {
                let indices = fields
                    .map(|f| resolve_index(f, vertices.len(), line_no))
                    .collect::<SkinResult<Vec<_>>>()?;
                if indices.len() < 2 {
                    return Err(SkinError::parse(line_no, "line element needs at least two vertices"));
                }
                edges.extend(indices.windows(2).map(|w| WireframeEdge(w[0], w[1])));
            }
            "f" => {
                return Err(SkinError::parse(
                    line_no,
                    "faces are not supported, input must be a wireframe of `l` elements",
                ));
            }
            _ => {}
        }
    }

    log::debug!("parsed OBJ: {} vertices, {} edges", vertices.len(), edges.len());
    Ok(Wireframe::new(vertices, edges))
}

fn parse_position<'a>(mut fields: impl Iterator<Item = &'a str>, line_no: usize) -> SkinResult<DVec3> {
    let mut coord = |axis: &str| -> SkinResult<f64> {
        let field = fields
            .next()
            .ok_or_else(|| SkinError::parse(line_no, format!("vertex is missing its {axis} coordinate")))?;
        field
            .parse()
            .map_err(|_| SkinError::parse(line_no, format!("invalid {axis} coordinate `{field}`")))
    };
    Ok(DVec3::new(coord("x")?, coord("y")?, coord("z")?))
}

/// Convert an OBJ vertex reference to a 0-based index
fn resolve_index(field: &str, seen: usize, line_no: usize) -> SkinResult<usize> {
    let head = field.split('/').next().unwrap_or(field);
    let value: i64 = head
        .parse()
        .map_err(|_| SkinError::parse(line_no, format!("invalid vertex index `{field}`")))?;

    let index = match value {
        0 => None,
        v if v > 0 => Some(v as usize - 1),
        v => seen.checked_sub(v.unsigned_abs() as usize),
    };
    index.ok_or_else(|| SkinError::parse(line_no, format!("vertex index `{field}` is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_expands_to_edges() {
        let text = "\
# square outline
o frame
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
l 1 2 3 4 1
";
        let wf = parse_obj(text).unwrap();
        assert_eq!(wf.vertex_count(), 4);
        assert_eq!(
            wf.edges,
            vec![
                WireframeEdge(0, 1),
                WireframeEdge(1, 2),
                WireframeEdge(2, 3),
                WireframeEdge(3, 0)
            ]
        );
        assert_eq!(wf.vertices[2], DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nl -2 -1\nv 2 0 0\nl -2 -1 # trailing comment\n";
        let wf = parse_obj(text).unwrap();
        assert_eq!(wf.edges, vec![WireframeEdge(0, 1), WireframeEdge(1, 2)]);
    }

    #[test]
    fn test_texture_indices_dropped() {
        let wf = parse_obj("v 0 0 0\nv 0 0 1\nvt 0 0\nl 1/1 2/1\n").unwrap();
        assert_eq!(wf.edges, vec![WireframeEdge(0, 1)]);
    }

    #[test]
    fn test_faces_rejected() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, SkinError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_bad_records() {
        assert!(matches!(
            parse_obj("v 0 0\n"),
            Err(SkinError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 x 0\n"),
            Err(SkinError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nl 1\n"),
            Err(SkinError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nl 0 1\n"),
            Err(SkinError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_obj("v 0 0 0\nl -1 -2\n"),
            Err(SkinError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_forward_reference_left_to_validation() {
        // Positive indices may point past the vertices read so far
        let wf = parse_obj("l 1 2\nv 0 0 0\nv 1 0 0\n").unwrap();
        assert!(wf.validate().is_ok());
        assert_eq!(wf.edges, vec![WireframeEdge(0, 1)]);
    }
}
