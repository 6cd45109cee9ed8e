use crate::domain::Wireframe;
use crate::error::SkinResult;

/// Parse a JSON wireframe document
///
/// ```json
/// { "vertices": [[0, 0, 0], [1, 0, 0]], "edges": [[0, 1]] }
/// ```
pub fn parse_json(text: &str) -> SkinResult<Wireframe> {
    let wireframe: Wireframe = serde_json::from_str(text)?;
    log::debug!(
        "parsed JSON: {} vertices, {} edges",
        wireframe.vertex_count(),
        wireframe.edge_count()
    );
    Ok(wireframe)
}
