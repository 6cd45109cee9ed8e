//! Wireframe readers

pub mod json;
pub mod obj;

pub use json::parse_json;
pub use obj::parse_obj;

use std::fs;
use std::path::Path;

use crate::domain::Wireframe;
use crate::error::SkinResult;

/// Supported wireframe file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Obj,
}

impl InputFormat {
    /// Guess from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Guess from content: a JSON document starts with `{`
    fn sniff(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Obj
        }
    }
}

/// Parse a wireframe in the given format
pub fn parse_wireframe(text: &str, format: InputFormat) -> SkinResult<Wireframe> {
    match format {
        InputFormat::Json => parse_json(text),
        InputFormat::Obj => parse_obj(text),
    }
}

/// Read a wireframe file, choosing the parser by extension, then by content
pub fn read_wireframe(path: &Path) -> SkinResult<Wireframe> {
    let text = fs::read_to_string(path)?;
    let format = InputFormat::from_path(path).unwrap_or_else(|| InputFormat::sniff(&text));
    parse_wireframe(&text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a/frame.JSON")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("frame.obj")), Some(InputFormat::Obj));
        assert_eq!(InputFormat::from_path(Path::new("frame.txt")), None);
        assert_eq!(InputFormat::from_path(Path::new("frame")), None);
    }

    #[test]
    fn test_read_by_extension_and_content() {
        let dir = tempdir().unwrap();

        let obj = dir.path().join("segment.obj");
        fs::write(&obj, "v 0 0 0\nv 1 0 0\nl 1 2\n").unwrap();
        assert_eq!(read_wireframe(&obj).unwrap().edge_count(), 1);

        let unknown = dir.path().join("segment.wire");
        fs::write(&unknown, r#"  {"vertices": [[0,0,0],[0,1,0]], "edges": [[1,0]]}"#).unwrap();
        assert_eq!(read_wireframe(&unknown).unwrap().vertex_count(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_wireframe(&dir.path().join("nope.obj")).unwrap_err();
        assert!(matches!(err, crate::error::SkinError::Io(_)));
    }
}
