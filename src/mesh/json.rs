use super::{Face, SkinMesh};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialized form of a skin mesh, the only output that carries creases
#[derive(Debug, Serialize)]
pub struct MeshDocument {
    pub vertices: Vec<[f64; 3]>,
    pub faces: Vec<Vec<u32>>,
    /// `[a, b, value]` per creased edge
    pub creases: Vec<(u32, u32, f64)>,
}

impl From<&SkinMesh> for MeshDocument {
    fn from(mesh: &SkinMesh) -> Self {
        Self {
            vertices: mesh.vertices().iter().map(|v| v.to_array()).collect(),
            faces: mesh
                .faces()
                .iter()
                .map(|face: &Face| face.vertices().iter().map(|v| v.0).collect())
                .collect(),
            creases: mesh
                .creases()
                .map(|(edge, value)| {
                    let (a, b) = edge.vertices();
                    (a.0, b.0, value)
                })
                .collect(),
        }
    }
}

pub fn write_json(path: &Path, mesh: &SkinMesh) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &MeshDocument::from(mesh))
        .context("Failed to serialize mesh")?;
    writer.flush()?;
    Ok(())
}
