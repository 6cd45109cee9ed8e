use super::SkinMesh;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a skin mesh as Wavefront OBJ, keeping quads as quads
///
/// OBJ has no edge attributes, so creases are not written.
pub fn write_obj(path: &Path, mesh: &SkinMesh) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create OBJ file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    encode_obj(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

fn encode_obj(writer: &mut impl Write, mesh: &SkinMesh) -> std::io::Result<()> {
    writeln!(writer, "# wireskin")?;
    writeln!(writer, "o wireskin")?;
    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for face in mesh.faces() {
        write!(writer, "f")?;
        // OBJ indices are 1-based
        for v in face.vertices() {
            write!(writer, " {}", v.index() + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
