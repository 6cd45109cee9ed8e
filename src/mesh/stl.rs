use super::{SkinMesh, Triangle};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const TITLE: &[u8] = b"wireskin - binary STL";

/// Write a skin mesh as binary STL, splitting quads into triangles
pub fn write_mesh_stl(path: &Path, mesh: &SkinMesh) -> Result<usize> {
    let triangles = mesh.triangulate();
    write_stl(path, &triangles)?;
    Ok(triangles.len())
}

/// Write triangles to a binary STL file
///
/// Binary STL format:
/// - 80 byte header
/// - 4 byte u32 triangle count (little endian)
/// - For each triangle: 3 x f32 normal, 3 x 3 x f32 vertices, 2 byte attribute
pub fn write_stl(path: &Path, triangles: &[Triangle]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    encode_stl(&mut writer, triangles)?;
    writer.flush()?;
    Ok(())
}

fn encode_stl(writer: &mut impl Write, triangles: &[Triangle]) -> std::io::Result<()> {
    let mut header = [b' '; 80];
    header[..TITLE.len()].copy_from_slice(TITLE);
    writer.write_all(&header)?;
    writer.write_all(&(triangles.len() as u32).to_le_bytes())?;

    for tri in triangles {
        for &n in &tri.normal {
            writer.write_all(&n.to_le_bytes())?;
        }
        for vertex in &tri.vertices {
            for &coord in vertex {
                writer.write_all(&coord.to_le_bytes())?;
            }
        }
        writer.write_all(&[0u8, 0u8])?;
    }

    Ok(())
}

/// Get the file size of an STL with the given number of triangles
pub fn estimate_stl_size(triangle_count: usize) -> usize {
    // 80 (header) + 4 (count) + triangles * (12 normal + 36 vertices + 2 attribute)
    80 + 4 + triangle_count * 50
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshSink;
    use glam::DVec3;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_stl() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.stl");

        let triangles = vec![
            Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Triangle::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        write_stl(&path, &triangles).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), estimate_stl_size(2) as u64);
    }

    #[test]
    fn test_mesh_stl_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.stl");

        let mut mesh = SkinMesh::new();
        let v: Vec<_> = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y]
            .into_iter()
            .map(|p| mesh.add_vertex(p))
            .collect();
        mesh.add_quad(v[0], v[1], v[2], v[3]);

        assert_eq!(write_mesh_stl(&path, &mesh).unwrap(), 2);

        let mut file = fs::File::open(&path).unwrap();
        let stl = stl_io::read_stl(&mut file).unwrap();
        assert_eq!(stl.faces.len(), 2);
        assert_eq!(stl.vertices.len(), 4);
        for face in &stl.faces {
            assert!((face.normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_estimate_size() {
        assert_eq!(estimate_stl_size(0), 84);
        assert_eq!(estimate_stl_size(1), 134);
    }
}
