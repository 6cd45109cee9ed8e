//! Mesh validation
//!
//! Checks a skinned mesh before it is written out:
//! - Detect degenerate faces (zero area)
//! - Check for NaN/Inf coordinates
//! - Find open and non-manifold edges

use glam::DVec3;

use super::{Face, SkinMesh};

/// Result of mesh validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Total number of faces validated
    pub total: usize,
    /// Number of degenerate faces (zero or near-zero area)
    pub degenerate: usize,
    /// Number of vertices with invalid coordinates (NaN/Inf)
    pub invalid_coords: usize,
    /// Edges used by exactly one face
    pub open_edges: usize,
    /// Edges used by more than two faces
    pub non_manifold_edges: usize,
    /// Warning messages for issues found
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Check if the mesh passed validation without critical issues
    pub fn is_valid(&self) -> bool {
        self.invalid_coords == 0
    }

    /// Every edge is shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        self.open_edges == 0 && self.non_manifold_edges == 0
    }

    /// Check if the mesh has any issues at all
    pub fn has_issues(&self) -> bool {
        self.degenerate > 0 || self.invalid_coords > 0 || !self.is_closed()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.has_issues() {
            format!("Mesh valid: {} faces, closed, no issues", self.total)
        } else {
            format!(
                "Mesh issues: {} faces, {} degenerate, {} invalid coords, {} open edges, {} non-manifold edges",
                self.total,
                self.degenerate,
                self.invalid_coords,
                self.open_edges,
                self.non_manifold_edges
            )
        }
    }
}

/// Minimum area for a non-degenerate face
const MIN_FACE_AREA: f64 = 1e-12;

/// Validate a mesh and return a detailed report
pub fn validate_mesh(mesh: &SkinMesh) -> ValidationResult {
    let mut result = ValidationResult {
        total: mesh.face_count(),
        ..Default::default()
    };

    for (i, v) in mesh.vertices().iter().enumerate() {
        if !v.is_finite() {
            result.invalid_coords += 1;
            result
                .warnings
                .push(format!("Vertex {} has NaN/Inf coordinates", i));
        }
    }

    result.degenerate = mesh
        .faces()
        .iter()
        .filter(|face| face_area(mesh, face) < MIN_FACE_AREA)
        .count();

    for count in mesh.edge_usage().values() {
        match count {
            1 => result.open_edges += 1,
            2 => {}
            _ => result.non_manifold_edges += 1,
        }
    }

    if result.degenerate > 0 {
        result.warnings.push(format!(
            "{} degenerate faces detected",
            result.degenerate
        ));
    }
    if result.open_edges > 0 {
        result
            .warnings
            .push(format!("{} open edges, mesh is not closed", result.open_edges));
    }
    if result.non_manifold_edges > 0 {
        result.warnings.push(format!(
            "{} edges are shared by more than two faces",
            result.non_manifold_edges
        ));
    }

    result
}

/// Area of a planar-ish polygon, as a fan from its first corner
fn face_area(mesh: &SkinMesh, face: &Face) -> f64 {
    let corners: Vec<DVec3> = face.vertices().iter().map(|&v| mesh.position(v)).collect();
    let origin = corners[0];
    corners
        .windows(2)
        .skip(1)
        .map(|w| 0.5 * (w[0] - origin).cross(w[1] - origin).length())
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshSink;

    /// Closed tetrahedron
    fn tetrahedron() -> SkinMesh {
        let mut mesh = SkinMesh::new();
        let v: Vec<_> = [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z]
            .into_iter()
            .map(|p| mesh.add_vertex(p))
            .collect();
        mesh.add_triangle(v[0], v[2], v[1]);
        mesh.add_triangle(v[0], v[1], v[3]);
        mesh.add_triangle(v[1], v[2], v[3]);
        mesh.add_triangle(v[2], v[0], v[3]);
        mesh
    }

    #[test]
    fn test_closed_mesh() {
        let result = validate_mesh(&tetrahedron());

        assert_eq!(result.total, 4);
        assert!(result.is_valid());
        assert!(result.is_closed());
        assert!(!result.has_issues());
        assert!(result.summary().starts_with("Mesh valid"));
    }

    #[test]
    fn test_open_mesh() {
        let mut mesh = SkinMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::Y);
        mesh.add_triangle(a, b, c);

        let result = validate_mesh(&mesh);
        assert_eq!(result.open_edges, 3);
        assert!(!result.is_closed());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_degenerate_face() {
        let mut mesh = SkinMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::new(2.0, 0.0, 0.0));
        mesh.add_triangle(a, b, c);

        assert_eq!(validate_mesh(&mesh).degenerate, 1);
    }

    #[test]
    fn test_invalid_coords() {
        let mut mesh = tetrahedron();
        mesh.add_vertex(DVec3::new(f64::INFINITY, 0.0, 0.0));

        let result = validate_mesh(&mesh);
        assert_eq!(result.invalid_coords, 1);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_quad_area() {
        let mut mesh = SkinMesh::new();
        let v: Vec<_> = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 2.0, 0.0), DVec3::new(0.0, 2.0, 0.0)]
            .into_iter()
            .map(|p| mesh.add_vertex(p))
            .collect();
        let face = Face::Quad([v[0], v[1], v[2], v[3]]);
        assert!((face_area(&mesh, &face) - 2.0).abs() < 1e-12);
    }
}
