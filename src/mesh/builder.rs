use glam::DVec3;
use std::collections::BTreeMap;

/// Index of a vertex in the output mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexHandle(pub u32);

/// Index of a face in the output mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceHandle(pub u32);

impl VertexHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A polygon of the output mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Triangle([VertexHandle; 3]),
    Quad([VertexHandle; 4]),
}

impl Face {
    pub fn vertices(&self) -> &[VertexHandle] {
        match self {
            Face::Triangle(v) => v,
            Face::Quad(v) => v,
        }
    }

    /// Boundary edges in winding order
    pub fn edges(&self) -> impl Iterator<Item = (VertexHandle, VertexHandle)> + '_ {
        let v = self.vertices();
        (0..v.len()).map(move |i| (v[i], v[(i + 1) % v.len()]))
    }
}

/// Unordered vertex pair identifying a mesh edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(VertexHandle, VertexHandle);

impl EdgeKey {
    pub fn new(a: VertexHandle, b: VertexHandle) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    pub fn vertices(&self) -> (VertexHandle, VertexHandle) {
        (self.0, self.1)
    }
}

/// Where skin geometry is written
///
/// The skinning code only ever appends through this interface, so any mesh
/// representation can sit behind it.
pub trait MeshSink {
    fn add_vertex(&mut self, position: DVec3) -> VertexHandle;

    fn add_face(&mut self, face: Face) -> FaceHandle;

    /// Stamp a crease value on the edge between two vertices
    fn set_crease(&mut self, a: VertexHandle, b: VertexHandle, value: f64);

    fn add_triangle(&mut self, a: VertexHandle, b: VertexHandle, c: VertexHandle) -> FaceHandle {
        self.add_face(Face::Triangle([a, b, c]))
    }

    fn add_quad(
        &mut self,
        a: VertexHandle,
        b: VertexHandle,
        c: VertexHandle,
        d: VertexHandle,
    ) -> FaceHandle {
        self.add_face(Face::Quad([a, b, c, d]))
    }
}

/// Accumulated output mesh: positions, polygons and edge creases
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinMesh {
    vertices: Vec<DVec3>,
    faces: Vec<Face>,
    creases: BTreeMap<EdgeKey, f64>,
}

impl MeshSink for SkinMesh {
    fn add_vertex(&mut self, position: DVec3) -> VertexHandle {
        let handle = VertexHandle(self.vertices.len() as u32);
        self.vertices.push(position);
        handle
    }

    fn add_face(&mut self, face: Face) -> FaceHandle {
        let handle = FaceHandle(self.faces.len() as u32);
        self.faces.push(face);
        handle
    }

    fn set_crease(&mut self, a: VertexHandle, b: VertexHandle, value: f64) {
        self.creases.insert(EdgeKey::new(a, b), value);
    }
}

impl SkinMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn position(&self, v: VertexHandle) -> DVec3 {
        self.vertices[v.index()]
    }

    /// Crease stamped on the edge between `a` and `b`, if any
    pub fn crease(&self, a: VertexHandle, b: VertexHandle) -> Option<f64> {
        self.creases.get(&EdgeKey::new(a, b)).copied()
    }

    pub fn creases(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        self.creases.iter().map(|(k, v)| (*k, *v))
    }

    /// How many faces use each edge
    pub fn edge_usage(&self) -> BTreeMap<EdgeKey, usize> {
        let mut usage = BTreeMap::new();
        for face in &self.faces {
            for (a, b) in face.edges() {
                *usage.entry(EdgeKey::new(a, b)).or_insert(0) += 1;
            }
        }
        usage
    }

    /// Split quads into triangles for triangle-only formats
    pub fn triangulate(&self) -> Vec<Triangle> {
        let corner = |v: VertexHandle| self.position(v).as_vec3().to_array();
        let mut triangles = Vec::with_capacity(self.faces.len() * 2);
        for face in &self.faces {
            match *face {
                Face::Triangle([a, b, c]) => {
                    triangles.push(Triangle::new(corner(a), corner(b), corner(c)));
                }
                Face::Quad([a, b, c, d]) => {
                    triangles.push(Triangle::new(corner(a), corner(b), corner(c)));
                    triangles.push(Triangle::new(corner(a), corner(c), corner(d)));
                }
            }
        }
        triangles
    }
}

/// A triangle for STL output
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Three vertices: [[x, y, z], [x, y, z], [x, y, z]]
    pub vertices: [[f32; 3]; 3],
    /// Normal vector [nx, ny, nz]
    pub normal: [f32; 3],
}

impl Triangle {
    /// Create a new triangle and calculate its normal
    pub fn new(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> Self {
        let normal = calculate_normal(&[v0, v1, v2]);
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }
}

/// Calculate the normal vector for a triangle using the cross product
pub(crate) fn calculate_normal(vertices: &[[f32; 3]; 3]) -> [f32; 3] {
    let [v0, v1, v2] = vertices.map(glam::Vec3::from);
    match (v1 - v0).cross(v2 - v0).try_normalize() {
        Some(n) => n.to_array(),
        None => [0.0, 0.0, 1.0], // Default to up for degenerate triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_normal() {
        // A triangle in the XY plane should have a Z-pointing normal
        let tri = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        assert!((tri.normal[0]).abs() < 0.001);
        assert!((tri.normal[1]).abs() < 0.001);
        assert!((tri.normal[2] - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_sink_handles_are_positional() {
        let mut mesh = SkinMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        let c = mesh.add_vertex(DVec3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(DVec3::Y);

        assert_eq!((a, d), (VertexHandle(0), VertexHandle(3)));
        assert_eq!(mesh.add_triangle(a, b, c), FaceHandle(0));
        assert_eq!(mesh.add_quad(a, b, c, d), FaceHandle(1));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.position(c), DVec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_crease_is_unordered() {
        let mut mesh = SkinMesh::new();
        let a = mesh.add_vertex(DVec3::ZERO);
        let b = mesh.add_vertex(DVec3::X);
        mesh.set_crease(b, a, 0.75);

        assert_eq!(mesh.crease(a, b), Some(0.75));
        assert_eq!(mesh.crease(b, a), Some(0.75));
        assert_eq!(mesh.creases().count(), 1);
    }

    #[test]
    fn test_triangulate_and_edge_usage() {
        let mut mesh = SkinMesh::new();
        let v: Vec<_> = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y]
            .into_iter()
            .map(|p| mesh.add_vertex(p))
            .collect();
        mesh.add_quad(v[0], v[1], v[2], v[3]);
        mesh.add_triangle(v[0], v[2], v[1]);

        // 1 triangle + 2 from quad
        assert_eq!(mesh.triangulate().len(), 3);

        let usage = mesh.edge_usage();
        assert_eq!(usage[&EdgeKey::new(v[0], v[1])], 2);
        assert_eq!(usage[&EdgeKey::new(v[0], v[2])], 1);
        assert_eq!(usage[&EdgeKey::new(v[3], v[0])], 1);
    }
}
