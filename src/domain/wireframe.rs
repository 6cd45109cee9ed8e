use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{SkinError, SkinResult};

/// A wireframe vertex: its stable index and position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireframeVertex {
    pub index: usize,
    pub position: DVec3,
}

/// An undirected edge between two vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireframeEdge(pub usize, pub usize);

impl WireframeEdge {
    /// Endpoints in stored order
    pub fn vertices(&self) -> [usize; 2] {
        [self.0, self.1]
    }
}

/// Input graph of points and edges, no faces
///
/// Duplicate edges are kept as given; each one becomes its own tube.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wireframe {
    pub vertices: Vec<DVec3>,
    pub edges: Vec<WireframeEdge>,
}

impl Wireframe {
    pub fn new(vertices: Vec<DVec3>, edges: Vec<WireframeEdge>) -> Self {
        Self { vertices, edges }
    }

    /// Convenience constructor from raw coordinates and index pairs
    pub fn from_parts(vertices: &[[f64; 3]], edges: &[(usize, usize)]) -> Self {
        Self {
            vertices: vertices.iter().map(|&v| DVec3::from(v)).collect(),
            edges: edges.iter().map(|&(a, b)| WireframeEdge(a, b)).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, index: usize) -> WireframeVertex {
        WireframeVertex {
            index,
            position: self.vertices[index],
        }
    }

    pub fn iter_vertices(&self) -> impl Iterator<Item = WireframeVertex> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, &position)| WireframeVertex { index, position })
    }

    /// Number of edges incident to each vertex
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.vertices.len()];
        for edge in &self.edges {
            for v in edge.vertices() {
                if let Some(d) = degrees.get_mut(v) {
                    *d += 1;
                }
            }
        }
        degrees
    }

    /// Check structural soundness: finite coordinates, in-range indices, no self-loops
    pub fn validate(&self) -> SkinResult<()> {
        if let Some(vertex) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(SkinError::NonFiniteVertex { vertex });
        }

        let count = self.vertices.len();
        for (edge, e) in self.edges.iter().enumerate() {
            for vertex in e.vertices() {
                if vertex >= count {
                    return Err(SkinError::VertexOutOfRange {
                        edge,
                        vertex,
                        count,
                    });
                }
            }
            if e.0 == e.1 {
                return Err(SkinError::SelfLoop { edge, vertex: e.0 });
            }
        }

        Ok(())
    }
}
