//! Tube walls between the two profiles that face each other across an edge
//!
//! The two endpoint caps build their profiles independently, so corner 0 of one
//! profile has no fixed partner on the other. The partner is found by nearest
//! distance and the walking direction by comparing the neighbours of that partner.

use glam::DVec3;

use super::{Profile, VertexCap};
use crate::config::SkinParams;
use crate::domain::WireframeEdge;
use crate::error::{SkinError, SkinResult};
use crate::mesh::{MeshSink, VertexHandle};

/// Direction in which the far profile is walked to match the near one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Forward,
    Backward,
}

impl Winding {
    /// Index step modulo 4
    fn step(self) -> usize {
        match self {
            Winding::Forward => 1,
            Winding::Backward => 3,
        }
    }
}

/// Corner of `far` matching `near[0]`, and the winding that matches `near[1]`
pub fn match_profiles(near: &[DVec3; 4], far: &[DVec3; 4]) -> (usize, Winding) {
    let mut min_i = 0;
    let mut min_len = far[0].distance(near[0]);
    for (i, p) in far.iter().enumerate().skip(1) {
        let len = p.distance(near[0]);
        if len < min_len {
            min_len = len;
            min_i = i;
        }
    }

    let forward = far[(min_i + 1) % 4].distance(near[1]);
    let backward = far[(min_i + 3) % 4].distance(near[1]);
    let winding = if forward < backward {
        Winding::Forward
    } else {
        Winding::Backward
    };

    (min_i, winding)
}

#[derive(Debug, Clone)]
pub struct ProfileConnector {
    edge: usize,
    endpoints: [usize; 2],
    creased_edges: Vec<(VertexHandle, VertexHandle)>,
}

impl ProfileConnector {
    pub fn new(edge: usize, wireframe_edge: WireframeEdge) -> Self {
        Self {
            edge,
            endpoints: wireframe_edge.vertices(),
            creased_edges: Vec::new(),
        }
    }

    /// Emit the four wall quads for this edge
    ///
    /// Fails if either endpoint cap has no profile for the edge, which means
    /// the caps were not built from the same wireframe.
    pub fn join_profiles(
        &mut self,
        caps: &[VertexCap],
        params: &SkinParams,
        sink: &mut impl MeshSink,
    ) -> SkinResult<usize> {
        let [v0, v1] = self.endpoints;
        let loop0 = self.profile_on(caps, v0)?;
        let loop1 = self.profile_on(caps, v1)?;

        let (min_i, winding) = match_profiles(&loop0.positions, &loop1.positions);
        let step = winding.step();
        let min_i2 = (min_i + step) % 4;

        let (near, far) = (loop0.vertices, loop1.vertices);
        for idx in 0..4 {
            let idx1 = (idx + 1) % 4;
            let idx2 = (min_i2 + step * idx) % 4;
            let idx3 = (min_i + step * idx) % 4;
            sink.add_quad(near[idx], near[idx1], far[idx2], far[idx3]);

            if params.connector_crease.is_some() {
                self.creased_edges.push((near[idx1], far[idx2]));
            }
        }

        Ok(4)
    }

    fn profile_on<'c>(&self, caps: &'c [VertexCap], vertex: usize) -> SkinResult<&'c Profile> {
        caps.get(vertex)
            .and_then(|cap| cap.profile_for_edge(self.edge))
            .ok_or_else(|| SkinError::MissingProfile {
                edge: self.edge,
                vertex,
            })
    }

    pub fn creased_edges(&self) -> &[(VertexHandle, VertexHandle)] {
        &self.creased_edges
    }

    pub fn apply_creases(&self, sink: &mut impl MeshSink, value: f64) {
        for &(a, b) in &self.creased_edges {
            sink.set_crease(a, b, value);
        }
    }
}
