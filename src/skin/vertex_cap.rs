//! Geometry anchored at one wireframe vertex
//!
//! A cap owns the poles that round off the joint, one rectangular profile per
//! incident edge, and the faces that close the joint between them. Work happens
//! in strict phases driven by [`SkinBuilder`](super::SkinBuilder):
//!
//! 1. [`VertexCap::register_incident_edge`] for every incident edge
//! 2. [`VertexCap::compute_poles`]
//! 3. [`VertexCap::compute_profiles`], once every cap in the skin has its normal
//! 4. [`VertexCap::compute_intra_cap_faces`]

use glam::DVec3;
use std::collections::HashMap;

use crate::config::SkinParams;
use crate::domain::WireframeVertex;
use crate::error::GeometryWarning;
use crate::geometry::{average, fit_plane_normal, least_squares_normal, perpendicular, polar_angle};
use crate::mesh::{MeshSink, VertexHandle};

/// Below this the averaged edge direction gives no usable normal
const MIN_AVERAGE_LENGTH: f64 = 1e-7;
/// Edges shorter than this have no usable tangent
const MIN_EDGE_LENGTH: f64 = 1e-6;
/// Profile up vectors closer than this to the tangent get perturbed
const MIN_FRAME_SINE: f64 = 1e-6;

/// One incident edge as seen from a cap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAttachment {
    pub edge: usize,
    pub neighbor: usize,
    pub neighbor_position: DVec3,
    pub length: f64,
}

/// Tube cross-section on one edge, a planar quad
///
/// Corner order is fixed: `+n+b`, `+n-b`, `-n-b`, `-n+b`, where `n` is the
/// profile normal and `b` the binormal. Face builders rely on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    pub edge: usize,
    pub vertices: [VertexHandle; 4],
    pub positions: [DVec3; 4],
}

impl Profile {
    pub fn center(&self) -> DVec3 {
        average(&self.positions)
    }
}

#[derive(Debug, Clone)]
pub struct VertexCap {
    index: usize,
    position: DVec3,
    attachments: Vec<EdgeAttachment>,
    normal: Option<DVec3>,
    outward_pole: Option<VertexHandle>,
    inward_pole: Option<VertexHandle>,
    profiles: Vec<Profile>,
    edge_profiles: HashMap<usize, usize>,
    creased_edges: Vec<(VertexHandle, VertexHandle)>,
    warnings: Vec<GeometryWarning>,
}

impl VertexCap {
    pub fn new(vertex: WireframeVertex) -> Self {
        Self {
            index: vertex.index,
            position: vertex.position,
            attachments: Vec::new(),
            normal: None,
            outward_pole: None,
            inward_pole: None,
            profiles: Vec::new(),
            edge_profiles: HashMap::new(),
            creased_edges: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn degree(&self) -> usize {
        self.attachments.len()
    }

    /// Pole direction; `None` until poles are computed, and always for isolated vertices
    pub fn normal(&self) -> Option<DVec3> {
        self.normal
    }

    pub fn outward_pole(&self) -> Option<VertexHandle> {
        self.outward_pole
    }

    pub fn inward_pole(&self) -> Option<VertexHandle> {
        self.inward_pole
    }

    pub fn pole_count(&self) -> usize {
        self.outward_pole.iter().chain(self.inward_pole.iter()).count()
    }

    /// Profiles in cyclic order around the normal
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile_for_edge(&self, edge: usize) -> Option<&Profile> {
        self.edge_profiles.get(&edge).map(|&i| &self.profiles[i])
    }

    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    pub fn register_incident_edge(&mut self, edge: usize, neighbor: WireframeVertex) {
        self.attachments.push(EdgeAttachment {
            edge,
            neighbor: neighbor.index,
            neighbor_position: neighbor.position,
            length: self.position.distance(neighbor.position),
        });
    }

    /// Fit the cap normal and create the outward pole, plus the inward pole for degree >= 2
    pub fn compute_poles(&mut self, params: &SkinParams, sink: &mut impl MeshSink) {
        let degree = self.degree();
        if degree == 0 {
            return;
        }

        // Unit vectors pointing along the incident edges
        let directions: Vec<DVec3> = self
            .attachments
            .iter()
            .map(|a| (a.neighbor_position - self.position).normalize_or_zero())
            .collect();
        let vave = average(&directions);

        let normal = if vave.length() > MIN_AVERAGE_LENGTH {
            if degree < 3 {
                -vave.normalize()
            } else {
                -least_squares_normal(vave, &directions).normalize()
            }
        } else {
            self.warn(GeometryWarning::AmbiguousNormal { vertex: self.index });
            fallback_normal(&directions, vave)
        };
        self.normal = Some(normal);

        let average_length = self.attachments.iter().map(|a| a.length).sum::<f64>() / degree as f64;
        let scale = if params.proportional_scale && average_length > MIN_EDGE_LENGTH {
            average_length
        } else {
            1.0
        };

        let offset = params.outside_radius * scale + params.displacement();
        self.outward_pole = Some(sink.add_vertex(self.position + normal * offset));

        if degree > 1 {
            let offset = -params.inside_radius * scale + params.displacement();
            self.inward_pole = Some(sink.add_vertex(self.position + normal * offset));
        }
    }

    /// Build one profile per incident edge, ordered by angle around the normal
    ///
    /// `normals` holds the normal of every cap in the skin, indexed by vertex.
    pub fn compute_profiles(
        &mut self,
        normals: &[Option<DVec3>],
        params: &SkinParams,
        sink: &mut impl MeshSink,
    ) {
        let Some(normal) = self.normal else {
            return;
        };
        self.reorder_attachments(normal);

        let mut warnings = Vec::new();
        let mut profiles = Vec::with_capacity(self.attachments.len());
        for attachment in &self.attachments {
            let other_normal = normals
                .get(attachment.neighbor)
                .copied()
                .flatten()
                .unwrap_or(normal);
            profiles.push(self.build_profile(
                attachment,
                normal,
                other_normal,
                params,
                &mut *sink,
                &mut warnings,
            ));
        }

        for warning in warnings {
            self.warn(warning);
        }
        for profile in profiles {
            self.edge_profiles.insert(profile.edge, self.profiles.len());
            self.profiles.push(profile);
        }
    }

    /// Sort attachments by polar angle around `normal`, the first one staying at angle 0
    fn reorder_attachments(&mut self, normal: DVec3) {
        if self.attachments.len() < 2 {
            return;
        }

        let to_z = normal;
        let vedge = self.attachments[0].neighbor_position - self.position;
        let to_y = to_z
            .cross(vedge)
            .try_normalize()
            .unwrap_or_else(|| perpendicular(to_z));
        let to_x = to_y.cross(to_z).normalize();

        let mut rest: Vec<(f64, EdgeAttachment)> = self.attachments[1..]
            .iter()
            .map(|a| (polar_angle(a.neighbor_position - self.position, to_x, to_y), *a))
            .collect();
        // Stable, so edges at equal angles keep registration order
        rest.sort_by(|a, b| a.0.total_cmp(&b.0));

        self.attachments.truncate(1);
        self.attachments.extend(rest.into_iter().map(|(_, a)| a));
    }

    fn build_profile(
        &self,
        attachment: &EdgeAttachment,
        normal: DVec3,
        other_normal: DVec3,
        params: &SkinParams,
        sink: &mut impl MeshSink,
        warnings: &mut Vec<GeometryWarning>,
    ) -> Profile {
        // A zero-length edge keeps absolute sizes instead of collapsing the profile
        let scale = if params.proportional_scale && attachment.length > MIN_EDGE_LENGTH {
            attachment.length
        } else {
            1.0
        };
        let dist = params.dist * scale;
        let width_2 = params.width_2 * scale;
        let height_2 = params.height_2 * scale;

        // Blend towards the neighbouring cap's normal so the tube twists smoothly
        let mut vpole = normal;
        let etangent = if attachment.length > MIN_EDGE_LENGTH {
            let proportion = (dist / attachment.length).min(0.5);
            vpole = normal * (1.0 - proportion) + other_normal * proportion;
            (attachment.neighbor_position - self.position) / attachment.length
        } else {
            warnings.push(GeometryWarning::DegenerateEdge {
                vertex: self.index,
                edge: attachment.edge,
            });
            perpendicular(normal)
        };

        let mut ecenter = self.position + etangent * dist;

        // A leaf's normal runs along its only edge, so its frame always needs the nudge
        if self.degree() < 2 {
            vpole = perturbed_pole(etangent);
        } else if vpole.cross(etangent).length() < MIN_FRAME_SINE {
            warnings.push(GeometryWarning::ParallelProfileFrame {
                vertex: self.index,
                edge: attachment.edge,
            });
            vpole = perturbed_pole(etangent);
        }

        let binormal_dir = vpole.cross(etangent).normalize();
        let normal_dir = etangent.cross(binormal_dir).normalize();
        if let Some(displace) = params.displace {
            ecenter += normal_dir * displace;
        }
        let ebinormal = binormal_dir * width_2;
        let enormal = normal_dir * height_2;

        let positions = [
            ecenter + enormal + ebinormal,
            ecenter + enormal - ebinormal,
            ecenter - enormal - ebinormal,
            ecenter - enormal + ebinormal,
        ];

        Profile {
            edge: attachment.edge,
            vertices: positions.map(|p| sink.add_vertex(p)),
            positions,
        }
    }

    /// Emit the faces closing the joint; returns how many were added
    ///
    /// Degree >= 2: two cone triangles per profile plus a top triangle, bottom
    /// triangle and quad between each pair of neighbouring profiles. Degree 1: a
    /// four-triangle pyramid from the single pole.
    pub fn compute_intra_cap_faces(
        &mut self,
        params: &SkinParams,
        sink: &mut impl MeshSink,
    ) -> usize {
        let Some(outward) = self.outward_pole else {
            return 0;
        };
        let mut faces = 0;

        let Some(inward) = self.inward_pole else {
            for profile in &self.profiles {
                let p = profile.vertices;
                for i in 0..4 {
                    sink.add_triangle(outward, p[(i + 1) % 4], p[i]);
                    faces += 1;
                }
            }
            return faces;
        };

        for profile in &self.profiles {
            let p = profile.vertices;
            sink.add_triangle(inward, p[3], p[2]);
            sink.add_triangle(outward, p[1], p[0]);
            faces += 2;
        }

        let count = self.profiles.len();
        for i in 0..count {
            let this = self.profiles[i].vertices;
            let next = self.profiles[(i + 1) % count].vertices;

            sink.add_triangle(outward, this[0], next[1]);
            sink.add_triangle(inward, next[2], this[3]);
            sink.add_quad(this[0], this[3], next[2], next[1]);
            faces += 3;

            if params.crease.is_some() {
                self.creased_edges.push((this[0], next[1]));
                self.creased_edges.push((next[2], this[3]));
            }
        }

        faces
    }

    pub fn creased_edges(&self) -> &[(VertexHandle, VertexHandle)] {
        &self.creased_edges
    }

    pub fn apply_creases(&self, sink: &mut impl MeshSink, value: f64) {
        for &(a, b) in &self.creased_edges {
            sink.set_crease(a, b, value);
        }
    }

    fn warn(&mut self, warning: GeometryWarning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Normal for a cap whose incident directions cancel out
///
/// Three or more edges still span a plane, so its normal is used with the
/// dominant component made positive. Otherwise take the perpendicular of the
/// first edge.
fn fallback_normal(directions: &[DVec3], centroid: DVec3) -> DVec3 {
    if directions.len() >= 3
        && let Some(n) = fit_plane_normal(directions, centroid).and_then(DVec3::try_normalize)
    {
        let a = n.abs();
        let dominant = if a.x >= a.y && a.x >= a.z {
            n.x
        } else if a.y >= a.z {
            n.y
        } else {
            n.z
        };
        return if dominant < 0.0 { -n } else { n };
    }
    perpendicular(directions[0])
}

/// Up reference that is never parallel to `etangent`
fn perturbed_pole(etangent: DVec3) -> DVec3 {
    let axis = DVec3::X;
    if (axis.dot(etangent).abs() - etangent.length()).abs() > 1e-4 {
        etangent + axis
    } else {
        etangent + DVec3::new(1.0, 1.0, 0.0)
    }
}
