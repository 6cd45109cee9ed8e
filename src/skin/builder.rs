use glam::DVec3;

use super::{ProfileConnector, VertexCap};
use crate::config::{ShapeConfig, SkinParams};
use crate::domain::Wireframe;
use crate::error::{GeometryWarning, SkinResult};
use crate::mesh::{MeshSink, SkinMesh};

/// Counts and warnings from one skin build
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildReport {
    pub caps: usize,
    pub connectors: usize,
    pub poles: usize,
    pub profiles: usize,
    pub cap_faces: usize,
    pub connector_faces: usize,
    pub warnings: Vec<GeometryWarning>,
}

impl BuildReport {
    pub fn vertices(&self) -> usize {
        self.poles + self.profiles * 4
    }

    pub fn faces(&self) -> usize {
        self.cap_faces + self.connector_faces
    }
}

/// Drives the skinning phases over a whole wireframe
///
/// Each phase completes for every cap before the next begins; profiles read the
/// normals of neighbouring caps, so all poles must exist first.
pub struct SkinBuilder<'a> {
    wireframe: &'a Wireframe,
    params: SkinParams,
    caps: Vec<VertexCap>,
    connectors: Vec<ProfileConnector>,
}

impl<'a> SkinBuilder<'a> {
    /// Validate the configuration and wireframe; no geometry is built yet
    pub fn new(wireframe: &'a Wireframe, config: &ShapeConfig) -> SkinResult<Self> {
        let params = config.validate()?;
        wireframe.validate()?;
        Ok(Self {
            wireframe,
            params,
            caps: Vec::new(),
            connectors: Vec::new(),
        })
    }

    pub fn caps(&self) -> &[VertexCap] {
        &self.caps
    }

    pub fn connectors(&self) -> &[ProfileConnector] {
        &self.connectors
    }

    /// Run every phase, writing geometry into `sink`
    ///
    /// Building again starts from scratch.
    pub fn build_into(&mut self, sink: &mut impl MeshSink) -> SkinResult<BuildReport> {
        let mut report = BuildReport::default();

        self.create_vertex_caps();
        self.register_edges();
        log::debug!(
            "registered {} edges on {} caps",
            self.wireframe.edge_count(),
            self.caps.len()
        );

        self.compute_poles(sink);
        self.compute_profiles(sink);
        log::debug!("computed poles and profiles");

        report.cap_faces = self.compute_cap_faces(sink);
        report.connector_faces = self.connect_profiles(sink)?;
        log::debug!(
            "emitted {} cap faces, {} wall faces",
            report.cap_faces,
            report.connector_faces
        );

        self.apply_creases(sink);

        report.caps = self.caps.len();
        report.connectors = self.connectors.len();
        for cap in &self.caps {
            report.poles += cap.pole_count();
            report.profiles += cap.profiles().len();
            report.warnings.extend_from_slice(cap.warnings());
        }

        log::info!(
            "skinned {} caps and {} edges: {} vertices, {} faces, {} warnings",
            report.caps,
            report.connectors,
            report.vertices(),
            report.faces(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn create_vertex_caps(&mut self) {
        self.caps = self.wireframe.iter_vertices().map(VertexCap::new).collect();
        self.connectors.clear();
    }

    fn register_edges(&mut self) {
        for (index, edge) in self.wireframe.edges.iter().enumerate() {
            let [a, b] = edge.vertices();
            self.caps[a].register_incident_edge(index, self.wireframe.vertex(b));
            self.caps[b].register_incident_edge(index, self.wireframe.vertex(a));
        }
    }

    fn compute_poles(&mut self, sink: &mut impl MeshSink) {
        for cap in &mut self.caps {
            cap.compute_poles(&self.params, sink);
        }
    }

    fn compute_profiles(&mut self, sink: &mut impl MeshSink) {
        let normals: Vec<Option<DVec3>> = self.caps.iter().map(VertexCap::normal).collect();
        for cap in &mut self.caps {
            cap.compute_profiles(&normals, &self.params, sink);
        }
    }

    fn compute_cap_faces(&mut self, sink: &mut impl MeshSink) -> usize {
        self.caps
            .iter_mut()
            .map(|cap| cap.compute_intra_cap_faces(&self.params, sink))
            .sum()
    }

    fn connect_profiles(&mut self, sink: &mut impl MeshSink) -> SkinResult<usize> {
        let mut faces = 0;
        for (index, edge) in self.wireframe.edges.iter().enumerate() {
            let mut connector = ProfileConnector::new(index, *edge);
            faces += connector.join_profiles(&self.caps, &self.params, sink)?;
            self.connectors.push(connector);
        }
        Ok(faces)
    }

    fn apply_creases(&self, sink: &mut impl MeshSink) {
        if let Some(crease) = self.params.crease {
            for cap in &self.caps {
                cap.apply_creases(sink, crease);
            }
        }
        if let Some(crease) = self.params.connector_crease {
            for connector in &self.connectors {
                connector.apply_creases(sink, crease);
            }
        }
    }
}

/// Skin a wireframe into a new mesh
pub fn build_skin(wireframe: &Wireframe, config: &ShapeConfig) -> SkinResult<SkinMesh> {
    let mut mesh = SkinMesh::new();
    SkinBuilder::new(wireframe, config)?.build_into(&mut mesh)?;
    Ok(mesh)
}
