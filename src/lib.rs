//! wireskin - Generate closed tube meshes around 3D wireframes
//!
//! Each wireframe vertex becomes a cap with one or two poles and a square
//! profile per incident edge; each edge becomes four wall quads joining the
//! profiles at its two ends.

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod skin;

pub use config::{FileConfig, ShapeConfig};
pub use domain::{Wireframe, WireframeEdge};
pub use error::{GeometryWarning, SkinError, SkinResult};
pub use mesh::{MeshSink, SkinMesh};
pub use skin::{BuildReport, SkinBuilder, build_skin};
