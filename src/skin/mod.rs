//! Tube skin around a wireframe
//!
//! Every wireframe vertex gets a [`VertexCap`] holding its poles and one square
//! profile per incident edge. A [`ProfileConnector`] walls in each edge between
//! the two profiles facing each other.

pub mod builder;
pub mod connector;
pub mod vertex_cap;

pub use builder::{BuildReport, SkinBuilder, build_skin};
pub use connector::{ProfileConnector, Winding, match_profiles};
pub use vertex_cap::{EdgeAttachment, Profile, VertexCap};
