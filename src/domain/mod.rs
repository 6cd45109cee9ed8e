pub mod wireframe;

pub use wireframe::{Wireframe, WireframeEdge, WireframeVertex};
