pub mod builder;
pub mod json;
pub mod obj;
pub mod stl;
pub mod validation;

pub use builder::{EdgeKey, Face, FaceHandle, MeshSink, SkinMesh, Triangle, VertexHandle};
pub use json::write_json;
pub use obj::write_obj;
pub use stl::{write_mesh_stl, write_stl};
pub use validation::{ValidationResult, validate_mesh};
