// MODEL: Cube geometry and viewing parameters
pub mod cube;
pub mod camera;

pub use cube::{Mesh, Vertex, FACE_COUNT, FACE_COLORS};
pub use camera::Camera;
