// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::{CubeRenderer, MeshBuffer};
pub use gpu_init::GpuContext;
