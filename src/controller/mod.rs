// CONTROLLER: Input, frame update, and per-frame session state
pub mod input;
pub mod frame_updater;
pub mod frame_loop;

pub use input::{InputState, InputProcessor, KeyBindings};
pub use frame_updater::{DepthOrder, FrameUpdate, FrameUpdater, Rotation, RotationInputs};
pub use frame_loop::{FrameLoopContext, FrameStats, TransformUniform, ColorUniform};
