use glam::Mat4;

use crate::controller::frame_updater::{DepthOrder, FrameUpdate, FrameUpdater, RotationInputs};
use crate::model::Camera;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(model: Mat4, camera: &Camera) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            projection: camera.projection().to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorUniform {
    pub color: [f32; 4],
}

/// Frames-per-second estimate refreshed once per second.
#[derive(Debug, Default)]
pub struct FrameStats {
    pub fps: f32,
    pub frames: u64,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameStats {
    pub fn tick(&mut self, dt: f32) {
        self.frames += 1;
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }
    }
}

/// Session state threaded through the frames: the accumulated rotation and
/// the most recent update.
pub struct FrameLoopContext {
    pub updater: FrameUpdater,
    pub rotation: Mat4,
    pub last_update: Option<FrameUpdate>,
    pub stats: FrameStats,
}

impl FrameLoopContext {
    pub fn new(updater: FrameUpdater) -> Self {
        Self {
            updater,
            rotation: Mat4::IDENTITY,
            last_update: None,
            stats: FrameStats::default(),
        }
    }

    /// Advance one frame and keep the new rotation for the next one.
    pub fn update(&mut self, inputs: RotationInputs, dt: f32) -> FrameUpdate {
        self.stats.tick(dt);
        let update = self.updater.update(self.rotation, inputs);
        self.rotation = update.transform;
        self.last_update = Some(update);
        update
    }

    pub fn depth_order(&self) -> DepthOrder {
        self.updater.depth_order
    }

    pub fn toggle_depth_order(&mut self) -> DepthOrder {
        self.updater.depth_order = self.updater.depth_order.toggled();
        tracing::info!("depth order switched to {}", self.updater.depth_order);
        self.updater.depth_order
    }
}
