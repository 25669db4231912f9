use egui::Context;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::controller::{DepthOrder, KeyBindings, RotationInputs};
use crate::model::FACE_COUNT;

/// Values shown in the debug panel for one frame.
pub struct OverlayStats {
    pub fps: f32,
    pub depth_order: DepthOrder,
    pub face_order: [usize; FACE_COUNT],
    pub draw_order: [usize; FACE_COUNT],
    pub held: RotationInputs,
}

/// egui debug panel drawn over the cube
pub struct Overlay {
    pub visible: bool,
    ctx: Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    help: String,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat, bindings: &KeyBindings, visible: bool) -> Self {
        let ctx = Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            visible,
            ctx,
            state,
            renderer,
            help: help_text(bindings),
        }
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Records the panel into its own render pass on top of `target`.
    /// Returns any extra command buffers egui needs submitted first.
    pub fn paint(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        stats: &OverlayStats,
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.state.take_egui_input(window);
        let visible = self.visible;
        let help = self.help.as_str();
        let output = self.ctx.run(raw_input, |ctx| {
            if visible {
                draw_debug_window(ctx, stats, help);
            }
        });
        self.state.handle_platform_output(window, output.platform_output);

        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        };

        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        let extra = self.renderer.update_buffers(device, queue, encoder, &primitives, &screen_descriptor);

        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer.render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        extra
    }
}

fn draw_debug_window(ctx: &Context, stats: &OverlayStats, help: &str) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([180.0, 120.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", stats.fps)).small());
            ui.label(egui::RichText::new(format!("Depth order: {}", stats.depth_order)).small());
            ui.label(egui::RichText::new(format!("By depth: {}", format_order(&stats.face_order))).small());
            ui.label(egui::RichText::new(format!("Drawn: {}", format_order(&stats.draw_order))).small());
            ui.label(egui::RichText::new(format!("Held: {}", format_held(&stats.held))).small());
            ui.separator();
            ui.label(egui::RichText::new(help).small().weak());
        });
}

pub fn format_order(order: &[usize; FACE_COUNT]) -> String {
    order.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn format_held(held: &RotationInputs) -> String {
    let names: Vec<String> = held.held().map(|r| format!("{r:?}")).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn help_text(bindings: &KeyBindings) -> String {
    format!(
        "{:?}/{:?} pitch  {:?}/{:?} yaw\n{:?}/{:?} roll  {:?} depth order\n{:?} panel  {:?} quit",
        bindings.pitch_up,
        bindings.pitch_down,
        bindings.yaw_left,
        bindings.yaw_right,
        bindings.roll_cw,
        bindings.roll_ccw,
        bindings.toggle_depth_order,
        bindings.toggle_overlay,
        bindings.quit,
    )
}
