use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use spincube::{config::Settings, logging, ui, model, view, controller};

use controller::{FrameLoopContext, FrameUpdater, InputProcessor, InputState, TransformUniform};
use model::Camera;
use view::{CubeRenderer, GpuContext};

/// Window-bound resources, created once the event loop is running.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: CubeRenderer,
    overlay: ui::Overlay,
    camera: Camera,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &Settings, input: &InputProcessor) -> Result<Self> {
        let window_attributes = Window::default_attributes()
            .with_title(settings.title.as_str())
            .with_inner_size(PhysicalSize::new(settings.window_width, settings.window_height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone(), settings.present_mode()))
            .context("failed to initialize graphics")?;
        let (width, height) = (gpu.config.width, gpu.config.height);

        let renderer = CubeRenderer::new(&gpu.device, gpu.format, width, height)?;
        tracing::debug!("cube uploaded: {} indices", renderer.index_count());

        let overlay = ui::Overlay::new(&window, &gpu.device, gpu.format, input.bindings(), settings.show_overlay);

        Ok(Self {
            window,
            gpu,
            renderer,
            overlay,
            camera: Camera::new(width, height),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if self.gpu.resize(size.width, size.height) {
            self.renderer.resize(&self.gpu.device, size.width, size.height);
            self.camera.set_aspect(size.width, size.height);
            tracing::debug!("resized to {}x{}", size.width, size.height);
        }
    }
}

struct App {
    settings: Settings,
    graphics: Option<Graphics>,
    input_state: InputState,
    input_processor: InputProcessor,
    frame: FrameLoopContext,
    last_frame_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(settings: Settings) -> Self {
        let updater = FrameUpdater::new(settings.rotation_step, settings.depth_order);
        Self {
            settings,
            graphics: None,
            input_state: InputState::new(),
            input_processor: InputProcessor::default(),
            frame: FrameLoopContext::new(updater),
            last_frame_time: Instant::now(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if !self.input_state.process_key(code, event.state) {
            return;
        }

        if self.input_processor.wants_to_quit(code) {
            tracing::info!("quit requested");
            event_loop.exit();
        } else if self.input_processor.wants_to_toggle_depth_order(code) {
            self.frame.toggle_depth_order();
        } else if self.input_processor.wants_to_toggle_overlay(code) {
            if let Some(graphics) = self.graphics.as_mut() {
                graphics.overlay.toggle();
            }
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        let inputs = self.input_processor.rotation_inputs(&self.input_state);
        let update = self.frame.update(inputs, dt);

        let Some(graphics) = self.graphics.as_mut() else {
            return Ok(());
        };

        let output = graphics.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        graphics
            .renderer
            .write_transforms(&graphics.gpu.queue, &TransformUniform::new(update.transform, &graphics.camera));

        let mut encoder = graphics.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });
        let draw_order = update.draw_order();
        graphics.renderer.encode(&mut encoder, &view, &draw_order);

        let stats = ui::OverlayStats {
            fps: self.frame.stats.fps,
            depth_order: update.depth_order,
            face_order: update.face_order,
            draw_order,
            held: inputs,
        };
        let size = [graphics.gpu.config.width, graphics.gpu.config.height];
        let extra = graphics.overlay.paint(
            &graphics.window,
            &graphics.gpu.device,
            &graphics.gpu.queue,
            &mut encoder,
            &view,
            size,
            &stats,
        );

        graphics
            .gpu
            .queue
            .submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
        graphics.window.pre_present_notify();
        output.present();

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.settings, &self.input_processor) {
            Ok(graphics) => {
                tracing::info!(
                    "window ready: depth order {}, step {} rad/frame, vsync {}",
                    self.frame.depth_order(),
                    self.settings.rotation_step,
                    self.settings.vsync
                );
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
                self.last_frame_time = Instant::now();
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(graphics) = self.graphics.as_mut() else {
            return;
        };
        if window_id != graphics.window.id() {
            return;
        }
        if graphics.overlay.on_window_event(&graphics.window, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => graphics.resize(size),
            WindowEvent::Focused(false) => self.input_state.clear_keys(),
            WindowEvent::KeyboardInput { ref event, .. } => self.handle_key(event_loop, event),
            WindowEvent::RedrawRequested => match self.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    if let Some(graphics) = self.graphics.as_ref() {
                        graphics.gpu.reconfigure();
                    }
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    self.fail(event_loop, anyhow::anyhow!("GPU ran out of memory"));
                }
                Err(e) => tracing::warn!("dropped frame: {e:?}"),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = self.graphics.as_ref() {
            graphics.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("exiting after {} frames", self.frame.stats.frames);
    }
}

fn main() -> Result<()> {
    logging::init();

    let settings = Settings::from_env();
    tracing::debug!("{settings:?}");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(settings);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with error")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
