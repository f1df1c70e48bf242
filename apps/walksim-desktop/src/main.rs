use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walksim_common::{DemoConfig, MovementMode, WindowConfig};
use walksim_input::{Action, InputState, KeyBindings};
use walksim_render::{FirstPersonCamera, Scene};
use walksim_render_wgpu::WgpuRenderer;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "walksim-desktop", about = "First-person walking simulator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the texture image
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Override the OBJ model
    #[arg(long)]
    model: Option<PathBuf>,

    /// Keep movement on the horizontal plane
    #[arg(long)]
    walk: bool,
}

/// Simulation-side state: everything that survives without a GPU.
struct AppState {
    scene: Scene,
    camera: FirstPersonCamera,
    input: InputState,
    show_hud: bool,
    focused: bool,
    started: Instant,
    last_frame: Instant,
    fps: f32,
}

impl AppState {
    fn new(scene: Scene, config: &DemoConfig) -> Self {
        let window = &config.window;
        let aspect = window.width as f32 / window.height.max(1) as f32;
        let now = Instant::now();
        Self {
            scene,
            camera: FirstPersonCamera::from_config(&config.camera, aspect),
            input: InputState::new(KeyBindings::default()),
            show_hud: false,
            focused: true,
            started: now,
            last_frame: now,
            fps: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        let look = self.input.take_mouse_delta();
        self.camera.rotate(look.x, look.y);

        let intent = self.input.movement();
        if !intent.is_idle() {
            self.camera.apply_movement(intent.forward, intent.strafe, dt);
        }

        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
    }

    /// Returns true when the key asks to leave the render loop.
    fn handle_key(&mut self, key: winit::keyboard::KeyCode, pressed: bool, repeat: bool) -> bool {
        match self.input.handle_key(key, pressed, repeat) {
            Some(Action::Quit) => return true,
            Some(Action::ToggleHud) => {
                self.show_hud = !self.show_hud;
                tracing::debug!("hud {}", if self.show_hud { "on" } else { "off" });
            }
            _ => {}
        }
        false
    }

    /// egui only buffers input while the HUD is up; nothing drains it otherwise.
    fn hud_wants_events(&self) -> bool {
        self.show_hud
    }

    fn model(&self) -> glam::Mat4 {
        self.scene.model_at(self.started.elapsed().as_secs_f32())
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        let cam = &self.camera;
        egui::Window::new("hud")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .show(ctx, |ui| {
                ui.label(format!("{:.0} fps", self.fps));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    cam.position.x, cam.position.y, cam.position.z
                ));
                ui.label(format!(
                    "Yaw {:.1}  Pitch {:.1}",
                    cam.yaw.to_degrees(),
                    cam.pitch.to_degrees()
                ));
                let mode = match cam.mode {
                    MovementMode::Fly => "fly",
                    MovementMode::Walk => "walk",
                };
                ui.label(format!("Mode: {mode}"));
                ui.separator();
                ui.small("WASD: Move | Mouse: Look | F1: HUD | Esc: Quit");
            });
    }
}

/// Window, surface and device, created once the event loop is running.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        window_config: &WindowConfig,
        scene: &Scene,
        egui_ctx: &EguiContext,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("walksim_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            scene,
        )?;

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&device, renderer.surface_format(), None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend ({})",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    /// Relative mouse mode: lock (or at least confine) and hide the cursor.
    fn capture_cursor(&self, capture: bool) {
        if capture {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("cursor grab unavailable: {e}");
            }
        } else if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("failed to release cursor: {e}");
        }
        self.window.set_cursor_visible(!capture);
    }

    fn draw_hud(
        &mut self,
        egui_ctx: &EguiContext,
        view: &wgpu::TextureView,
        run_ui: impl FnMut(&EguiContext),
    ) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, run_ui);
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    state: AppState,
    window_config: WindowConfig,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    /// Initialization failure to report once the event loop has exited.
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(scene: Scene, config: &DemoConfig) -> Self {
        Self {
            state: AppState::new(scene, config),
            window_config: config.window.clone(),
            gpu: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            &self.state.camera,
            self.state.model(),
        );

        if self.state.show_hud {
            let state = &self.state;
            gpu.draw_hud(&self.egui_ctx, &view, |ctx| state.draw_hud(ctx));
        } else {
            // Events queued on the frame the HUD was hidden.
            let _ = gpu.egui_winit.take_egui_input(&gpu.window);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(
            event_loop,
            &self.window_config,
            &self.state.scene,
            &self.egui_ctx,
        ) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.set_viewport(size.width, size.height);
                gpu.capture_cursor(true);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("initialization failed: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = self.gpu.as_mut().filter(|_| self.state.hud_wants_events()) {
            // The HUD is passive; egui only needs to see events, never consume them.
            let _ = gpu.egui_winit.on_window_event(&gpu.window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state
                        .camera
                        .set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(focused) => {
                self.state.focused = focused;
                if !focused {
                    self.state.input.clear();
                }
                if let Some(gpu) = &self.gpu {
                    gpu.capture_cursor(focused);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if self.state.handle_key(key, pressed, repeat) {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            DeviceEvent::MouseMotion { delta } if self.state.focused => {
                self.state.input.add_mouse_motion(delta.0, delta.1);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = DemoConfig::load_or_default(cli.config.as_deref())?;
    if let Some(texture) = &cli.texture {
        config.assets.texture = texture.clone();
    }
    if let Some(model) = &cli.model {
        config.assets.model = Some(model.clone());
    }
    if cli.walk {
        config.camera.mode = MovementMode::Walk;
    }
    Ok(config)
}

fn load_scene(cli: &Cli) -> Result<(DemoConfig, Scene)> {
    let config = load_config(cli)?;
    let scene = Scene::load(&config).context("failed to load scene")?;
    Ok((config, scene))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::info!("walksim-desktop starting");

    let (config, scene) =
        load_scene(&cli).inspect_err(|e| tracing::error!("startup failed: {e:#}"))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(scene, &config);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.fatal.take() {
        return Err(e);
    }

    tracing::info!("walksim-desktop exiting");
    Ok(())
}
