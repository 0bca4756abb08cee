//! Visualization builder and the windowed event loop.
//!
//! Each redraw runs one detection tick and then one animation frame, both on
//! the event-loop thread. Closing the window stops both.

use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animation::{Animator, ParticleInstance, StarInstance};
use crate::capture::{
    CaptureRequest, CaptureSurface, HandLandmarker, LandmarkerLoader, NoCamera, ReplayLoader,
};
use crate::config::VisualizationConfig;
use crate::control::{CaptureStatus, GestureCell};
use crate::error::{CaptureError, RunError};
use crate::gesture::Gesture;
use crate::gpu::{Camera, GpuState};
use crate::input::{Input, KeyCode};
use crate::mix::MixDriver;
use crate::particle::{generate_particles, Particle};
use crate::time::FrameClock;

const TITLE: &str = "Gesture Tree";

/// Everything that advances per frame, independent of the window.
///
/// Owns the particles, the mix state and the capture surface. Headless
/// callers drive it with [`Scene::frame`].
pub struct Scene {
    particles: Vec<Particle>,
    animator: Animator,
    capture: CaptureSurface,
    gesture: GestureCell,
    instances: Vec<ParticleInstance>,
}

impl Scene {
    pub fn new(config: &VisualizationConfig, capture: CaptureSurface) -> Self {
        let particles = generate_particles(config);
        log::info!("Generated {} particles", particles.len());

        let driver = MixDriver::new(config.mix_smoothing, config.star_smoothing);
        let gesture = capture.cell().clone();
        Self {
            instances: Vec::with_capacity(particles.len()),
            particles,
            animator: Animator::new(driver, config.star_position),
            capture,
            gesture,
        }
    }

    /// Run detection and animation for one frame at `time` seconds.
    pub fn frame(&mut self, time: f32) -> StarInstance {
        let timestamp = Duration::try_from_secs_f32(time.max(0.0)).unwrap_or(Duration::ZERO);
        let gesture = self.capture.tick(timestamp);
        self.animator
            .frame(gesture, time, &self.particles, &mut self.instances)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Transforms computed by the last [`Scene::frame`].
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn mix(&self) -> f32 {
        self.animator.mix()
    }

    /// The shared gesture; manual controls write here.
    pub fn gesture(&self) -> &GestureCell {
        &self.gesture
    }

    pub fn status(&self) -> &CaptureStatus {
        self.capture.status()
    }

    /// Block until the landmark backend has loaded or failed.
    pub fn wait_for_capture(&mut self, timeout: Duration) -> &CaptureStatus {
        self.capture.wait_ready(timeout)
    }
}

/// A gesture-driven particle tree.
///
/// ```ignore
/// Visualization::new(VisualizationConfig::default())
///     .with_recording("hands.json")
///     .run()?;
/// ```
pub struct Visualization {
    config: VisualizationConfig,
    loader: Option<Box<dyn LandmarkerLoader>>,
}

impl Visualization {
    pub fn new(config: VisualizationConfig) -> Self {
        Self { config, loader: None }
    }

    /// Use a custom camera/model backend.
    pub fn with_landmarker<L: LandmarkerLoader>(mut self, loader: L) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Replay a landmark recording instead of a live camera.
    pub fn with_recording(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.capture.recording = Some(path.into());
        self
    }

    /// Build the scene and start capture without opening a window.
    pub fn into_scene(self) -> Result<Scene, RunError> {
        self.config.validate()?;

        let cell = GestureCell::new();
        let capture = if self.config.capture.manual_only {
            CaptureSurface::manual(cell)
        } else {
            let request = CaptureRequest {
                width: self.config.capture.width,
                height: self.config.capture.height,
                ..CaptureRequest::default()
            };
            let recording = self.config.capture.recording.clone();
            let loader: Box<dyn LandmarkerLoader> = match (self.loader, recording) {
                (Some(loader), _) => loader,
                (None, Some(path)) => Box::new(ReplayLoader::new(path)),
                (None, None) => Box::new(NoCamera),
            };
            CaptureSurface::start(BoxedLoader(loader), request, cell)
        };

        Ok(Scene::new(&self.config, capture))
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), RunError> {
        let camera_config = self.config.camera.clone();
        let particle_count = self.config.particle_count;
        let scene = self.into_scene()?;
        let camera = Camera::new(&camera_config);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            window: None,
            gpu_state: None,
            camera: Some(camera),
            particle_count,
            scene,
            clock: FrameClock::new(),
            input: Input::new(),
            title: String::new(),
            exit_requested: false,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Adapts an already boxed loader back into a `LandmarkerLoader`.
struct BoxedLoader(Box<dyn LandmarkerLoader>);

impl LandmarkerLoader for BoxedLoader {
    fn load(
        self: Box<Self>,
        request: CaptureRequest,
    ) -> Result<Box<dyn HandLandmarker + Send>, CaptureError> {
        self.0.load(request)
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    camera: Option<Camera>,
    particle_count: u32,
    scene: Scene,
    clock: FrameClock,
    input: Input,
    title: String,
    exit_requested: bool,
    error: Option<RunError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());
        window.request_redraw();

        let camera = self.camera.take().unwrap_or_default();
        let gpu_state = pollster::block_on(GpuState::new(window, self.particle_count, camera))?;
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn update(&mut self) {
        let previous = self.clock.seconds();
        let time = self.clock.tick();
        let dt = time - previous;

        for control in self.input.manual_controls() {
            control.apply(self.scene.gesture());
        }

        let star = self.scene.frame(time);
        let gesture = self.scene.gesture().get();

        if let Some(gpu_state) = &mut self.gpu_state {
            let drag = self.input.drag_delta();
            gpu_state.camera.orbit(drag.x, drag.y);
            gpu_state.camera.zoom(self.input.scroll_delta());
            if matches!(gesture, Gesture::Fist | Gesture::None) {
                gpu_state.camera.auto_rotate(dt);
            }
        }
        self.input.begin_frame();

        let title = format!("{TITLE} - {}", self.scene.status().status_line(gesture));
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(time, self.scene.instances(), &star) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.resize(winit::dpi::PhysicalSize {
                        width: gpu_state.config.width,
                        height: gpu_state.config.height,
                    })
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory; closing");
                    self.exit_requested = true;
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Failed to start renderer: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed after {} frames", self.clock.frame());
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.update();
                if self.exit_requested {
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
