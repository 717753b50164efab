// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod gauge;
pub mod raster;
pub mod scene;
pub mod telemetry;
pub mod transform;

pub use gauge::{GaugeState, Projection, GAUGE_CIRCLE_RADIUS};
pub use scene::{render_gauge, DrawCommand, GaugePalette, Scene};
pub use telemetry::{Field, SimulatedFeed, TelemetryBinding};
pub use transform::{Color, Color4, NormColor3, NormColor4, NormPoint, PixelPoint, Viewport};

// External crate imports
use bon::Builder;
use pixels::{Pixels, SurfaceTexture};
use raster::{Canvas, RasterBackend};
use rusttype::Font;

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for type-safe gauge updates from another thread.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    /// One telemetry sample; abnormal magnitudes are dropped by the
    /// binding, not applied.
    Telemetry(Field, f64),
    SetRadius(f64),
    SetRadiusRange(f64, f64),
    SetRadiusScaleStep(f64),
    /// Grow/shrink the radius window by whole scale steps.
    Zoom(i32),
}

/// Main widget struct - the primary public interface.
#[derive(Debug)]
pub struct LandingAssist {
    config: LandingAssistConfig,
    state: GaugeState,
    telemetry: TelemetryBinding,
}

#[derive(Debug, Clone, Builder)]
pub struct LandingAssistConfig {
    #[builder(default = "Landing Assist".to_string())]
    pub title: String,

    // Window configuration
    #[builder(default = 400)]
    pub window_width: usize,
    #[builder(default = 400)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    // Radius window
    #[builder(default = 50.0)]
    pub min_radius: f64,
    #[builder(default = 2000.0)]
    pub max_radius: f64,
    #[builder(default = 500.0)]
    pub radius: f64,
    #[builder(default = 25.0)]
    pub radius_scale_step: f64,

    // Appearance
    #[builder(default)]
    pub palette: GaugePalette,
    #[builder(default = 12.0)]
    pub label_font_size: f32,

    // Font configuration
    #[builder(default = include_bytes!("DejaVuSans-Bold.ttf"))]
    pub font_data: &'static [u8],
}

impl LandingAssist {
    pub fn new(config: LandingAssistConfig) -> Self {
        let mut state = GaugeState::new();
        state.set_radius_range(config.min_radius, config.max_radius);
        state.set_radius(config.radius);
        state.set_radius_scale_step(config.radius_scale_step);
        state.recompute();

        Self {
            config,
            state,
            telemetry: TelemetryBinding::new(),
        }
    }

    /// Feed one telemetry sample through the abnormal-value guard.
    pub fn set_telemetry(&mut self, field: Field, value: f64) {
        self.telemetry.apply(&mut self.state, field, value);
    }

    pub fn apply_command(&mut self, command: GaugeCommand) {
        match command {
            GaugeCommand::Telemetry(field, value) => {
                self.telemetry.apply(&mut self.state, field, value);
            }
            GaugeCommand::SetRadius(r) => self.state.set_radius(r),
            GaugeCommand::SetRadiusRange(min, max) => self.state.set_radius_range(min, max),
            GaugeCommand::SetRadiusScaleStep(step) => self.state.set_radius_scale_step(step),
            GaugeCommand::Zoom(steps) => self.state.zoom(steps),
        }
    }

    /// Recompute the derived projection from the current raw state.
    pub fn recompute(&mut self) {
        self.state.recompute();
    }

    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    pub fn projection(&self) -> &Projection {
        self.state.projection()
    }

    pub fn telemetry(&self) -> &TelemetryBinding {
        &self.telemetry
    }

    /// Open the widget window and run until it is closed.
    pub fn show(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    /// Open the widget window, draining `receiver` once per frame so the
    /// projection is recomputed and drawn as a unit.
    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn run_window(
        &mut self,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let logical_width = self.config.window_width;
        let logical_height = self.config.window_height;
        let title = self.config.title.clone();

        let font = Font::try_from_bytes(self.config.font_data).ok_or("invalid font data")?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        // keep drawing into the old buffer if the resize
                        // fails, so frame and dimensions stay in step
                        if pixels.resize_buffer(new_size.width, new_size.height).is_ok() {
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                        }
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let y = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y as f64,
                            MouseScrollDelta::PixelDelta(p) => p.y,
                        };
                        // signum(0.0) is 1.0, so spell the sign out
                        let steps = if y > 0.0 {
                            1
                        } else if y < 0.0 {
                            -1
                        } else {
                            0
                        };
                        if steps != 0 {
                            self.state.zoom(steps);
                            log::debug!(
                                "radius: {} {} {}",
                                self.state.min_radius(),
                                self.state.max_radius(),
                                self.state.radius()
                            );
                        }
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        // drag-to-move, same as the original card
                        let _ = window_clone.drag_window();
                    }
                    WindowEvent::RedrawRequested => {
                        // Single update pass: commands, recompute, draw.
                        // Nothing reads the projection between these
                        // steps, so a frame never sees it half updated.
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                self.apply_command(command);
                            }
                        }
                        self.state.recompute();

                        let mut scene = Scene::new();
                        render_gauge(&mut scene, self.state.projection(), &self.config.palette);

                        let frame = pixels.frame_mut();
                        let canvas = Canvas::new(frame, fb_width, fb_height);
                        let viewport = Viewport::new(0, 0, fb_width as i32, fb_height as i32);
                        let mut backend = RasterBackend::new(
                            canvas,
                            viewport,
                            &font,
                            self.config.label_font_size,
                        );
                        backend.execute(&scene);
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
