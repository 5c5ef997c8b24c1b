//! Frame driver and window-facing state
//!
//! `Renderer` owns the pixel buffer and the frame-local fragment list and runs
//! one complete frame at a time. Window code talks to it through the
//! `RenderSurface` callbacks; `AppState` bundles the renderer with the scene
//! inputs and the drag handling a window adapter needs.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::rasterizer::{
    resolve_fragments, Camera, Fragment, FragmentGenerator, Matrix4, PixelBuffer, Vector3,
};
use crate::scene::{ControlPoints, RenderParameters, TRANSLATE_MAX, TRANSLATE_MIN};

/// Repaint period of the render timer
pub const FRAME_PERIOD: Duration = Duration::from_millis(30);

/// Radians of rotation for a drag across the full unit range
const DRAG_ROTATION_SCALE: f32 = std::f32::consts::PI;

/// Timing and counts for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub fragments: usize,
    pub pixels_written: usize,
    pub elapsed: Duration,
}

/// Periodic repaint timer with explicit invalidation
#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    accumulated: Duration,
    invalidated: bool,
}

impl FrameClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulated: Duration::ZERO,
            // first tick always paints
            invalidated: true,
        }
    }

    /// Force a repaint on the next tick
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Advance by `dt`; returns true when a frame is due.
    ///
    /// At most one frame is reported per call, however much time has passed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.accumulated += dt;
        if self.invalidated || self.accumulated >= self.period {
            self.invalidated = false;
            self.accumulated = Duration::ZERO;
            true
        } else {
            false
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FRAME_PERIOD)
    }
}

/// Mouse buttons the drag handling distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer input in window pixel coordinates (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { button: DragButton, x: f32, y: f32, shift: bool },
    Move { x: f32, y: f32 },
    Release { x: f32, y: f32 },
}

/// Pointer input scaled to the unit sphere range (y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Begin { button: DragButton, x: f32, y: f32 },
    Continue { x: f32, y: f32 },
    End { x: f32, y: f32 },
}

/// Map window pixels to [-1, 1] using the smaller window dimension
pub fn scale_to_unit_sphere(px: f32, py: f32, width: usize, height: usize) -> (f32, f32) {
    let size = width.min(height).max(1) as f32;
    ((2.0 * px - size) / size, (size - 2.0 * py) / size)
}

/// Callbacks a window integration drives
pub trait RenderSurface {
    /// Render a complete frame and hand back the finished buffer
    fn on_paint(&mut self, params: &RenderParameters, points: &ControlPoints) -> &PixelBuffer;
    fn on_resize(&mut self, width: usize, height: usize);
    /// Scale a pointer event; the caller routes the result to its controller
    fn on_pointer_event(&mut self, event: PointerEvent) -> DragEvent;
}

/// Owns the frame buffer and runs the pipeline
pub struct Renderer {
    buffer: PixelBuffer,
    fragments: Vec<Fragment>,
    last_stats: FrameStats,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            fragments: Vec::new(),
            last_stats: FrameStats::default(),
        }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// One full frame: clear, camera, fragments, composite
    #[tracing::instrument(level = "debug", skip_all, fields(width = self.buffer.width, height = self.buffer.height))]
    pub fn render_frame(&mut self, params: &RenderParameters, points: &ControlPoints) -> FrameStats {
        let start = Instant::now();
        self.buffer.clear(params.clear_color);

        if self.buffer.width == 0 || self.buffer.height == 0 {
            self.last_stats = FrameStats::default();
            return self.last_stats;
        }

        let camera = Camera::new(self.buffer.width, self.buffer.height, params);
        FragmentGenerator::new(&camera, &mut self.fragments).generate(params, points);

        let composite = resolve_fragments(&mut self.buffer, &mut self.fragments);
        self.last_stats = FrameStats {
            fragments: composite.fragments,
            pixels_written: composite.pixels_written,
            elapsed: start.elapsed(),
        };

        debug!(
            fragments = self.last_stats.fragments,
            pixels = self.last_stats.pixels_written,
            ms = self.last_stats.elapsed.as_secs_f64() * 1000.0,
            "Frame rendered"
        );
        self.last_stats
    }
}

impl RenderSurface for Renderer {
    fn on_paint(&mut self, params: &RenderParameters, points: &ControlPoints) -> &PixelBuffer {
        self.render_frame(params, points);
        &self.buffer
    }

    fn on_resize(&mut self, width: usize, height: usize) {
        info!(width, height, "Viewport resized");
        self.buffer.resize(width, height);
    }

    fn on_pointer_event(&mut self, event: PointerEvent) -> DragEvent {
        let (w, h) = (self.buffer.width, self.buffer.height);
        match event {
            PointerEvent::Press { button, x, y, shift } => {
                let (x, y) = scale_to_unit_sphere(x, y, w, h);
                // shift-click counts as the secondary button
                let button = if shift { DragButton::Secondary } else { button };
                DragEvent::Begin { button, x, y }
            }
            PointerEvent::Move { x, y } => {
                let (x, y) = scale_to_unit_sphere(x, y, w, h);
                DragEvent::Continue { x, y }
            }
            PointerEvent::Release { x, y } => {
                let (x, y) = scale_to_unit_sphere(x, y, w, h);
                DragEvent::End { x, y }
            }
        }
    }
}

/// Turns scaled drags into parameter changes: primary rotates, secondary pans
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<(DragButton, f32, f32)>,
}

impl DragController {
    /// Apply a drag event; returns true when the parameters changed
    pub fn handle(&mut self, event: DragEvent, params: &mut RenderParameters) -> bool {
        match event {
            DragEvent::Begin { button, x, y } => {
                self.active = Some((button, x, y));
                false
            }
            DragEvent::Continue { x, y } => self.drag_to(x, y, params),
            DragEvent::End { x, y } => {
                let changed = self.drag_to(x, y, params);
                self.active = None;
                changed
            }
        }
    }

    fn drag_to(&mut self, x: f32, y: f32, params: &mut RenderParameters) -> bool {
        let Some((button, last_x, last_y)) = self.active else {
            return false;
        };
        let (dx, dy) = (x - last_x, y - last_y);
        self.active = Some((button, x, y));
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        match button {
            DragButton::Primary => {
                // Axis perpendicular to the drag, in the view plane
                let axis = Vector3::new(-dy, dx, 0.0);
                let angle = axis.length() * DRAG_ROTATION_SCALE;
                params.rotation = Matrix4::rotation(axis, angle) * params.rotation;
                true
            }
            DragButton::Secondary => {
                params.x_translate = (params.x_translate + dx).clamp(TRANSLATE_MIN, TRANSLATE_MAX);
                params.y_translate = (params.y_translate + dy).clamp(TRANSLATE_MIN, TRANSLATE_MAX);
                true
            }
            DragButton::Middle => false,
        }
    }
}

/// Everything a window needs between frames
pub struct AppState {
    pub params: RenderParameters,
    pub points: ControlPoints,
    pub renderer: Renderer,
    pub clock: FrameClock,
    pub drag: DragController,
}

impl AppState {
    pub fn new(params: RenderParameters, points: ControlPoints, width: usize, height: usize) -> Self {
        Self {
            params: params.clamped(),
            points,
            renderer: Renderer::new(width, height),
            clock: FrameClock::default(),
            drag: DragController::default(),
        }
    }

    /// Route raw pointer input through the renderer's scaling to the drag controller
    pub fn pointer(&mut self, event: PointerEvent) {
        let scaled = self.renderer.on_pointer_event(event);
        if self.drag.handle(scaled, &mut self.params) {
            self.clock.invalidate();
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let buffer = self.renderer.buffer();
        if buffer.width != width || buffer.height != height {
            self.renderer.on_resize(width, height);
            self.clock.invalidate();
        }
    }

    /// Render if the clock says a frame is due; returns the new frame if one was drawn
    pub fn update(&mut self, dt: Duration) -> Option<&PixelBuffer> {
        if !self.clock.tick(dt) {
            return None;
        }
        Some(self.renderer.on_paint(&self.params, &self.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_clock_period_and_invalidation() {
        let mut clock = FrameClock::default();
        assert!(clock.tick(Duration::ZERO));
        assert!(!clock.tick(Duration::from_millis(10)));
        assert!(clock.tick(Duration::from_millis(25)));
        assert!(!clock.tick(Duration::ZERO));
        clock.invalidate();
        assert!(clock.tick(Duration::ZERO));
        // a long stall still yields a single frame
        assert!(clock.tick(Duration::from_secs(2)));
        assert!(!clock.tick(Duration::ZERO));
    }

    #[test]
    fn test_scale_to_unit_sphere() {
        let (x, y) = scale_to_unit_sphere(0.0, 0.0, 200, 100);
        assert_relative_eq!(x, -1.0);
        assert_relative_eq!(y, 1.0);
        let (x, y) = scale_to_unit_sphere(50.0, 50.0, 200, 100);
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);
    }

    #[test]
    fn test_shift_click_is_secondary() {
        let mut r = Renderer::new(100, 100);
        let e = r.on_pointer_event(PointerEvent::Press {
            button: DragButton::Primary,
            x: 50.0,
            y: 50.0,
            shift: true,
        });
        assert_eq!(e, DragEvent::Begin { button: DragButton::Secondary, x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_primary_drag_rotates() {
        let mut params = RenderParameters::default();
        let mut drag = DragController::default();
        assert!(!drag.handle(DragEvent::Begin { button: DragButton::Primary, x: 0.0, y: 0.0 }, &mut params));
        assert!(drag.handle(DragEvent::Continue { x: 0.2, y: 0.0 }, &mut params));
        assert!(!params.rotation.approx_eq(&Matrix4::identity(), 1e-3));
        let r = params.rotation;
        assert!((r * r.transpose()).approx_eq(&Matrix4::identity(), 1e-4));
        drag.handle(DragEvent::End { x: 0.2, y: 0.0 }, &mut params);
        assert!(!drag.handle(DragEvent::Continue { x: 0.9, y: 0.9 }, &mut params));
    }

    #[test]
    fn test_secondary_drag_pans() {
        let mut params = RenderParameters::default();
        let mut drag = DragController::default();
        drag.handle(DragEvent::Begin { button: DragButton::Secondary, x: 0.0, y: 0.0 }, &mut params);
        drag.handle(DragEvent::End { x: 0.5, y: -0.25 }, &mut params);
        assert_relative_eq!(params.x_translate, 0.5);
        assert_relative_eq!(params.y_translate, -0.25);
    }

    #[test]
    fn test_app_update_renders_once_per_period() {
        let params = RenderParameters {
            surface_steps: 8,
            ..RenderParameters::default()
        };
        let mut app = AppState::new(params, ControlPoints::default(), 64, 48);
        assert!(app.update(Duration::ZERO).is_some());
        assert!(app.update(Duration::from_millis(1)).is_none());
        app.resize(32, 32);
        let fb = app.update(Duration::ZERO).expect("resize forces a frame");
        assert_eq!((fb.width, fb.height), (32, 32));
        assert!(!fb.is_uniform(Color::PARCHMENT));
    }
}
