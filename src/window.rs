//! macroquad window adapter
//!
//! Polls input, feeds it to `AppState`, and blits the finished pixel buffer.
//! Keys:
//! - V / P / N / B toggle vertices, planes, net, surface
//! - O toggles orthographic projection, M the marker style
//! - Tab / Shift+Tab or 0-9 pick the active vertex, arrows and PgUp/PgDn move it
//! - R resets the rotation, scroll zooms
//! - Ctrl+O / Ctrl+S open and save control points

use std::time::Duration;

use macroquad::prelude::*;
use tracing::{info, warn};

use bezier_raster::app::{AppState, DragButton, PointerEvent};
use bezier_raster::rasterizer::{Matrix4, Vector3};
use bezier_raster::scene::{
    ControlPoints, RenderParameters, VertexStyle, TRANSLATE_MAX, Z_TRANSLATE_MIN,
};

/// Distance the active vertex moves per key press
const NUDGE: f32 = 0.25;
/// Zoom change per scroll notch
const ZOOM_STEP: f32 = 0.05;

pub fn window_conf(width: usize, height: usize) -> Conf {
    Conf {
        window_title: format!("Bezier Patch v{}", bezier_raster::VERSION),
        window_width: width as i32,
        window_height: height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Mouse button state
#[derive(Debug, Clone, Copy, Default)]
struct MouseState {
    x: f32,
    y: f32,
    left_down: bool,
    right_down: bool,
}

impl MouseState {
    fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            right_down: is_mouse_button_down(MouseButton::Right),
        }
    }

    fn any_down(&self) -> bool {
        self.left_down || self.right_down
    }
}

pub async fn run(params: RenderParameters, points: ControlPoints) {
    let mut app = AppState::new(params, points, screen_width() as usize, screen_height() as usize);
    let mut last_mouse = MouseState::default();
    let mut texture: Option<Texture2D> = None;

    info!("Viewer running");

    loop {
        app.resize(screen_width() as usize, screen_height() as usize);

        handle_pointer(&mut app, &mut last_mouse);
        if handle_keys(&mut app.params, &mut app.points) {
            app.clock.invalidate();
        }

        let dt = Duration::from_secs_f32(get_frame_time());
        if let Some(fb) = app.update(dt) {
            let tex = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
            tex.set_filter(FilterMode::Nearest);
            texture = Some(tex);
        }

        clear_background(BLACK);
        if let Some(tex) = &texture {
            // Pixel buffer rows run bottom-up
            draw_texture_ex(
                tex,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(screen_width(), screen_height())),
                    flip_y: true,
                    ..Default::default()
                },
            );
        }

        let stats = app.renderer.last_stats();
        draw_text(
            &format!(
                "{} fragments  {:.1} ms  vertex {}",
                stats.fragments,
                stats.elapsed.as_secs_f64() * 1000.0,
                app.params.active_vertex,
            ),
            8.0,
            screen_height() - 8.0,
            16.0,
            Color::from_rgba(40, 40, 40, 255),
        );

        next_frame().await;
    }
}

fn handle_pointer(app: &mut AppState, last: &mut MouseState) {
    let mouse = MouseState::poll();
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    if mouse.any_down() && !last.any_down() {
        let button = if mouse.left_down { DragButton::Primary } else { DragButton::Secondary };
        app.pointer(PointerEvent::Press { button, x: mouse.x, y: mouse.y, shift });
    } else if mouse.any_down() && (mouse.x != last.x || mouse.y != last.y) {
        app.pointer(PointerEvent::Move { x: mouse.x, y: mouse.y });
    } else if !mouse.any_down() && last.any_down() {
        app.pointer(PointerEvent::Release { x: mouse.x, y: mouse.y });
    }
    *last = mouse;

    let scroll = mouse_wheel().1;
    if scroll != 0.0 {
        let z = app.params.z_translate + scroll.signum() * ZOOM_STEP;
        app.params.z_translate = z.clamp(Z_TRANSLATE_MIN, TRANSLATE_MAX);
        app.clock.invalidate();
    }
}

/// Returns true when anything visible changed
fn handle_keys(params: &mut RenderParameters, points: &mut ControlPoints) -> bool {
    let mut changed = true;
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
    let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

    if ctrl && is_key_pressed(KeyCode::O) {
        open_points(points);
    } else if ctrl && is_key_pressed(KeyCode::S) {
        save_points(points);
        changed = false;
    } else if is_key_pressed(KeyCode::V) {
        params.vertices_enabled = !params.vertices_enabled;
    } else if is_key_pressed(KeyCode::P) {
        params.planes_enabled = !params.planes_enabled;
    } else if is_key_pressed(KeyCode::N) {
        params.net_enabled = !params.net_enabled;
    } else if is_key_pressed(KeyCode::B) {
        params.bezier_enabled = !params.bezier_enabled;
    } else if is_key_pressed(KeyCode::O) {
        params.ortho_projection = !params.ortho_projection;
    } else if is_key_pressed(KeyCode::M) {
        params.vertex_style = match params.vertex_style {
            VertexStyle::Sphere => VertexStyle::Disc,
            VertexStyle::Disc => VertexStyle::Sphere,
        };
    } else if is_key_pressed(KeyCode::R) {
        params.rotation = Matrix4::identity();
    } else if is_key_pressed(KeyCode::Tab) {
        params.cycle_active_vertex(!shift);
    } else if let Some(index) = digit_pressed() {
        params.active_vertex = index;
    } else if let Some(offset) = nudge_offset() {
        points.translate_vertex(params.active_vertex, offset);
    } else {
        changed = false;
    }
    changed
}

/// 0-9 pick a vertex directly; Tab reaches the rest
fn digit_pressed() -> Option<usize> {
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Key0,
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
        KeyCode::Key6,
        KeyCode::Key7,
        KeyCode::Key8,
        KeyCode::Key9,
    ];
    DIGITS.iter().position(|&key| is_key_pressed(key))
}

fn nudge_offset() -> Option<Vector3> {
    let keys = [
        (KeyCode::Left, Vector3::X * -NUDGE),
        (KeyCode::Right, Vector3::X * NUDGE),
        (KeyCode::Down, Vector3::Y * -NUDGE),
        (KeyCode::Up, Vector3::Y * NUDGE),
        (KeyCode::PageDown, Vector3::Z * -NUDGE),
        (KeyCode::PageUp, Vector3::Z * NUDGE),
    ];
    keys.iter()
        .find(|(key, _)| is_key_pressed(*key))
        .map(|(_, offset)| *offset)
}

#[cfg(not(target_arch = "wasm32"))]
fn open_points(points: &mut ControlPoints) {
    let dialog = rfd::FileDialog::new().add_filter("RON control points", &["ron"]);
    if let Some(path) = dialog.pick_file() {
        match bezier_raster::scene::load_control_points(&path) {
            Ok(loaded) => {
                *points = loaded;
                info!(path = %path.display(), "Loaded control points");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Load failed"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn save_points(points: &ControlPoints) {
    let dialog = rfd::FileDialog::new()
        .add_filter("RON control points", &["ron"])
        .set_file_name("points.ron");
    if let Some(path) = dialog.save_file() {
        match bezier_raster::scene::save_control_points(points, &path) {
            Ok(()) => info!(path = %path.display(), "Saved control points"),
            Err(e) => warn!(path = %path.display(), error = %e, "Save failed"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn open_points(_points: &mut ControlPoints) {
    warn!("Open not available in browser");
}

#[cfg(target_arch = "wasm32")]
fn save_points(_points: &ControlPoints) {
    warn!("Save not available in browser");
}
