//! End-to-end checks across the scene, rasterizer and app layers

use approx::assert_relative_eq;
use std::time::Duration;

use bezier_raster::app::{AppState, Renderer};
use bezier_raster::rasterizer::{
    resolve_fragments, Camera, Color, Fragment, FragmentGenerator, Matrix4, PixelBuffer, Point3,
    Vector3,
};
use bezier_raster::scene::{control_points_from_str, ControlPoints, RenderParameters};

fn ortho() -> RenderParameters {
    RenderParameters {
        ortho_projection: true,
        surface_steps: 40,
        ..RenderParameters::default()
    }
}

#[test]
fn flat_patch_has_constant_depth_in_ortho() {
    let points = ControlPoints::flat_grid(3.0, 0.0);
    let params = ortho();
    let camera = Camera::new(320, 240, &params);

    let mut frags = Vec::new();
    FragmentGenerator::new(&camera, &mut frags).surface(&points, params.surface_steps);

    assert_eq!(frags.len(), 41 * 41);
    let depth = frags[0].depth();
    for f in &frags {
        assert_relative_eq!(f.depth(), depth, epsilon = 1e-5);
    }
}

#[test]
fn all_layers_off_leaves_clear_color() {
    let params = RenderParameters {
        clear_color: Color::new(10, 20, 30),
        ..ortho().all_layers_off()
    };
    let mut renderer = Renderer::new(64, 48);
    let stats = renderer.render_frame(&params, &ControlPoints::default());

    assert_eq!(stats.fragments, 0);
    assert_eq!(stats.pixels_written, 0);
    assert!(renderer.buffer().is_uniform(Color::new(10, 20, 30)));
}

#[test]
fn rotation_times_transpose_is_identity() {
    let m = Matrix4::rotation(Vector3::new(1.0, 2.0, 3.0).unit(), 0.7);
    assert!((m * m.transpose()).approx_eq(&Matrix4::identity(), 1e-4));
}

#[test]
fn nearer_layer_covers_farther_one() {
    // Same pixel, two depths, pushed far-last to make sure order does not matter
    let mut fb = PixelBuffer::new(4, 4);
    fb.clear(Color::BLACK);
    let near = Fragment::new(Point3::new(1.5, 1.5, -0.5), Color::RED);
    let far = Fragment::new(Point3::new(1.5, 1.5, 0.5), Color::GREEN);
    let mut frags = vec![near, far];

    let stats = resolve_fragments(&mut fb, &mut frags);
    assert_eq!(stats.fragments, 2);
    assert_eq!(fb.get_pixel(1, 1), Some(Color::RED));
    assert!(frags.is_empty());
}

#[test]
fn default_scene_draws_pixels() {
    let params = RenderParameters {
        surface_steps: 60,
        ..RenderParameters::default()
    };
    let mut renderer = Renderer::new(200, 150);
    let stats = renderer.render_frame(&params, &ControlPoints::default());

    assert!(stats.fragments > 0);
    assert!(stats.pixels_written > 0);
    assert!(!renderer.buffer().is_uniform(params.clear_color));
}

#[test]
fn app_state_renders_only_when_due() {
    let mut app = AppState::new(ortho(), ControlPoints::default(), 80, 60);
    assert!(app.update(Duration::ZERO).is_some());
    assert!(app.update(Duration::from_millis(5)).is_none());

    app.params.net_enabled = false;
    app.clock.invalidate();
    assert!(app.update(Duration::ZERO).is_some());
}

#[test]
fn loaded_points_render() {
    let text = "[
        (x: -3.0, y: -3.0, z: 0.0), (x: -1.0, y: -3.0, z: 0.0), (x: 1.0, y: -3.0, z: 0.0), (x: 3.0, y: -3.0, z: 0.0),
        (x: -3.0, y: -1.0, z: 0.0), (x: -1.0, y: -1.0, z: 2.0), (x: 1.0, y: -1.0, z: 2.0), (x: 3.0, y: -1.0, z: 0.0),
        (x: -3.0, y: 1.0, z: 0.0), (x: -1.0, y: 1.0, z: 2.0), (x: 1.0, y: 1.0, z: 2.0), (x: 3.0, y: 1.0, z: 0.0),
        (x: -3.0, y: 3.0, z: 0.0), (x: -1.0, y: 3.0, z: 0.0), (x: 1.0, y: 3.0, z: 0.0), (x: 3.0, y: 3.0, z: 0.0),
    ]";
    let points = control_points_from_str(text).unwrap();
    let params = RenderParameters {
        bezier_enabled: true,
        surface_steps: 20,
        ..ortho().all_layers_off()
    };
    let mut renderer = Renderer::new(100, 100);
    let stats = renderer.render_frame(&params, &points);
    assert_eq!(stats.fragments, 21 * 21);
}
