//! Fragment generation for the scene layers
//!
//! Every primitive is reduced to sample points, pushed through the camera
//! (transform, clip, viewport) and recorded as fragments for the compositor.

use std::f32::consts::TAU;

use tracing::debug;

use super::bezier::sample_grid;
use super::camera::Camera;
use super::math::{Homogeneous4, Point3, Vector3};
use super::types::{Color, Fragment};
use crate::scene::{ControlPoints, RenderParameters, VertexStyle};

/// Samples per line segment
pub const LINE_SEGMENTS: usize = 1000;
/// Latitude/longitude steps of a control point sphere
pub const SPHERE_STEPS: usize = 30;
/// Object-space radius of a control point sphere
pub const SPHERE_RADIUS: f32 = 0.1;
/// Pixel radius of a control point disc
pub const DISC_RADIUS: i32 = 5;
/// Axis planes span [-PLANE_EXTENT, PLANE_EXTENT]
pub const PLANE_EXTENT: i32 = 5;

const XZ_PLANE_COLOR: Color = Color::new(63, 0, 63);
const YZ_PLANE_COLOR: Color = Color::new(0, 63, 63);
const XY_PLANE_COLOR: Color = Color::new(63, 63, 0);

/// Appends fragments for one frame
pub struct FragmentGenerator<'a> {
    camera: &'a Camera,
    fragments: &'a mut Vec<Fragment>,
}

impl<'a> FragmentGenerator<'a> {
    pub fn new(camera: &'a Camera, fragments: &'a mut Vec<Fragment>) -> Self {
        Self { camera, fragments }
    }

    /// Emit every enabled layer
    pub fn generate(&mut self, params: &RenderParameters, points: &ControlPoints) {
        if params.vertices_enabled {
            self.vertices(points, params.active_vertex, params.vertex_style);
        }
        if params.planes_enabled {
            self.planes();
        }
        if params.net_enabled {
            self.net(points);
        }
        if params.bezier_enabled {
            self.surface(points, params.surface_steps);
        }
    }

    /// Single point; dropped if clipped
    pub fn point(&mut self, p: Point3, color: Color) {
        if let Some(screen) = self.camera.project(p.into()) {
            self.fragments.push(Fragment::new(screen, color));
        }
    }

    /// Line sampled at `LINE_SEGMENTS` steps over t in [0, 1)
    pub fn line(&mut self, start: Point3, end: Point3, color: Color) {
        let delta = end - start;
        for i in 0..LINE_SEGMENTS {
            let t = i as f32 / LINE_SEGMENTS as f32;
            self.point(start + delta * t, color);
        }
    }

    /// Point cloud on a small sphere around `center`
    pub fn sphere(&mut self, center: Point3, color: Color) {
        let step = TAU / SPHERE_STEPS as f32;
        for i in 0..SPHERE_STEPS {
            let (sin_theta, cos_theta) = (i as f32 * step).sin_cos();
            for j in 0..SPHERE_STEPS {
                let (sin_phi, cos_phi) = (j as f32 * step).sin_cos();
                let offset = Vector3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta);
                self.point(center + offset * SPHERE_RADIUS, color);
            }
        }
    }

    /// Filled screen-space disc at the projected center, all at the center's depth
    pub fn disc(&mut self, center: Point3, color: Color) {
        let Some(c) = self.camera.project(center.into()) else {
            return;
        };
        let (cx, cy) = (c.x.floor() as i32, c.y.floor() as i32);
        let r_sq = DISC_RADIUS * DISC_RADIUS;
        for y in (cy - DISC_RADIUS)..(cy + DISC_RADIUS) {
            for x in (cx - DISC_RADIUS)..(cx + DISC_RADIUS) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy < r_sq {
                    self.fragments
                        .push(Fragment::new(Point3::new(x as f32, y as f32, c.z), color));
                }
            }
        }
    }

    /// Control point markers; the active one in red
    pub fn vertices(&mut self, points: &ControlPoints, active: usize, style: VertexStyle) {
        for (i, &v) in points.vertices.iter().enumerate() {
            let color = if i == active { Color::RED } else { Color::OFF_WHITE };
            match style {
                VertexStyle::Sphere => self.sphere(v, color),
                VertexStyle::Disc => self.disc(v, color),
            }
        }
    }

    /// Axis-aligned grids in the xz, yz and xy planes
    pub fn planes(&mut self) {
        let e = PLANE_EXTENT as f32;
        for i in (-PLANE_EXTENT..=PLANE_EXTENT).step_by(2) {
            let i = i as f32;
            self.line(Point3::new(-e, 0.0, i), Point3::new(e, 0.0, i), XZ_PLANE_COLOR);
            self.line(Point3::new(i, 0.0, -e), Point3::new(i, 0.0, e), XZ_PLANE_COLOR);
            self.line(Point3::new(0.0, i, -e), Point3::new(0.0, i, e), YZ_PLANE_COLOR);
            self.line(Point3::new(0.0, -e, i), Point3::new(0.0, e, i), YZ_PLANE_COLOR);
        }
        for i in -PLANE_EXTENT..=PLANE_EXTENT {
            let i = i as f32;
            self.line(Point3::new(-e, i, 0.0), Point3::new(e, i, 0.0), XY_PLANE_COLOR);
            self.line(Point3::new(i, -e, 0.0), Point3::new(i, e, 0.0), XY_PLANE_COLOR);
        }
    }

    /// Control net wireframe
    pub fn net(&mut self, points: &ControlPoints) {
        for (a, b) in points.net_segments() {
            self.line(a, b, Color::GREEN);
        }
    }

    /// The sampled patch surface, colored by its (s, t) parameters.
    ///
    /// Samples are evaluated in parallel into a pre-sized arena with one slot
    /// per (s, t) pair; clipped samples leave their slot empty.
    pub fn surface(&mut self, points: &ControlPoints, steps: usize) {
        let camera = self.camera;
        let arena: Vec<Option<Fragment>> = sample_grid(points, steps, |s, t, p: Homogeneous4| {
            camera
                .project(p)
                .map(|screen| Fragment::new(screen, Color::from_unit(s, 0.5, t)))
        });

        let arena_len = arena.len();
        let before = self.fragments.len();
        self.fragments.extend(arena.into_iter().flatten());
        debug!(
            samples = arena_len,
            visible = self.fragments.len() - before,
            "Sampled surface"
        );
    }
}
