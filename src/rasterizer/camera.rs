//! Camera and projection setup
//!
//! Builds the view and projection matrices for one frame from the render
//! parameters, and maps object-space points through clip space to the
//! pixel grid.

use super::math::{Homogeneous4, Matrix4, Point3, Vector3};
use crate::scene::RenderParameters;

/// Near clip plane distance
pub const NEAR: f32 = 0.01;
/// Far clip plane distance
pub const FAR: f32 = 200.0;

/// Half extent of the orthographic view volume at `z_translate == 1`
const ORTHO_EXTENT: f32 = 10.0;
/// Half extent of the perspective near plane
const FRUSTUM_EXTENT: f32 = 0.01;
/// Eye distance for the perspective camera at `z_translate == 0`
const PERSPECTIVE_DISTANCE: f32 = 9.0;

/// Per-frame camera state
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub projection: Matrix4,
    pub view: Matrix4,
    /// `projection * view`
    pub mvp: Matrix4,
    pub viewport_width: usize,
    pub viewport_height: usize,
}

impl Camera {
    /// Set up the matrices for a `width` x `height` viewport
    pub fn new(width: usize, height: usize, params: &RenderParameters) -> Self {
        let aspect = width as f32 / height as f32;

        let (view, projection) = if params.ortho_projection {
            let eye = Vector3::new(params.x_translate, params.y_translate, params.z_translate - 1.0);
            let view = Matrix4::translation(eye) * params.rotation;
            (view, orthographic(aspect, params.z_translate))
        } else {
            let eye = Vector3::new(
                params.x_translate,
                params.y_translate,
                -(PERSPECTIVE_DISTANCE - params.z_translate),
            );
            let view = Matrix4::translation(eye) * params.rotation;
            (view, perspective(aspect))
        };

        Self {
            projection,
            view,
            mvp: projection * view,
            viewport_width: width,
            viewport_height: height,
        }
    }

    /// Transform to clip space, clip, divide and map to the viewport.
    ///
    /// Returns `None` when the point lies outside the homogeneous clip volume.
    /// The result holds pixel x/y and NDC depth in z.
    pub fn project(&self, point: Homogeneous4) -> Option<Point3> {
        let clip = self.mvp * point;
        if !inside_clip_volume(clip) {
            return None;
        }

        let ndc = clip.point();
        Some(Point3::new(
            (ndc.x + 1.0) / 2.0 * self.viewport_width as f32,
            (ndc.y + 1.0) / 2.0 * self.viewport_height as f32,
            ndc.z,
        ))
    }
}

/// `-w <= x, y, z <= w` and `w >= 0`
pub fn inside_clip_volume(h: Homogeneous4) -> bool {
    let w = h.w;
    w >= 0.0
        && -w <= h.x && h.x <= w
        && -w <= h.y && h.y <= w
        && -w <= h.z && h.z <= w
}

/// Returns (left, right, bottom, top) with the aspect ratio applied to the
/// longer axis, so the shorter one always spans the full extent.
fn bounds(aspect: f32, extent: f32) -> (f32, f32, f32, f32) {
    if aspect > 1.0 {
        (-aspect * extent, aspect * extent, -extent, extent)
    } else {
        (-extent, extent, -aspect * extent, aspect * extent)
    }
}

/// Orthographic projection; zooming rescales the visible extent.
pub fn orthographic(aspect: f32, z_translate: f32) -> Matrix4 {
    let (left, right, bottom, top) = bounds(aspect, ORTHO_EXTENT / z_translate);

    let mut m = Matrix4::identity();
    m[0][0] = 2.0 / (right - left);
    m[1][1] = 2.0 / (top - bottom);
    m[2][2] = -2.0 / (FAR - NEAR);
    m[0][3] = -(right + left) / (right - left);
    m[1][3] = -(top + bottom) / (top - bottom);
    // Depth offset keeps the scene around the origin inside [-1, 1]
    m[2][3] = -(FAR * NEAR) / (FAR - NEAR);
    m
}

/// Frustum projection with a fixed small near plane
pub fn perspective(aspect: f32) -> Matrix4 {
    let (left, right, bottom, top) = bounds(aspect, FRUSTUM_EXTENT);

    let mut m = Matrix4::zero();
    m[0][0] = 2.0 * NEAR / (right - left);
    m[1][1] = 2.0 * NEAR / (top - bottom);
    m[0][2] = (right + left) / (right - left);
    m[1][2] = (top + bottom) / (top - bottom);
    m[2][2] = -(FAR + NEAR) / (FAR - NEAR);
    m[2][3] = -(2.0 * FAR * NEAR) / (FAR - NEAR);
    m[3][2] = -1.0;
    m
}
