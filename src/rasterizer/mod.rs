//! Point-sampling software rasterizer for a bicubic Bezier patch
//!
//! Features:
//! - Homogeneous 4x4 transforms with orthographic or perspective projection
//! - Per-point homogeneous clipping
//! - Parallel surface sampling
//! - Painter's algorithm compositing (no depth buffer)

mod bezier;
mod camera;
mod fragments;
mod math;
mod render;
mod types;

pub use bezier::*;
pub use camera::*;
pub use fragments::*;
pub use math::*;
pub use render::*;
pub use types::*;

/// Default window dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
