//! Bezier patch software rasterizer
//!
//! Renders a bicubic Bezier patch, its control net, control point markers
//! and axis planes into an RGBA buffer without any GPU help:
//! - Homogeneous 4x4 transforms, orthographic or perspective camera
//! - Per-point clipping against the homogeneous view volume
//! - Parallel surface sampling
//! - Painter's-order compositing instead of a depth buffer

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod rasterizer;
pub mod scene;
