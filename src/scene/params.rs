//! Render parameters - the per-frame snapshot the renderer reads

use serde::{Deserialize, Serialize};

use super::CONTROL_POINT_COUNT;
use crate::rasterizer::{Color, Matrix4, DEFAULT_STEPS};

/// Slider range for the x/y translations
pub const TRANSLATE_MIN: f32 = -10.0;
pub const TRANSLATE_MAX: f32 = 10.0;
/// `z_translate` divides the orthographic extent, so it stays strictly positive
pub const Z_TRANSLATE_MIN: f32 = 0.1;
/// Upper bound on surface samples per direction
pub const MAX_SURFACE_STEPS: usize = 2000;

/// How control points are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VertexStyle {
    /// Point cloud on a small object-space sphere (scales with zoom)
    #[default]
    Sphere,
    /// Screen-space disc of fixed pixel radius
    Disc,
}

/// Camera, layer toggles and highlight state.
///
/// Owned by the window/CLI; the renderer only ever borrows it for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    pub x_translate: f32,
    pub y_translate: f32,
    /// Zoom: orthographic extent divisor, perspective dolly
    pub z_translate: f32,
    /// Object rotation
    pub rotation: Matrix4,
    pub ortho_projection: bool,

    pub vertices_enabled: bool,
    pub planes_enabled: bool,
    pub net_enabled: bool,
    pub bezier_enabled: bool,

    /// Control point drawn highlighted
    pub active_vertex: usize,
    pub clear_color: Color,

    pub vertex_style: VertexStyle,
    /// Surface samples per parameter direction
    pub surface_steps: usize,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            x_translate: 0.0,
            y_translate: 0.0,
            z_translate: 1.0,
            rotation: Matrix4::identity(),
            ortho_projection: false,
            vertices_enabled: true,
            planes_enabled: true,
            net_enabled: true,
            bezier_enabled: true,
            active_vertex: 0,
            clear_color: Color::PARCHMENT,
            vertex_style: VertexStyle::Sphere,
            surface_steps: DEFAULT_STEPS,
        }
    }
}

impl RenderParameters {
    /// Same parameters with every layer switched off
    pub fn all_layers_off(self) -> Self {
        Self {
            vertices_enabled: false,
            planes_enabled: false,
            net_enabled: false,
            bezier_enabled: false,
            ..self
        }
    }

    pub fn any_layer_enabled(&self) -> bool {
        self.vertices_enabled || self.planes_enabled || self.net_enabled || self.bezier_enabled
    }

    /// Copy with every UI-driven value pulled into its valid range
    pub fn clamped(&self) -> Self {
        Self {
            x_translate: self.x_translate.clamp(TRANSLATE_MIN, TRANSLATE_MAX),
            y_translate: self.y_translate.clamp(TRANSLATE_MIN, TRANSLATE_MAX),
            z_translate: self.z_translate.clamp(Z_TRANSLATE_MIN, TRANSLATE_MAX),
            active_vertex: self.active_vertex.min(CONTROL_POINT_COUNT - 1),
            surface_steps: self.surface_steps.clamp(1, MAX_SURFACE_STEPS),
            ..self.clone()
        }
    }

    /// Next control point to highlight, wrapping around
    pub fn cycle_active_vertex(&mut self, forward: bool) {
        self.active_vertex = if forward {
            (self.active_vertex + 1) % CONTROL_POINT_COUNT
        } else {
            (self.active_vertex + CONTROL_POINT_COUNT - 1) % CONTROL_POINT_COUNT
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = RenderParameters::default();
        assert_eq!(p.rotation, Matrix4::identity());
        assert!(p.any_layer_enabled());
        assert!(!p.clone().all_layers_off().any_layer_enabled());
    }

    #[test]
    fn test_clamped() {
        let p = RenderParameters {
            x_translate: -40.0,
            z_translate: 0.0,
            active_vertex: 42,
            surface_steps: 0,
            ..RenderParameters::default()
        }
        .clamped();
        assert_eq!(p.x_translate, TRANSLATE_MIN);
        assert_eq!(p.z_translate, Z_TRANSLATE_MIN);
        assert_eq!(p.active_vertex, 15);
        assert_eq!(p.surface_steps, 1);
    }

    #[test]
    fn test_cycle_active_vertex_wraps() {
        let mut p = RenderParameters::default();
        p.cycle_active_vertex(false);
        assert_eq!(p.active_vertex, 15);
        p.cycle_active_vertex(true);
        assert_eq!(p.active_vertex, 0);
    }
}
