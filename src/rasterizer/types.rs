//! Core types for the rasterizer

use super::math::Point3;
use serde::{Deserialize, Serialize};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };

    /// Inactive control point marker (three quarters white)
    pub const OFF_WHITE: Color = Color { r: 191, g: 191, b: 191, a: 255 };

    /// Default viewport background
    pub const PARCHMENT: Color = Color { r: 204, g: 204, b: 153, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color from floating point channels in 0.0-1.0
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        Self::new(q(r), q(g), q(b))
    }

    /// Convert to [u8; 4] for the pixel buffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Candidate pixel contribution: screen position plus color.
///
/// `position.x`/`position.y` are in pixels, `position.z` is NDC depth
/// (larger is farther). Lives for one frame only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub position: Point3,
    pub color: Color,
}

impl Fragment {
    pub fn new(position: Point3, color: Color) -> Self {
        Self { position, color }
    }

    /// Integer pixel column
    pub fn pixel_x(&self) -> i64 {
        self.position.x.floor() as i64
    }

    /// Integer pixel row (row 0 is the bottom of the buffer)
    pub fn pixel_y(&self) -> i64 {
        self.position.y.floor() as i64
    }

    pub fn depth(&self) -> f32 {
        self.position.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unit_clamps() {
        assert_eq!(Color::from_unit(2.0, 0.5, -1.0), Color::new(255, 127, 0));
    }

    #[test]
    fn test_fragment_pixel_floor() {
        let f = Fragment::new(Point3::new(3.9, -0.5, 0.2), Color::RED);
        assert_eq!(f.pixel_x(), 3);
        assert_eq!(f.pixel_y(), -1);
    }
}
