//! Pixel buffer and fragment compositing
//!
//! Visibility is resolved with a painter's sort rather than a depth buffer:
//! fragments are ordered by pixel and then far-to-near, and only the last
//! fragment of each pixel run reaches the buffer.

use std::cmp::Ordering;
use std::path::Path;

use tracing::trace;

use super::types::{Color, Fragment};

/// RGBA image the frame is rendered into.
///
/// Row 0 is the bottom row of the viewport, matching the viewport mapping
/// (NDC y = -1 lands on row 0).
pub struct PixelBuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Reallocate for a new viewport size. Contents are zeroed.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height * 4, 0);
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Write one pixel. Coordinates outside the buffer are skipped, not clamped.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        true
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    /// True when every pixel equals `color`
    pub fn is_uniform(&self, color: Color) -> bool {
        let bytes = color.to_bytes();
        self.pixels.chunks_exact(4).all(|px| px == bytes)
    }

    /// Copy into an image with the usual top-down row order
    pub fn to_image(&self) -> image::RgbaImage {
        if self.width == 0 || self.height == 0 {
            return image::RgbaImage::new(self.width as u32, self.height as u32);
        }
        let mut flipped = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(self.width * 4).rev() {
            flipped.extend_from_slice(row);
        }
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, flipped)
            .unwrap_or_else(|| image::RgbaImage::new(self.width as u32, self.height as u32))
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)
    }
}

/// Summary of one compositing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    pub fragments: usize,
    /// Distinct pixels that received a write
    pub pixels_written: usize,
}

/// Painter's order: pixel row, then pixel column, then farther depth first
pub fn painter_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.pixel_y()
        .cmp(&b.pixel_y())
        .then(a.pixel_x().cmp(&b.pixel_x()))
        .then(b.depth().total_cmp(&a.depth()))
}

/// Sort the frame's fragments and write the nearest one per pixel.
///
/// The fragment list is drained; it is empty again on return.
pub fn resolve_fragments(fb: &mut PixelBuffer, fragments: &mut Vec<Fragment>) -> CompositeStats {
    let mut stats = CompositeStats {
        fragments: fragments.len(),
        pixels_written: 0,
    };

    fragments.sort_unstable_by(painter_order);

    // Last fragment of each same-pixel run is the nearest
    for run in fragments.chunk_by(|a, b| a.pixel_x() == b.pixel_x() && a.pixel_y() == b.pixel_y()) {
        if let Some(front) = run.last() {
            if fb.set_pixel(front.pixel_x(), front.pixel_y(), front.color) {
                stats.pixels_written += 1;
            }
        }
    }

    trace!(fragments = stats.fragments, pixels = stats.pixels_written, "Resolved fragments");
    fragments.clear();
    stats
}
