//! Bezier patch control points

use serde::{Deserialize, Serialize};

use super::SceneError;
use crate::rasterizer::{Point3, Vector3};

/// Number of control points in a bicubic patch
pub const CONTROL_POINT_COUNT: usize = 16;

/// The 16 control points of a bicubic patch, row-major over a 4x4 grid.
///
/// Serialized as a plain list; deserializing any other count is an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point3>", into = "Vec<Point3>")]
pub struct ControlPoints {
    pub vertices: [Point3; CONTROL_POINT_COUNT],
}

impl ControlPoints {
    pub fn new(vertices: [Point3; CONTROL_POINT_COUNT]) -> Self {
        Self { vertices }
    }

    /// Flat 4x4 grid in the plane `z = height`, spanning `[-extent, extent]` in x and y
    pub fn flat_grid(extent: f32, height: f32) -> Self {
        let step = 2.0 * extent / 3.0;
        Self {
            vertices: std::array::from_fn(|i| {
                let (row, col) = (i / 4, i % 4);
                Point3::new(-extent + col as f32 * step, -extent + row as f32 * step, height)
            }),
        }
    }

    /// Control row `row` (0..4), in column order
    pub fn row(&self, row: usize) -> [Point3; 4] {
        std::array::from_fn(|col| self.vertices[row * 4 + col])
    }

    /// Control column `col` (0..4), in row order
    pub fn column(&self, col: usize) -> [Point3; 4] {
        std::array::from_fn(|row| self.vertices[row * 4 + col])
    }

    /// The 24 segments of the control net: 12 along rows, then 12 along columns
    pub fn net_segments(&self) -> Vec<(Point3, Point3)> {
        let mut segments = Vec::with_capacity(24);
        for i in 0..4 {
            let row = self.row(i);
            for j in 0..3 {
                segments.push((row[j], row[j + 1]));
            }
        }
        for i in 0..4 {
            let col = self.column(i);
            for j in 0..3 {
                segments.push((col[j], col[j + 1]));
            }
        }
        segments
    }

    /// Move one control point. Out-of-range indices are ignored.
    pub fn translate_vertex(&mut self, index: usize, offset: Vector3) {
        if let Some(v) = self.vertices.get_mut(index) {
            *v = *v + offset;
        }
    }
}

impl Default for ControlPoints {
    /// A gently domed patch over [-3, 3] x [-3, 3]
    fn default() -> Self {
        const LIFT: [f32; 4] = [0.0, 1.5, 1.5, 0.0];
        let mut cp = Self::flat_grid(3.0, 0.0);
        for (i, v) in cp.vertices.iter_mut().enumerate() {
            v.z = LIFT[i / 4] + LIFT[i % 4];
        }
        cp
    }
}

impl TryFrom<Vec<Point3>> for ControlPoints {
    type Error = SceneError;

    fn try_from(points: Vec<Point3>) -> Result<Self, Self::Error> {
        let count = points.len();
        let vertices: [Point3; CONTROL_POINT_COUNT] = points
            .try_into()
            .map_err(|_| SceneError::InvalidControlPoints(count))?;
        Ok(Self { vertices })
    }
}

impl From<ControlPoints> for Vec<Point3> {
    fn from(cp: ControlPoints) -> Self {
        cp.vertices.to_vec()
    }
}
