//! Vector and matrix math for the patch renderer
//!
//! Affine points and directions are separate types: only `Vector3` has
//! dot/cross products, and `Point3 + Vector3` yields a point. `Homogeneous4`
//! carries either one through a 4x4 transform.

use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// Affine 3D position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position vector from the origin
    pub fn to_vector(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Add<Vector3> for Point3 {
    type Output = Point3;
    fn add(self, v: Vector3) -> Point3 {
        Point3 {
            x: self.x + v.x,
            y: self.y + v.y,
            z: self.z + v.z,
        }
    }
}

impl Sub<Vector3> for Point3 {
    type Output = Point3;
    fn sub(self, v: Vector3) -> Point3 {
        Point3 {
            x: self.x - v.x,
            y: self.y - v.y,
            z: self.z - v.z,
        }
    }
}

impl Sub for Point3 {
    type Output = Vector3;
    fn sub(self, other: Point3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/// 3D direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vector3 = Vector3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vector3 = Vector3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector is not guarded against and produces NaN components.
    pub fn unit(self) -> Vector3 {
        self * (1.0 / self.length())
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, s: f32) -> Vector3 {
        Vector3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

/// Homogeneous coordinates (x, y, z, w)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Homogeneous4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Homogeneous4 {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Perspective divide back to affine space.
    ///
    /// Only meaningful for w != 0; a direction (w == 0) yields inf/NaN.
    pub fn point(self) -> Point3 {
        Point3 {
            x: self.x / self.w,
            y: self.y / self.w,
            z: self.z / self.w,
        }
    }

    /// Drop w, assuming it is zero
    pub fn vector(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Component-wise product
    pub fn modulate(self, other: Homogeneous4) -> Homogeneous4 {
        Homogeneous4 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
            w: self.w * other.w,
        }
    }
}

impl From<Point3> for Homogeneous4 {
    fn from(p: Point3) -> Self {
        Homogeneous4::new(p.x, p.y, p.z, 1.0)
    }
}

impl From<Vector3> for Homogeneous4 {
    fn from(v: Vector3) -> Self {
        Homogeneous4::new(v.x, v.y, v.z, 0.0)
    }
}

impl Add for Homogeneous4 {
    type Output = Homogeneous4;
    fn add(self, o: Homogeneous4) -> Homogeneous4 {
        Homogeneous4::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl Sub for Homogeneous4 {
    type Output = Homogeneous4;
    fn sub(self, o: Homogeneous4) -> Homogeneous4 {
        Homogeneous4::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

impl Mul<f32> for Homogeneous4 {
    type Output = Homogeneous4;
    fn mul(self, s: f32) -> Homogeneous4 {
        Homogeneous4::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl Mul<Homogeneous4> for f32 {
    type Output = Homogeneous4;
    fn mul(self, h: Homogeneous4) -> Homogeneous4 {
        h * self
    }
}

impl Div<f32> for Homogeneous4 {
    type Output = Homogeneous4;
    fn div(self, s: f32) -> Homogeneous4 {
        Homogeneous4::new(self.x / s, self.y / s, self.z / s, self.w / s)
    }
}

impl Index<usize> for Homogeneous4 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Homogeneous4 index out of range: {}", i),
        }
    }
}

impl IndexMut<usize> for Homogeneous4 {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Homogeneous4 index out of range: {}", i),
        }
    }
}

/// Unit quaternion, only used to build rotation matrices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Quaternion from a unit axis and half the rotation angle
    pub fn from_axis_half_angle(axis: Vector3, half_angle: f32) -> Self {
        let (s, c) = half_angle.sin_cos();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    pub fn to_matrix(self) -> Matrix4 {
        let Quaternion { x, y, z, w } = self;
        Matrix4 {
            rows: [
                [
                    1.0 - 2.0 * (y * y + z * z),
                    2.0 * (x * y - w * z),
                    2.0 * (x * z + w * y),
                    0.0,
                ],
                [
                    2.0 * (x * y + w * z),
                    1.0 - 2.0 * (x * x + z * z),
                    2.0 * (y * z - w * x),
                    0.0,
                ],
                [
                    2.0 * (x * z - w * y),
                    2.0 * (y * z + w * x),
                    1.0 - 2.0 * (x * x + y * y),
                    0.0,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// 4x4 matrix, row-major (`m[row][col]`)
///
/// The default value is the zero matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    pub rows: [[f32; 4]; 4],
}

impl Matrix4 {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn identity() -> Self {
        let mut m = Self::zero();
        for i in 0..4 {
            m.rows[i][i] = 1.0;
        }
        m
    }

    /// Identity with the translation in the w column
    pub fn translation(v: Vector3) -> Self {
        let mut m = Self::identity();
        m.rows[0][3] = v.x;
        m.rows[1][3] = v.y;
        m.rows[2][3] = v.z;
        m
    }

    /// Diagonal scale. The w diagonal is left at zero.
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::zero();
        m.rows[0][0] = x;
        m.rows[1][1] = y;
        m.rows[2][2] = z;
        m
    }

    /// Rotation by `theta` radians about `axis` (need not be unit length, must be non-zero)
    pub fn rotation(axis: Vector3, theta: f32) -> Self {
        Quaternion::from_axis_half_angle(axis.unit(), theta * 0.5).to_matrix()
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zero();
        for row in 0..4 {
            for col in 0..4 {
                t.rows[col][row] = self.rows[row][col];
            }
        }
        t
    }

    /// 16 values in column-major order
    pub fn column_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[4 * col + row] = self.rows[row][col];
            }
        }
        out
    }

    /// Element-wise comparison within `eps`
    pub fn approx_eq(&self, other: &Matrix4, eps: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Index<usize> for Matrix4 {
    type Output = [f32; 4];
    fn index(&self, row: usize) -> &[f32; 4] {
        &self.rows[row]
    }
}

impl IndexMut<usize> for Matrix4 {
    fn index_mut(&mut self, row: usize) -> &mut [f32; 4] {
        &mut self.rows[row]
    }
}

impl Add for Matrix4 {
    type Output = Matrix4;
    fn add(self, other: Matrix4) -> Matrix4 {
        let mut m = Matrix4::zero();
        for row in 0..4 {
            for col in 0..4 {
                m.rows[row][col] = self.rows[row][col] + other.rows[row][col];
            }
        }
        m
    }
}

impl Sub for Matrix4 {
    type Output = Matrix4;
    fn sub(self, other: Matrix4) -> Matrix4 {
        let mut m = Matrix4::zero();
        for row in 0..4 {
            for col in 0..4 {
                m.rows[row][col] = self.rows[row][col] - other.rows[row][col];
            }
        }
        m
    }
}

impl Mul<f32> for Matrix4 {
    type Output = Matrix4;
    fn mul(self, s: f32) -> Matrix4 {
        let mut m = self;
        for v in m.rows.iter_mut().flatten() {
            *v *= s;
        }
        m
    }
}

impl Mul<Matrix4> for f32 {
    type Output = Matrix4;
    fn mul(self, m: Matrix4) -> Matrix4 {
        m * self
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;
    fn mul(self, other: Matrix4) -> Matrix4 {
        let mut result = Matrix4::zero();
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result.rows[i][j] += self.rows[i][k] * other.rows[k][j];
                }
            }
        }
        result
    }
}

impl Mul<Homogeneous4> for Matrix4 {
    type Output = Homogeneous4;
    fn mul(self, h: Homogeneous4) -> Homogeneous4 {
        let mut out = Homogeneous4::default();
        for i in 0..4 {
            let r = &self.rows[i];
            out[i] = r[0] * h.x + r[1] * h.y + r[2] * h.z + r[3] * h.w;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_matrix(seed: f32) -> Matrix4 {
        let mut m = Matrix4::zero();
        for row in 0..4 {
            for col in 0..4 {
                m[row][col] = ((row * 4 + col) as f32 * 0.37 + seed).sin() * 3.0;
            }
        }
        m
    }

    #[test]
    fn test_dot_commutes() {
        let u = Vector3::new(-1.0, 2.0, 3.0);
        let v = Vector3::new(1.0, 2.0, -1.0);
        assert_eq!(u.dot(v), v.dot(u));
        assert_relative_eq!(u.dot(v), 0.0);
    }

    #[test]
    fn test_cross_anticommutes() {
        let v = Vector3::new(1.0, 2.0, -1.0);
        let w = Vector3::new(-1.0, 2.0, 4.0);
        assert_eq!(v.cross(w), -(w.cross(v)));
        assert_eq!(v.cross(w), Vector3::new(10.0, -3.0, 4.0));
    }

    #[test]
    fn test_point_vector_arithmetic() {
        let p = Point3::new(0.0, 1.0, 3.0);
        let u = Vector3::new(-1.0, 2.0, 3.0);
        assert_eq!(p + u, Point3::new(-1.0, 3.0, 6.0));
        assert_eq!((p + u) - p, u);
    }

    #[test]
    fn test_unit_length() {
        let v = Vector3::new(3.0, 4.0, 12.0).unit();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unit_of_zero_is_nan() {
        assert!(Vector3::ZERO.unit().x.is_nan());
    }

    #[test]
    fn test_matrix_associative() {
        let a = sample_matrix(0.1);
        let b = sample_matrix(1.3);
        let c = sample_matrix(2.9);
        assert!(((a * b) * c).approx_eq(&(a * (b * c)), 1e-2));
    }

    #[test]
    fn test_matrix_not_commutative() {
        let a = sample_matrix(0.1);
        let b = sample_matrix(1.3);
        assert!(!(a * b).approx_eq(&(b * a), 1e-3));
    }

    #[test]
    fn test_identity_preserves_homogeneous() {
        let h = Homogeneous4::new(1.5, -2.0, 7.25, 0.5);
        assert_eq!(Matrix4::identity() * h, h);
    }

    #[test]
    fn test_rotation_transpose_is_inverse() {
        let r = Matrix4::rotation(Vector3::new(1.0, 2.0, 0.5), 0.83);
        assert!((r.transpose() * r).approx_eq(&Matrix4::identity(), 1e-5));
        assert!((r * r.transpose()).approx_eq(&Matrix4::identity(), 1e-4));
    }

    #[test]
    fn test_rotation_about_z() {
        let r = Matrix4::rotation(Vector3::Z, std::f32::consts::FRAC_PI_2);
        let p = (r * Homogeneous4::from(Point3::new(1.0, 0.0, 0.0))).point();
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_point_roundtrip() {
        let p = Point3::new(0.25, -3.5, 17.0);
        assert_eq!(Homogeneous4::from(p).point(), p);
    }

    #[test]
    fn test_vector_ignores_translation() {
        let t = Matrix4::translation(Vector3::new(5.0, 6.0, 7.0));
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!((t * Homogeneous4::from(v)).vector(), v);
        let p = (t * Homogeneous4::from(Point3::ORIGIN)).point();
        assert_eq!(p, Point3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_composed_transform() {
        // q + m1 v
        let mut m1 = Matrix4::zero();
        m1[0] = [1.0, 0.0, 3.0, 0.0];
        m1[1] = [1.0, 9.0, 2.0, 0.0];
        m1[2] = [4.0, 3.0, 6.0, 0.0];
        let q = Point3::new(1.0, -1.0, 2.0);
        let v = Vector3::new(1.0, 2.0, -1.0);
        let moved = q + (m1 * Homogeneous4::from(v)).vector();
        assert_eq!(moved, Point3::new(-1.0, 16.0, 6.0));
    }

    #[test]
    fn test_transpose_and_column_major() {
        let m = sample_matrix(0.7);
        assert_eq!(m.transpose().transpose(), m);
        let cm = m.column_major();
        assert_eq!(cm[1], m[1][0]);
        assert_eq!(cm[4], m[0][1]);
    }

    #[test]
    fn test_scale_and_scalar_ops() {
        let s = Matrix4::scale(2.0, 3.0, 4.0);
        let h = s * Homogeneous4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(h, Homogeneous4::new(2.0, 3.0, 4.0, 0.0));
        let m = sample_matrix(0.2);
        assert!((m + m).approx_eq(&(2.0 * m), 1e-6));
        assert!((m - m).approx_eq(&Matrix4::zero(), 0.0));
    }

    #[test]
    fn test_homogeneous_ops() {
        let a = Homogeneous4::new(1.0, 2.0, 3.0, 1.0);
        let b = Homogeneous4::new(2.0, 2.0, 2.0, 2.0);
        assert_eq!(a.modulate(b), Homogeneous4::new(2.0, 4.0, 6.0, 2.0));
        assert_eq!((a * 2.0) / 2.0, a);
        assert_eq!(a + b - b, a);
        assert_eq!(a[2], 3.0);
    }
}
