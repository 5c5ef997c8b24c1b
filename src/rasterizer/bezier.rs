//! Bicubic Bezier patch evaluation

use rayon::prelude::*;

use super::math::{Homogeneous4, Point3};
use crate::scene::ControlPoints;

/// Reference sampling resolution per parameter direction
pub const DEFAULT_STEPS: usize = 1000;

/// Cubic Bernstein blend of four control points at `u` in [0, 1]
pub fn bezier(
    u: f32,
    p0: Homogeneous4,
    p1: Homogeneous4,
    p2: Homogeneous4,
    p3: Homogeneous4,
) -> Homogeneous4 {
    let v = 1.0 - u;
    let b0 = v * v * v;
    let b1 = 3.0 * u * v * v;
    let b2 = 3.0 * u * u * v;
    let b3 = u * u * u;
    b0 * p0 + b1 * p1 + b2 * p2 + b3 * p3
}

/// Tensor-product surface point: B(t) along each control row, then B(s)
/// across the four row results.
pub fn surface_point(points: &ControlPoints, s: f32, t: f32) -> Homogeneous4 {
    let rows: [Homogeneous4; 4] = std::array::from_fn(|row| {
        let [a, b, c, d] = points.row(row);
        bezier(t, a.into(), b.into(), c.into(), d.into())
    });
    bezier(s, rows[0], rows[1], rows[2], rows[3])
}

/// Surface point in affine space
pub fn evaluate_surface(points: &ControlPoints, s: f32, t: f32) -> Point3 {
    surface_point(points, s, t).point()
}

/// Output slot for sample (s_index, t_index) on a grid of `steps + 1` samples per side
pub fn sample_index(s_index: usize, t_index: usize, steps: usize) -> usize {
    s_index * (steps + 1) + t_index
}

/// Evaluate the patch on an `(steps + 1)^2` grid and map every sample with `f`.
///
/// Rows of constant `s` are evaluated in parallel. Each sample lands in the
/// slot given by [`sample_index`], so the output order is deterministic.
pub fn sample_grid<T, F>(points: &ControlPoints, steps: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(f32, f32, Homogeneous4) -> T + Sync,
{
    let steps = steps.max(1);
    let n = steps + 1;
    let step = 1.0 / steps as f32;

    (0..n * n)
        .into_par_iter()
        .map(|i| {
            let (s_index, t_index) = (i / n, i % n);
            let s = s_index as f32 * step;
            let t = t_index as f32 * step;
            f(s, t, surface_point(points, s, t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn h(x: f32, y: f32, z: f32) -> Homogeneous4 {
        Point3::new(x, y, z).into()
    }

    #[test]
    fn test_bezier_endpoints() {
        let (p0, p1, p2, p3) = (h(1.0, 2.0, 3.0), h(-4.0, 0.5, 2.0), h(7.0, 7.0, -1.0), h(0.0, -3.0, 9.0));
        assert_eq!(bezier(0.0, p0, p1, p2, p3), p0);
        assert_eq!(bezier(1.0, p0, p1, p2, p3), p3);
    }

    #[test]
    fn test_bezier_weights_sum_to_one() {
        let one = h(0.0, 0.0, 0.0);
        for i in 0..=10 {
            let u = i as f32 / 10.0;
            assert_relative_eq!(bezier(u, one, one, one, one).w, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bezier_midpoint_of_straight_line() {
        let p = bezier(0.5, h(0.0, 0.0, 0.0), h(1.0, 0.0, 0.0), h(2.0, 0.0, 0.0), h(3.0, 0.0, 0.0));
        assert_relative_eq!(p.point().x, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_surface_corners_hit_control_points() {
        let cp = ControlPoints::default();
        let corners = [(0.0, 0.0, 0), (0.0, 1.0, 3), (1.0, 0.0, 12), (1.0, 1.0, 15)];
        for (s, t, idx) in corners {
            let p = evaluate_surface(&cp, s, t);
            let expected = cp.vertices[idx];
            assert_relative_eq!(p.x, expected.x, epsilon = 1e-5);
            assert_relative_eq!(p.y, expected.y, epsilon = 1e-5);
            assert_relative_eq!(p.z, expected.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_flat_patch_stays_flat() {
        let cp = ControlPoints::flat_grid(2.0, 0.0);
        for (s, t) in [(0.1, 0.9), (0.5, 0.5), (0.33, 0.71)] {
            assert_relative_eq!(evaluate_surface(&cp, s, t).z, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sample_grid_slots() {
        let cp = ControlPoints::default();
        let steps = 8;
        let samples = sample_grid(&cp, steps, |s, t, _| (s, t));
        assert_eq!(samples.len(), 81);
        assert_eq!(samples[sample_index(3, 5, steps)], (3.0 / 8.0, 5.0 / 8.0));
        assert_eq!(samples[sample_index(8, 8, steps)], (1.0, 1.0));
    }
}
