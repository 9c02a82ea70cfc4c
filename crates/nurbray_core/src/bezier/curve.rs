//! Bezier curve operations on control polygons.
//!
//! All functions take the control polygon as a slice; an empty slice is a
//! caller bug.

use nurbray_math::ControlPoint;

use super::deviation_coefficient;

/// De Casteljau evaluation at parameter `u`.
pub fn evaluate<P: ControlPoint>(points: &[P], u: f64) -> P {
    let mut work = points.to_vec();
    for len in (1..work.len()).rev() {
        for i in 0..len {
            work[i] = work[i].lerp_to(work[i + 1], u);
        }
    }
    work[0]
}

/// First derivative with respect to `u`.
pub fn derivative<P: ControlPoint>(points: &[P], u: f64) -> P {
    if points.len() < 2 {
        return P::ZERO;
    }
    let degree = (points.len() - 1) as f64;
    let hodograph: Vec<P> = points.windows(2).map(|w| w[1] - w[0]).collect();
    evaluate(&hodograph, u) * degree
}

/// Splits the curve at `u` into the control polygons of `[0,u]` and `[u,1]`.
pub fn subdivide<P: ControlPoint>(points: &[P], u: f64) -> (Vec<P>, Vec<P>) {
    let n = points.len();
    let mut left = Vec::with_capacity(n);
    let mut right = Vec::with_capacity(n);
    let mut work = points.to_vec();

    for len in (1..=n).rev() {
        left.push(work[0]);
        right.push(work[len - 1]);
        for i in 0..len - 1 {
            work[i] = work[i].lerp_to(work[i + 1], u);
        }
    }

    right.reverse();
    (left, right)
}

/// Restricts the curve to `[umin, umax]` in place.
///
/// Clips to the upper bound first, then clips the remainder to the lower
/// bound expressed relative to it.
pub fn clip<P: ControlPoint>(points: &mut [P], umin: f64, umax: f64) {
    let n = points.len();

    if umax < 1.0 {
        for i in 1..n {
            for j in (i..n).rev() {
                points[j] = points[j - 1].lerp_to(points[j], umax);
            }
        }
    }

    if umin > 0.0 && umax > 0.0 {
        let relative = umin / umax;
        for i in (1..n).rev() {
            for j in 0..i {
                points[j] = points[j].lerp_to(points[j + 1], relative);
            }
        }
    }
}

/// Smooths interior points with the kernel `(p[i-1] + 2 p[i] + p[i+1]) / 4`.
pub fn quasi_interpolate<P: ControlPoint>(points: &[P]) -> Vec<P> {
    let mut result = points.to_vec();
    for i in 1..points.len().saturating_sub(1) {
        result[i] = (points[i - 1] + points[i] * 2.0 + points[i + 1]) * 0.25;
    }
    result
}

/// Largest infinity norm of the centered second differences.
pub fn max_second_difference<P: ControlPoint>(points: &[P]) -> f64 {
    points
        .windows(3)
        .map(|w| (w[0] - w[1] * 2.0 + w[2]).l_inf())
        .fold(0.0, f64::max)
}

/// Upper bound on the distance between the curve and its quasi-interpolated
/// polygon, measured in the infinity norm.
pub fn max_deviation<P: ControlPoint>(points: &[P]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    deviation_coefficient(points.len() - 1) * max_second_difference(points)
}

/// Degree elevation: one more control point, same curve.
pub fn elevate_degree<P: ControlPoint>(points: &[P]) -> Vec<P> {
    let n = points.len();
    let scale = 1.0 / n as f64;
    let mut result = Vec::with_capacity(n + 1);
    result.push(points[0]);
    for i in 1..n {
        let alpha = i as f64 * scale;
        result.push(points[i - 1] * alpha + points[i] * (1.0 - alpha));
    }
    result.push(points[n - 1]);
    result
}

/// Evaluates the control polygon as a polyline with uniform parameter spacing.
pub fn evaluate_polygon<P: ControlPoint>(points: &[P], u: f64) -> P {
    let segments = points.len() - 1;
    if segments == 0 {
        return points[0];
    }
    let s = u.clamp(0.0, 1.0) * segments as f64;
    let i = (s.floor() as usize).min(segments - 1);
    points[i].lerp_to(points[i + 1], s - i as f64)
}
