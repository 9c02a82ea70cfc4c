//! Bezier curves and tensor-product surfaces.
//!
//! Everything here is de Casteljau based: evaluation, subdivision and
//! clipping are repeated convex combinations of neighbouring control points.
//! The quasi-interpolation operator and its deviation bound are what the
//! clipping solver in [`crate::quasi`] uses to decide where roots can be.

pub mod curve;
pub mod surface;

/// Nairn's constant `floor(d/2)·ceil(d/2) / (2d)` for degree `d`.
pub fn nairn_coefficient(degree: usize) -> f64 {
    if degree == 0 {
        return 0.0;
    }
    let lower = (degree / 2) as f64;
    let upper = degree.div_ceil(2) as f64;
    lower * upper / (2.0 * degree as f64)
}

/// Per-axis coefficient relating second differences to the distance between
/// a Bezier curve of the given degree and its quasi-interpolated polygon.
pub fn deviation_coefficient(degree: usize) -> f64 {
    match degree {
        0 | 1 => 0.0,
        2 => 1.0 / 16.0,
        d => nairn_coefficient(d) - 0.25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nairn_coefficient() {
        assert_eq!(nairn_coefficient(1), 0.0);
        assert_eq!(nairn_coefficient(2), 0.25);
        assert_eq!(nairn_coefficient(3), 1.0 / 3.0);
        assert_eq!(nairn_coefficient(4), 0.5);
    }

    #[test]
    fn test_deviation_coefficient() {
        assert_eq!(deviation_coefficient(1), 0.0);
        assert_eq!(deviation_coefficient(2), 1.0 / 16.0);
        assert!((deviation_coefficient(3) - 1.0 / 12.0).abs() < 1e-15);
        assert_eq!(deviation_coefficient(4), 0.25);
    }
}
