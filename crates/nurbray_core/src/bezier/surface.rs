//! Tensor-product Bezier surface operations on [`ControlMesh`]es.
//!
//! `u` runs along rows, `v` along columns, matching [`ControlMesh`].

use nurbray_math::{from_homogeneous, ControlPoint, DVec3, DVec4};

use super::curve;
use crate::{ControlMesh, ParametricWindow};

/// Surface point at `(u, v)`.
pub fn evaluate<P: ControlPoint>(mesh: &ControlMesh<P>, u: f64, v: f64) -> P {
    let column: Vec<P> = (0..mesh.rows())
        .map(|row| curve::evaluate(mesh.row(row), u))
        .collect();
    curve::evaluate(&column, v)
}

/// Dehomogenised surface point of a rational mesh.
pub fn evaluate_rational(mesh: &ControlMesh<DVec4>, u: f64, v: f64) -> DVec3 {
    from_homogeneous(evaluate(mesh, u, v))
}

/// Surface point and partial derivatives `(S, ∂S/∂u, ∂S/∂v)` at `(u, v)`.
pub fn derivatives<P: ControlPoint>(mesh: &ControlMesh<P>, u: f64, v: f64) -> (P, P, P) {
    let mut at_u = Vec::with_capacity(mesh.rows());
    let mut du = Vec::with_capacity(mesh.rows());
    for row in 0..mesh.rows() {
        at_u.push(curve::evaluate(mesh.row(row), u));
        du.push(curve::derivative(mesh.row(row), u));
    }

    (
        curve::evaluate(&at_u, v),
        curve::evaluate(&du, v),
        curve::derivative(&at_u, v),
    )
}

/// Partial derivatives `(∂S/∂u, ∂S/∂v)` of the dehomogenised surface.
pub fn rational_derivatives(mesh: &ControlMesh<DVec4>, u: f64, v: f64) -> (DVec3, DVec3) {
    let (s, s_u, s_v) = derivatives(mesh, u, v);
    (quotient_rule(s, s_u), quotient_rule(s, s_v))
}

fn quotient_rule(s: DVec4, ds: DVec4) -> DVec3 {
    if s.w == 0.0 {
        return DVec3::ZERO;
    }
    (ds.truncate() * s.w - s.truncate() * ds.w) / (s.w * s.w)
}

/// Restricts the mesh to `window` in place.
pub fn clip<P: ControlPoint>(mesh: &mut ControlMesh<P>, window: &ParametricWindow) {
    for row in 0..mesh.rows() {
        curve::clip(mesh.row_mut(row), window.u.min, window.u.max);
    }
    for col in 0..mesh.cols() {
        let mut column = mesh.column(col);
        curve::clip(&mut column, window.v.min, window.v.max);
        mesh.set_column(col, &column);
    }
}

/// Copy of the mesh restricted to `window`.
pub fn clipped<P: ControlPoint>(mesh: &ControlMesh<P>, window: &ParametricWindow) -> ControlMesh<P> {
    let mut result = mesh.clone();
    clip(&mut result, window);
    result
}

/// Applies the quasi-interpolation kernel down every column, then along
/// every row of the result.
pub fn quasi_interpolate<P: ControlPoint>(mesh: &ControlMesh<P>) -> ControlMesh<P> {
    let mut smoothed = mesh.clone();
    for col in 0..mesh.cols() {
        smoothed.set_column(col, &curve::quasi_interpolate(&mesh.column(col)));
    }
    for row in 0..mesh.rows() {
        let values = curve::quasi_interpolate(smoothed.row(row));
        smoothed.row_mut(row).copy_from_slice(&values);
    }
    smoothed
}

/// Certified bound on the infinity-norm distance between the surface and the
/// bilinear interpolant of its quasi-interpolated mesh.
pub fn max_deviation<P: ControlPoint>(mesh: &ControlMesh<P>) -> f64 {
    let along_rows = (0..mesh.rows())
        .map(|row| curve::max_deviation(mesh.row(row)))
        .fold(0.0, f64::max);
    let along_columns = (0..mesh.cols())
        .map(|col| curve::max_deviation(&mesh.column(col)))
        .fold(0.0, f64::max);
    along_rows + along_columns
}

/// Splits every row at `u`: the patches over `[0,u]×[0,1]` and `[u,1]×[0,1]`.
pub fn subdivide_rows<P: ControlPoint>(
    mesh: &ControlMesh<P>,
    u: f64,
) -> (ControlMesh<P>, ControlMesh<P>) {
    let mut left = Vec::with_capacity(mesh.points().len());
    let mut right = Vec::with_capacity(mesh.points().len());
    for row in 0..mesh.rows() {
        let (l, r) = curve::subdivide(mesh.row(row), u);
        left.extend(l);
        right.extend(r);
    }
    (
        ControlMesh::from_raw(mesh.rows(), mesh.cols(), left),
        ControlMesh::from_raw(mesh.rows(), mesh.cols(), right),
    )
}

/// Splits every column at `v`: the patches over `[0,1]×[0,v]` and `[0,1]×[v,1]`.
pub fn subdivide_columns<P: ControlPoint>(
    mesh: &ControlMesh<P>,
    v: f64,
) -> (ControlMesh<P>, ControlMesh<P>) {
    let (top, bottom) = subdivide_rows(&mesh.transpose(), v);
    (top.transpose(), bottom.transpose())
}

/// Adds one control point to every row without changing the surface.
pub fn elevate_degree_u<P: ControlPoint>(mesh: &ControlMesh<P>) -> ControlMesh<P> {
    let mut points = Vec::with_capacity(mesh.rows() * (mesh.cols() + 1));
    for row in 0..mesh.rows() {
        points.extend(curve::elevate_degree(mesh.row(row)));
    }
    ControlMesh::from_raw(mesh.rows(), mesh.cols() + 1, points)
}

/// Adds one control point to every column without changing the surface.
pub fn elevate_degree_v<P: ControlPoint>(mesh: &ControlMesh<P>) -> ControlMesh<P> {
    elevate_degree_u(&mesh.transpose()).transpose()
}

/// Bilinear interpolation of the control net with uniform parameter spacing.
pub fn evaluate_polygon<P: ControlPoint>(mesh: &ControlMesh<P>, u: f64, v: f64) -> P {
    let column: Vec<P> = (0..mesh.rows())
        .map(|row| curve::evaluate_polygon(mesh.row(row), u))
        .collect();
    curve::evaluate_polygon(&column, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbray_math::{DVec2, Interval};

    fn curved_patch() -> ControlMesh<DVec4> {
        ControlMesh::from_rows(vec![
            vec![
                DVec4::new(-1.5, 1.5, 1.0, 1.0),
                DVec4::new(0.0, 0.0, 1.0, 5.0),
                DVec4::new(1.5, -0.5, 1.0, 1.0),
            ],
            vec![
                DVec4::new(-1.0, 0.5, 2.0, 1.0),
                DVec4::new(0.0, -0.5, 2.0, 1.0),
                DVec4::new(1.0, 0.5, 2.0, 1.0),
            ],
            vec![
                DVec4::new(-1.0, -3.0, 3.0, 1.0),
                DVec4::new(0.0, -2.0, 15.0, 5.0),
                DVec4::new(1.0, -1.0, 3.0, 1.0),
            ],
        ])
        .unwrap()
    }

    fn unit_square() -> ControlMesh<DVec2> {
        ControlMesh::from_rows(vec![
            vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, 1.0)],
            vec![DVec2::new(1.0, 2.0), DVec2::new(2.0, 2.0)],
        ])
        .unwrap()
    }

    #[test]
    fn test_evaluate_corners_and_orientation() {
        let m = unit_square();
        assert_eq!(evaluate(&m, 0.0, 0.0), DVec2::new(1.0, 1.0));
        assert_eq!(evaluate(&m, 1.0, 0.0), DVec2::new(2.0, 1.0));
        assert_eq!(evaluate(&m, 0.0, 1.0), DVec2::new(1.0, 2.0));
        assert_eq!(evaluate(&m, 0.25, 0.5), DVec2::new(1.25, 1.5));
    }

    #[test]
    fn test_clip_by_u() {
        let mut m = ControlMesh::from_rows(vec![
            vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, -2.0)],
            vec![DVec2::new(-1.0, 3.0), DVec2::new(3.0, 2.0)],
        ])
        .unwrap();
        clip(&mut m, &ParametricWindow::new(Interval::new(0.9, 1.0), Interval::UNIT));
        assert!((m.get(0, 0) - DVec2::new(1.9, -1.7)).length() < 1e-12);
        assert_eq!(m.get(0, 1), DVec2::new(2.0, -2.0));
    }

    #[test]
    fn test_clip_full_window_is_identity() {
        let m = curved_patch();
        assert_eq!(clipped(&m, &ParametricWindow::FULL), m);
    }

    #[test]
    fn test_clipped_mesh_reparametrises_window() {
        let m = curved_patch();
        let window = ParametricWindow::new(Interval::new(0.2, 0.7), Interval::new(0.1, 0.4));
        let sub = clipped(&m, &window);
        for (s, t) in [(0.0, 0.0), (0.5, 0.5), (1.0, 0.3), (0.25, 1.0)] {
            let global = window.to_global(DVec2::new(s, t));
            let expected = evaluate(&m, global.x, global.y);
            assert!((evaluate(&sub, s, t) - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_quasi_interpolate_keeps_corners() {
        let m = curved_patch();
        let quasi = quasi_interpolate(&m);
        assert_eq!(quasi.corners(), m.corners());
        let expected_center = {
            let column: Vec<DVec4> = (0..3)
                .map(|c| (m.get(0, c) + m.get(1, c) * 2.0 + m.get(2, c)) * 0.25)
                .collect();
            (column[0] + column[1] * 2.0 + column[2]) * 0.25
        };
        assert!((quasi.get(1, 1) - expected_center).length() < 1e-12);
    }

    #[test]
    fn test_max_deviation_bounds_quasi_surface() {
        let m = curved_patch();
        let quasi = quasi_interpolate(&m);
        let bound = max_deviation(&m);

        let mut max_diff: f64 = 0.0;
        for i in 0..=10 {
            for j in 0..=10 {
                let (u, v) = (i as f64 / 10.0, j as f64 / 10.0);
                let polygon = evaluate_polygon(&quasi, u, v);
                let transposed = evaluate_polygon(&quasi.transpose(), v, u);
                assert!((polygon - transposed).length() < 1e-12);
                max_diff = max_diff.max((polygon - evaluate(&m, u, v)).l_inf());
            }
        }
        assert!(max_diff <= bound + 1e-12, "{max_diff} > {bound}");
    }

    #[test]
    fn test_bilinear_mesh_has_no_deviation() {
        assert_eq!(max_deviation(&unit_square()), 0.0);
    }

    #[test]
    fn test_subdivisions_tile_the_surface() {
        let m = curved_patch();
        let (left, right) = subdivide_rows(&m, 0.5);
        let (top, bottom) = subdivide_columns(&m, 0.25);
        for (s, t) in [(0.0, 0.0), (0.3, 0.8), (1.0, 1.0)] {
            let l = evaluate(&left, s, t) - evaluate(&m, 0.5 * s, t);
            let r = evaluate(&right, s, t) - evaluate(&m, 0.5 + 0.5 * s, t);
            let tp = evaluate(&top, s, t) - evaluate(&m, s, 0.25 * t);
            let bt = evaluate(&bottom, s, t) - evaluate(&m, s, 0.25 + 0.75 * t);
            for diff in [l, r, tp, bt] {
                assert!(diff.length() < 1e-12);
            }
        }
    }

    #[test]
    fn test_elevate_degree_preserves_surface() {
        let m = curved_patch();
        let up = elevate_degree_u(&m);
        let vp = elevate_degree_v(&m);
        assert_eq!((up.rows(), up.cols()), (3, 4));
        assert_eq!((vp.rows(), vp.cols()), (4, 3));
        for (u, v) in [(0.1, 0.9), (0.5, 0.5), (0.75, 0.2)] {
            assert!((evaluate(&up, u, v) - evaluate(&m, u, v)).length() < 1e-12);
            assert!((evaluate(&vp, u, v) - evaluate(&m, u, v)).length() < 1e-12);
        }
    }

    #[test]
    fn test_polynomial_derivatives() {
        // S(u, v) = (u, v + u·v) on the unit square with a raised corner
        let m = ControlMesh::from_rows(vec![
            vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)],
            vec![DVec2::new(0.0, 1.0), DVec2::new(1.0, 2.0)],
        ])
        .unwrap();
        let (s, du, dv) = derivatives(&m, 0.25, 0.5);
        assert!((s - DVec2::new(0.25, 0.625)).length() < 1e-12);
        assert!((du - DVec2::new(1.0, 0.5)).length() < 1e-12);
        assert!((dv - DVec2::new(0.0, 1.25)).length() < 1e-12);
    }

    #[test]
    fn test_rational_derivatives_match_finite_differences() {
        let m = curved_patch();
        let h = 1e-6;
        for (u, v) in [(0.3, 0.4), (0.5, 0.5), (0.8, 0.1)] {
            let (du, dv) = rational_derivatives(&m, u, v);
            let fu = (evaluate_rational(&m, u + h, v) - evaluate_rational(&m, u - h, v)) / (2.0 * h);
            let fv = (evaluate_rational(&m, u, v + h) - evaluate_rational(&m, u, v - h)) / (2.0 * h);
            assert!((du - fu).length() < 1e-5, "{du:?} vs {fu:?}");
            assert!((dv - fv).length() < 1e-5, "{dv:?} vs {fv:?}");
        }
    }
}
