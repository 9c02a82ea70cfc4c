//! Closed-form intersections with bilinear (2×2) patches.
//!
//! [`BilinearPatch::intersect`] is the ray/patch solver used as the base case
//! of the clipping solver. [`invert_bilinear`] solves the same problem for a
//! planar patch by inverting the bilinear map directly; the two are
//! independent formulations and are checked against each other in tests.

use nurbray_math::{DVec2, DVec3, Interval};

use crate::bezier::surface;
use crate::ControlMesh;

/// Slack on the parameter domain for accepting roots on patch borders.
pub const RAY_EPSILON: f64 = 1e-12;

/// Real roots of `a x² + b x + c` lying strictly inside `interval`.
///
/// A vanishing leading coefficient degrades to the linear case, a vanishing
/// discriminant to the double root.
pub fn quadratic_roots(a: f64, b: f64, c: f64, interval: Interval) -> Vec<f64> {
    let candidates = if a == 0.0 {
        if b == 0.0 {
            Vec::new()
        } else {
            vec![-c / b]
        }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            Vec::new()
        } else if discriminant == 0.0 {
            vec![-b / (2.0 * a)]
        } else {
            let q = -0.5 * (b + discriminant.sqrt().copysign(b));
            vec![c / q, q / a]
        }
    };

    candidates
        .into_iter()
        .filter(|root| interval.surrounds(*root))
        .collect()
}

/// Roots of `a x² + b x + c` in `[-1e-9, 1 + 1e-9]`.
fn unit_quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let candidates = if a == 0.0 {
        if b == 0.0 {
            Vec::new()
        } else {
            vec![-c / b]
        }
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            Vec::new()
        } else if discriminant == 0.0 {
            vec![-b / (2.0 * a)]
        } else {
            let root = discriminant.sqrt();
            vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
        }
    };

    candidates
        .into_iter()
        .filter(|s| (-1e-9..=1.0 + 1e-9).contains(s))
        .collect()
}

/// A ray hit on a bilinear patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchHit {
    pub u: f64,
    pub v: f64,
    pub t: f64,
}

/// `P(u,v) = (1-u)(1-v) P00 + (1-u) v P01 + u (1-v) P10 + u v P11`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilinearPatch {
    pub p00: DVec3,
    pub p01: DVec3,
    pub p10: DVec3,
    pub p11: DVec3,
}

impl BilinearPatch {
    pub fn new(p00: DVec3, p01: DVec3, p10: DVec3, p11: DVec3) -> Self {
        Self { p00, p01, p10, p11 }
    }

    /// Patch over the corners of a control mesh, with the mesh's `u` and `v`.
    pub fn from_mesh(mesh: &ControlMesh<DVec3>) -> Self {
        let [c00, c0n, cm0, cmn] = mesh.corners();
        Self::new(c00, cm0, c0n, cmn)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> DVec3 {
        self.p00 * ((1.0 - u) * (1.0 - v))
            + self.p01 * ((1.0 - u) * v)
            + self.p10 * (u * (1.0 - v))
            + self.p11 * (u * v)
    }

    /// Intersections of the ray `origin + t·direction`, `t > 0`.
    ///
    /// Both planes through the ray give a bilinear equation in `(u, v)`;
    /// eliminating `u` leaves a quadratic in `v`.
    pub fn intersect(&self, origin: DVec3, direction: DVec3) -> Vec<PatchHit> {
        let Some(unit) = direction.try_normalize() else {
            return Vec::new();
        };
        let (n1, n2) = unit.any_orthonormal_pair();

        let a = self.p11 - self.p10 - self.p01 + self.p00;
        let b = self.p10 - self.p00;
        let c = self.p01 - self.p00;
        let d = self.p00;

        let (m1, m2) = (n1.dot(a), n2.dot(a));
        let (j1, j2) = (n1.dot(b), n2.dot(b));
        let (k1, k2) = (n1.dot(c), n2.dot(c));
        let (r1, r2) = (n1.dot(d) - n1.dot(origin), n2.dot(d) - n2.dot(origin));

        let qa = m1 * k2 - m2 * k1;
        let qb = m1 * r2 - m2 * r1 - j2 * k1 + j1 * k2;
        let qc = j1 * r2 - r1 * j2;

        let domain = Interval::new(-RAY_EPSILON, 1.0 + RAY_EPSILON);
        quadratic_roots(qa, qb, qc, domain)
            .into_iter()
            .filter_map(|v| {
                let u = solve_u(v, [m1, m2], [j1, j2], [k1, k2], [r1, r2]);
                if !domain.surrounds(u) {
                    return None;
                }
                let t = ray_parameter(origin, direction, self.evaluate(u, v));
                (t > 0.0).then_some(PatchHit { u, v, t })
            })
            .collect()
    }
}

/// Back-substitutes `v`, dividing by whichever of the two equivalent
/// denominators is larger in magnitude.
fn solve_u(v: f64, m: [f64; 2], j: [f64; 2], k: [f64; 2], r: [f64; 2]) -> f64 {
    let difference = v * (m[0] - m[1]) + j[0] - j[1];
    let first = v * m[0] + j[0];
    if difference.abs() > first.abs() {
        (v * (k[1] - k[0]) + r[1] - r[0]) / difference
    } else {
        -(v * k[0] + r[0]) / first
    }
}

/// Ray parameter of `point`, read off the dominant direction component.
fn ray_parameter(origin: DVec3, direction: DVec3, point: DVec3) -> f64 {
    let axis = if direction.x.abs() >= direction.y.abs() && direction.x.abs() >= direction.z.abs() {
        0
    } else if direction.y.abs() >= direction.z.abs() {
        1
    } else {
        2
    };
    (point[axis] - origin[axis]) / direction[axis]
}

/// Parameters `(u, v)` where a planar 2×2 mesh passes through the 2D origin.
///
/// The plane is lifted to `z = 0` and hit by a ray along `+z`.
pub fn bilinear_patch_roots(mesh: &ControlMesh<DVec2>) -> Vec<DVec2> {
    let patch = BilinearPatch::from_mesh(&mesh.lift());
    patch
        .intersect(DVec3::new(0.0, 0.0, -1000.0), DVec3::Z)
        .into_iter()
        .map(|hit| DVec2::new(hit.u, hit.v))
        .collect()
}

/// Parameters along `a → b` of the points on the ruled family
/// `a + s(b - a) + t(c - a + s(d - c - b + a))` that contain `p`.
fn ruled_parameters(p: DVec2, a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> Vec<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let twist = (d - c) - ab;

    let rac = ac.perp();
    let rtwist = twist.perp();

    let constant = rac.dot(ap);
    let linear = rtwist.dot(ap) - ab.dot(rac);
    let quadratic = -ab.dot(rtwist);

    unit_quadratic_roots(quadratic, linear, constant)
}

/// Inverse bilinear interpolation: every `(u, v)` with `S(u, v) = point` on
/// the patch spanned by the corners of `mesh`, up to `epsilon` in the
/// infinity norm.
pub fn invert_bilinear(point: DVec2, mesh: &ControlMesh<DVec2>, epsilon: f64) -> Vec<DVec2> {
    let [c00, c01, c10, c11] = mesh.corners();
    let corners = ControlMesh::from_raw(2, 2, vec![c00, c01, c10, c11]);

    let along_v = ruled_parameters(point, c00, c10, c01, c11);
    let along_u = ruled_parameters(point, c00, c01, c10, c11);

    let mut solutions = Vec::new();
    for &u in &along_u {
        for &v in &along_v {
            let residual = point - surface::evaluate(&corners, u, v);
            if residual.abs().max_element() <= epsilon {
                solutions.push(DVec2::new(u, v));
            }
        }
    }
    solutions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh2(points: [[f64; 2]; 4]) -> ControlMesh<DVec2> {
        ControlMesh::new(2, 2, points.iter().map(|p| DVec2::from_array(*p)).collect()).unwrap()
    }

    #[test]
    fn test_quadratic_roots_linear_case() {
        let unit = Interval::new(-RAY_EPSILON, 1.0 + RAY_EPSILON);
        assert!(quadratic_roots(0.0, 2.0, -4.0, unit).is_empty());
        assert_eq!(quadratic_roots(0.0, 2.0, -4.0, Interval::new(0.0, 3.0)), vec![2.0]);
        assert!(quadratic_roots(0.0, 0.0, 1.0, Interval::UNIVERSE).is_empty());
    }

    #[test]
    fn test_quadratic_roots_general_case() {
        let mut roots = quadratic_roots(1.0, -3.0, 2.0, Interval::UNIVERSE);
        roots.sort_by(f64::total_cmp);
        assert_eq!(roots, vec![1.0, 2.0]);

        assert_eq!(quadratic_roots(1.0, -3.0, 2.0, Interval::new(0.0, 1.5)), vec![1.0]);
        assert!(quadratic_roots(1.0, 0.0, 1.0, Interval::UNIVERSE).is_empty());
        assert_eq!(quadratic_roots(1.0, -2.0, 1.0, Interval::UNIVERSE), vec![1.0]);
    }

    #[test]
    fn test_planar_patch_center() {
        let mesh = mesh2([[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]]);
        let roots = bilinear_patch_roots(&mesh);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - DVec2::new(0.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn test_patch_hit_reproduces_point() {
        let patch = BilinearPatch::new(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.3),
            DVec3::new(1.0, 0.0, -0.2),
            DVec3::new(1.2, 1.1, 0.8),
        );
        let target = patch.evaluate(0.3, 0.6);
        let origin = DVec3::new(0.2, -0.4, -3.0);

        let hits = patch.intersect(origin, target - origin);
        assert!(
            hits.iter().any(|hit| (hit.u - 0.3).abs() < 1e-9
                && (hit.v - 0.6).abs() < 1e-9
                && (hit.t - 1.0).abs() < 1e-9),
            "{hits:?}"
        );
        for hit in &hits {
            let point = patch.evaluate(hit.u, hit.v);
            assert!((point - (origin + (target - origin) * hit.t)).length() < 1e-9);
        }
    }

    #[test]
    fn test_patch_behind_ray_is_rejected() {
        let patch = BilinearPatch::new(
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
        );
        assert!(patch.intersect(DVec3::new(0.0, 0.0, 5.0), DVec3::Z).is_empty());
        assert!(patch.intersect(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO).is_empty());
        assert_eq!(patch.intersect(DVec3::new(0.0, 0.0, 5.0), -DVec3::Z).len(), 1);
    }

    #[test]
    fn test_invert_bilinear_corners_and_edges() {
        let mesh = mesh2([[1.0, 2.0], [3.0, 0.0], [0.0, 9.0], [4.0, 8.0]]);
        let cases = [
            ([1.0, 2.0], [0.0, 0.0]),
            ([3.0, 0.0], [1.0, 0.0]),
            ([4.0, 8.0], [1.0, 1.0]),
            ([0.0, 9.0], [0.0, 1.0]),
            ([2.0, 1.0], [0.5, 0.0]),
            ([0.5, 5.5], [0.0, 0.5]),
            ([2.0, 8.5], [0.5, 1.0]),
            ([3.5, 4.0], [1.0, 0.5]),
            ([2.0, 4.75], [0.5, 0.5]),
        ];
        for (point, expected) in cases {
            let solutions = invert_bilinear(DVec2::from_array(point), &mesh, 1e-9);
            assert!(!solutions.is_empty(), "{point:?}");
            assert!(
                solutions
                    .iter()
                    .all(|s| (*s - DVec2::from_array(expected)).length() < 1e-9),
                "{point:?}: {solutions:?}"
            );
        }
    }

    #[test]
    fn test_closed_form_agrees_with_inverse_bilinear() {
        let mesh = mesh2([[-2.0, -1.0], [1.0, -1.5], [-1.5, 1.0], [2.0, 2.0]]);
        for (u, v) in [(0.2, 0.2), (0.5, 0.5), (0.7, 0.3), (0.25, 0.8), (0.9, 0.6)] {
            let point = surface::evaluate(&mesh, u, v);
            let shifted = mesh.map(|p| p - point);

            let closed_form = bilinear_patch_roots(&shifted);
            let inverse = invert_bilinear(point, &mesh, 1e-9);

            assert_eq!(closed_form.len(), 1, "({u}, {v})");
            assert_eq!(inverse.len(), 1, "({u}, {v})");
            assert!((closed_form[0] - inverse[0]).length() < 1e-8);
            assert!((closed_form[0] - DVec2::new(u, v)).length() < 1e-8);
        }
    }
}
