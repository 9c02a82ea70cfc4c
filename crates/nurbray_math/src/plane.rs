//! Plane and line equations used to reduce ray/surface problems to 2D.
//!
//! A plane is stored as `DVec4(n.x, n.y, n.z, d)` so that the signed distance
//! of a homogeneous point `p` is simply `plane.dot(p)`. A 2D line is stored as
//! `DVec3(n.x, n.y, d)` in the same spirit.

use crate::{DVec2, DVec3, DVec4};

/// The plane containing the ray that is parallel to the y axis.
///
/// Degenerate (zero normal) when the direction is parallel to y.
pub fn vertical_plane_of_ray(origin: DVec3, direction: DVec3) -> DVec4 {
    let n = DVec3::new(direction.z, 0.0, -direction.x).normalize_or_zero();
    n.extend(-origin.dot(n))
}

/// The plane containing the ray that is parallel to the x axis.
///
/// Degenerate (zero normal) when the direction is parallel to x.
pub fn horizontal_plane_of_ray(origin: DVec3, direction: DVec3) -> DVec4 {
    let n = DVec3::new(0.0, direction.z, -direction.y).normalize_or_zero();
    n.extend(-origin.dot(n))
}

/// Two independent planes whose intersection line is the ray.
///
/// Projecting a homogeneous point onto both planes yields 2D coordinates in
/// which the ray collapses to the origin. For rational surfaces the projected
/// coordinates are scaled by the point weight, which leaves the zero set
/// unchanged as long as weights are positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayPlanes {
    pub vertical: DVec4,
    pub horizontal: DVec4,
}

impl RayPlanes {
    /// Planes through the ray, or `None` for a zero-length direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let unit = direction.try_normalize()?;
        let vertical = vertical_plane_of_ray(origin, direction);
        let horizontal = horizontal_plane_of_ray(origin, direction);

        let independent = vertical
            .truncate()
            .cross(horizontal.truncate())
            .length_squared()
            > 1e-24;
        if independent {
            return Some(Self { vertical, horizontal });
        }

        // Axis-aligned rays leave one of the classic planes undefined.
        let (a, b) = unit.any_orthonormal_pair();
        Some(Self {
            vertical: a.extend(-origin.dot(a)),
            horizontal: b.extend(-origin.dot(b)),
        })
    }

    /// 2D coordinates of a homogeneous point relative to the ray.
    #[inline]
    pub fn project(&self, p: DVec4) -> DVec2 {
        DVec2::new(p.dot(self.vertical), p.dot(self.horizontal))
    }

    /// 2D coordinates of an ordinary 3D point relative to the ray.
    #[inline]
    pub fn project_point(&self, p: DVec3) -> DVec2 {
        self.project(p.extend(1.0))
    }
}

/// Unnormalized Hesse form of the line through `p` and `q`.
///
/// The normal is oriented so that `normal · p >= 0`, which makes the constant
/// term non-positive.
pub fn unnormalized_hesse_from(p: DVec2, q: DVec2) -> DVec3 {
    let mut normal = (q - p).perp();
    if normal.dot(p) < 0.0 {
        normal = -normal;
    }
    normal.extend(-normal.dot(p))
}

/// z component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross2(a: DVec2, b: DVec2) -> f64 {
    a.perp_dot(b)
}
