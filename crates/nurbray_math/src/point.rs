//! Control point abstraction and homogeneous coordinates.
//!
//! Bezier algorithms in `nurbray_core` run unchanged on scalars, projected 2D
//! working meshes and 4D homogeneous (rational) control points. All they need
//! is affine combination and an infinity norm, which [`ControlPoint`] captures.

use crate::{DVec2, DVec3, DVec4};
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// A point usable as a Bezier control point.
pub trait ControlPoint:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;

    /// Maximum absolute coordinate.
    fn l_inf(self) -> f64;

    /// Convex combination `(1 - t) * self + t * other`.
    #[inline]
    fn lerp_to(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl ControlPoint for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn l_inf(self) -> f64 {
        self.abs()
    }
}

macro_rules! impl_control_point {
    ($($ty:ty),*) => {
        $(
            impl ControlPoint for $ty {
                const ZERO: Self = <$ty>::ZERO;

                #[inline]
                fn l_inf(self) -> f64 {
                    self.abs().max_element()
                }
            }
        )*
    };
}

impl_control_point!(DVec2, DVec3, DVec4);

/// Lifts a 3D point to homogeneous coordinates with weight 1.
#[inline]
pub fn to_homogeneous(p: DVec3) -> DVec4 {
    p.extend(1.0)
}

/// Homogeneous representation of `p` carrying weight `w`: `(w·p, w)`.
#[inline]
pub fn weighted_point(p: DVec3, w: f64) -> DVec4 {
    (p * w).extend(w)
}

/// Projects a homogeneous point back to 3D by dividing through its weight.
///
/// A zero weight yields the origin instead of infinities.
#[inline]
pub fn from_homogeneous(p: DVec4) -> DVec3 {
    if p.w == 0.0 {
        DVec3::ZERO
    } else {
        p.truncate() / p.w
    }
}

/// 2D variant of [`to_homogeneous`], used for line equations.
#[inline]
pub fn to_homogeneous2(p: DVec2) -> DVec3 {
    p.extend(1.0)
}
