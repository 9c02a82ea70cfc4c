//! Sphere primitive, intersected in closed form.

use std::f64::consts::PI;
use std::fmt;

use nurbray_core::ColorFunction;
use nurbray_math::{Aabb, DVec2, DVec3};

use crate::{Intersection, Material};

/// A sphere primitive.
#[derive(Clone)]
pub struct Sphere {
    pub center: DVec3,
    pub radius: f64,
    pub color: ColorFunction,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64, color: ColorFunction, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            color,
            material,
        }
    }

    pub fn bounds(&self) -> Aabb {
        let rvec = DVec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: DVec3) -> DVec2 {
        // p is a point on the unit sphere centered at origin
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;
        DVec2::new(phi / (2.0 * PI), theta / PI)
    }

    /// Nearest intersection in front of `origin`, falling back to the far one
    /// when the near one lies behind it. The normal is unit length and points
    /// inwards when `origin` is inside the sphere.
    pub fn get_intersection(&self, origin: DVec3, direction: DVec3) -> Option<Intersection> {
        let oc = self.center - origin;
        let a = direction.length_squared();
        if a == 0.0 || self.radius == 0.0 {
            return None;
        }
        let h = direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (h - sqrtd) / a;
        let t = if near > 0.0 { near } else { (h + sqrtd) / a };
        if t <= 0.0 {
            return None;
        }

        let location = origin + t * direction;
        let outward = (location - self.center) / self.radius;
        let normal = if c < 0.0 { -outward } else { outward };

        Some(Intersection {
            location,
            normal,
            uv: Self::get_sphere_uv(outward),
        })
    }
}

impl fmt::Debug for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sphere")
            .field("center", &self.center)
            .field("radius", &self.radius)
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}
