//! Scene objects: everything a ray can hit.

use std::fmt;

use nurbray_core::bezier::surface;
use nurbray_core::{ray_surface_roots, Color, ColorFunction, ControlMesh, SolverOptions};
use nurbray_math::{Aabb, DVec2, DVec3, DVec4, Interval, Ray};

use crate::{Material, Sphere};

/// Hits closer than this along the ray are treated as self-intersections.
pub const HIT_EPSILON: f64 = 1e-8;

/// Where a ray meets an object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub location: DVec3,
    /// Not normalized, and not oriented towards the ray.
    pub normal: DVec3,
    pub uv: DVec2,
}

/// A rational Bezier patch.
#[derive(Clone)]
pub struct BezierSurface {
    pub mesh: ControlMesh<DVec4>,
    pub color: ColorFunction,
    pub material: Material,
    bounds: Aabb,
}

impl BezierSurface {
    /// `mesh` holds homogeneous points with positive weights.
    pub fn new(mesh: ControlMesh<DVec4>, color: ColorFunction, material: Material) -> Self {
        let bounds = mesh.bounds();
        Self {
            mesh,
            color,
            material,
            bounds,
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Closest root in front of `origin`, with `normal = ∂u × ∂v` there.
    pub fn get_intersection(
        &self,
        origin: DVec3,
        direction: DVec3,
        options: &SolverOptions,
    ) -> Option<Intersection> {
        let ray = Ray::new(origin, direction);
        if !self.bounds.hit(&ray, Interval::new(0.0, f64::INFINITY)) {
            return None;
        }

        let report = ray_surface_roots(origin, direction, &self.mesh, options);

        let mut closest: Option<(f64, DVec2, DVec3)> = None;
        for root in report.roots {
            let location = surface::evaluate_rational(&self.mesh, root.x, root.y);
            let offset = location - origin;
            if offset.dot(direction) <= HIT_EPSILON {
                continue;
            }
            let distance2 = offset.length_squared();
            if closest.map_or(true, |(best, _, _)| distance2 < best) {
                closest = Some((distance2, root, location));
            }
        }

        let (_, uv, location) = closest?;
        let (du, dv) = surface::rational_derivatives(&self.mesh, uv.x, uv.y);
        Some(Intersection {
            location,
            normal: du.cross(dv),
            uv,
        })
    }
}

impl fmt::Debug for BezierSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BezierSurface")
            .field("rows", &self.mesh.rows())
            .field("cols", &self.mesh.cols())
            .field("material", &self.material)
            .finish_non_exhaustive()
    }
}

/// Closed set of renderable objects.
#[derive(Debug, Clone)]
pub enum SceneObject {
    BezierSurface(BezierSurface),
    Sphere(Sphere),
}

impl SceneObject {
    pub fn get_intersection(
        &self,
        origin: DVec3,
        direction: DVec3,
        options: &SolverOptions,
    ) -> Option<Intersection> {
        match self {
            SceneObject::BezierSurface(surface) => surface.get_intersection(origin, direction, options),
            SceneObject::Sphere(sphere) => sphere.get_intersection(origin, direction),
        }
    }

    pub fn material(&self) -> Material {
        match self {
            SceneObject::BezierSurface(surface) => surface.material,
            SceneObject::Sphere(sphere) => sphere.material,
        }
    }

    /// Surface colour at `uv`.
    pub fn color(&self, uv: DVec2) -> Color {
        match self {
            SceneObject::BezierSurface(surface) => (surface.color)(uv.x, uv.y),
            SceneObject::Sphere(sphere) => (sphere.color)(uv.x, uv.y),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            SceneObject::BezierSurface(surface) => surface.bounds(),
            SceneObject::Sphere(sphere) => sphere.bounds(),
        }
    }
}

impl From<BezierSurface> for SceneObject {
    fn from(surface: BezierSurface) -> Self {
        SceneObject::BezierSurface(surface)
    }
}

impl From<Sphere> for SceneObject {
    fn from(sphere: Sphere) -> Self {
        SceneObject::Sphere(sphere)
    }
}
