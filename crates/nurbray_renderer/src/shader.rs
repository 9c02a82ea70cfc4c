//! Recursive shading of a single ray.
//!
//! A miss returns the sky gradient. A hit on a diffuse surface averages
//! [`DIFFUSE_SAMPLES`] recursive rays tinted by the surface colour; a
//! reflective surface follows the mirror direction; a flat surface is Lambert
//! shaded towards the light. Recursive materials give up with mid-grey once
//! the depth budget is spent.

use nurbray_core::{Color, SolverOptions};
use nurbray_math::DVec3;
use rand::RngCore;

use crate::material::{random_in_hemisphere, reflect, shade_factor};
use crate::{Intersection, Material, SceneDescriptor, HIT_EPSILON};

pub const DIFFUSE_SAMPLES: usize = 6;

/// Fraction of the incoming colour a mirror keeps.
pub const REFLECTANCE: f64 = 0.9;

/// Secondary rays start this far off the surface, along the unit normal.
pub const SURFACE_OFFSET: f64 = 1e-7;

const DEPTH_EXHAUSTED: Color = Color::splat(0.5);

/// Closest hit across all objects whose distance along the ray exceeds
/// [`HIT_EPSILON`], with the index of the object hit.
pub fn closest_intersection(
    scene: &SceneDescriptor,
    origin: DVec3,
    direction: DVec3,
    options: &SolverOptions,
) -> Option<(usize, Intersection)> {
    let mut closest: Option<(f64, usize, Intersection)> = None;

    for (index, object) in scene.objects.iter().enumerate() {
        let Some(hit) = object.get_intersection(origin, direction, options) else {
            continue;
        };
        let offset = hit.location - origin;
        if offset.dot(direction) <= HIT_EPSILON {
            continue;
        }
        let distance2 = offset.length_squared();
        if closest.as_ref().map_or(true, |(best, _, _)| distance2 < *best) {
            closest = Some((distance2, index, hit));
        }
    }

    closest.map(|(_, index, hit)| (index, hit))
}

/// Colour seen along `direction` from `origin`.
pub fn trace(
    scene: &SceneDescriptor,
    origin: DVec3,
    direction: DVec3,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(direction) = direction.try_normalize() else {
        return sky_gradient(DVec3::ZERO);
    };

    let options = scene.settings.solver_options();
    let Some((index, hit)) = closest_intersection(scene, origin, direction, &options) else {
        return sky_gradient(direction);
    };

    let object = &scene.objects[index];
    let normal = if hit.normal.dot(direction) < 0.0 {
        hit.normal
    } else {
        -hit.normal
    };
    let unit_normal = normal.normalize_or_zero();
    let color = object.color(hit.uv);

    match object.material() {
        Material::Diffuse => {
            if depth >= scene.settings.max_depth {
                return DEPTH_EXHAUSTED;
            }
            let start = hit.location + SURFACE_OFFSET * unit_normal;
            let mut accumulated = Color::ZERO;
            for _ in 0..DIFFUSE_SAMPLES {
                let sample = unit_normal + random_in_hemisphere(normal, rng);
                accumulated += color * trace(scene, start, sample, depth + 1, rng);
            }
            accumulated / DIFFUSE_SAMPLES as f64
        }
        Material::Reflective => {
            if depth >= scene.settings.max_depth {
                return DEPTH_EXHAUSTED;
            }
            let start = hit.location + SURFACE_OFFSET * unit_normal;
            REFLECTANCE * trace(scene, start, reflect(direction, unit_normal), depth + 1, rng)
        }
        Material::Flat => shade_factor(normal, scene.light - hit.location) * color,
    }
}

/// White towards the ground, light blue towards the sky.
pub fn sky_gradient(direction: DVec3) -> Color {
    let a = 0.5 * (direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}
