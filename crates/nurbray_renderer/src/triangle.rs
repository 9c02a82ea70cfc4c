//! Facetted tracer: flat triangle meshes, grey Lambert shading.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use nurbray_math::{DVec3, Interval, Ray};

use crate::material::shade_factor;
use crate::scheduler::render_with;
use crate::{FacettedScene, PixelBuffer, RenderResult, HIT_EPSILON};

/// Ray parameter `t` where `origin + t·direction` meets the triangle, if any.
pub fn intersect_triangle(origin: DVec3, direction: DVec3, triangle: [DVec3; 3]) -> Option<f64> {
    let [v0, v1, v2] = triangle;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < f64::EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(f * edge2.dot(q))
}

/// Render `scene` as a grey image; pixels that miss the mesh stay black.
pub fn render_facetted(scene: &FacettedScene, thread_count: usize) -> RenderResult<PixelBuffer> {
    let bounds = scene.mesh.bounds();
    log::info!(
        "Rendering facetted mesh with {} triangles",
        scene.mesh.triangle_count()
    );

    render_with(&scene.screen, thread_count, 0, |sample, _| {
        let ray = Ray::new(scene.origin, sample.ray);
        if !bounds.hit(&ray, Interval::new(0.0, f64::INFINITY)) {
            return [0; 3];
        }

        let mut nearest = f64::INFINITY;
        let mut shade = 0.0;
        for index in 0..scene.mesh.triangle_count() {
            let Some(t) = intersect_triangle(ray.origin, ray.direction, scene.mesh.triangle(index)) else {
                continue;
            };
            if t > HIT_EPSILON && t < nearest {
                nearest = t;
                shade = shade_factor(scene.mesh.face_normal(index), scene.light);
            }
        }

        let grey = (255.0 * shade).round().clamp(0.0, 255.0) as u8;
        [grey; 3]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScreenGeometry;
    use nurbray_core::TriangleMesh;

    fn triangle() -> [DVec3; 3] {
        // Triangle in XY plane at z=-1
        [
            DVec3::new(-1.0, -1.0, -1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(0.0, 1.0, -1.0),
        ]
    }

    #[test]
    fn test_triangle_hit() {
        let t = intersect_triangle(DVec3::ZERO, -DVec3::Z, triangle()).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_behind() {
        // Ray pointing away
        let t = intersect_triangle(DVec3::ZERO, DVec3::Z, triangle()).unwrap();
        assert!(t < 0.0);
    }

    #[test]
    fn test_triangle_miss() {
        assert!(intersect_triangle(DVec3::new(5.0, 0.0, 0.0), -DVec3::Z, triangle()).is_none());
        assert!(intersect_triangle(DVec3::ZERO, DVec3::X, triangle()).is_none());
    }

    #[test]
    fn test_render_facetted() {
        let mesh = TriangleMesh::new(
            vec![
                DVec3::new(-1.0, -1.0, 5.0),
                DVec3::new(0.0, 1.0, 5.0),
                DVec3::new(1.0, -1.0, 5.0),
            ],
            vec![[0, 1, 2]],
        );
        let scene = FacettedScene {
            screen: ScreenGeometry::new(9, 9, 60.0),
            origin: DVec3::ZERO,
            light: -DVec3::Z,
            mesh,
        };

        let buffer = render_facetted(&scene, 2).unwrap();
        assert_eq!(buffer.get(4, 4), [255; 3]);
        assert_eq!(buffer.get(0, 0), [0; 3]);
    }
}
