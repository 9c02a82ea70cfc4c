//! End-to-end render scenarios.

use std::sync::atomic::{AtomicU32, Ordering};

use nurbray_core::{solid, ControlMesh, SolverOptions};
use nurbray_math::{to_homogeneous, weighted_point, DVec2, DVec3};
use nurbray_renderer::{
    closest_intersection, render, render_with, BezierSurface, Material, RenderSettings,
    SceneDescriptor, ScreenGeometry, Sphere,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn planar_patch() -> BezierSurface {
    let mesh = ControlMesh::from_rows(vec![
        vec![to_homogeneous(DVec3::new(-1.0, -1.0, 0.0)), to_homogeneous(DVec3::new(-1.0, 1.0, 0.0))],
        vec![to_homogeneous(DVec3::new(1.0, -1.0, 0.0)), to_homogeneous(DVec3::new(1.0, 1.0, 0.0))],
    ])
    .unwrap();
    BezierSurface::new(mesh, solid(DVec3::ONE), Material::Flat)
}

fn curved_patch(material: Material) -> BezierSurface {
    let mesh = ControlMesh::from_rows(vec![
        vec![
            to_homogeneous(DVec3::new(-1.5, -1.0, 6.0)),
            weighted_point(DVec3::new(0.0, -1.5, 5.0), 5.0),
            to_homogeneous(DVec3::new(1.5, -1.0, 6.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(-1.5, 0.0, 5.0)),
            to_homogeneous(DVec3::new(0.0, 0.0, 4.0)),
            to_homogeneous(DVec3::new(1.5, 0.0, 5.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(-1.5, 1.0, 6.0)),
            weighted_point(DVec3::new(0.0, 1.5, 5.0), 5.0),
            to_homogeneous(DVec3::new(1.5, 1.0, 6.0)),
        ],
    ])
    .unwrap();
    BezierSurface::new(mesh, solid(DVec3::new(0.9, 0.6, 0.3)), material)
}

#[test]
fn test_planar_bilinear_patch() {
    init_logging();
    let scene = SceneDescriptor::new(ScreenGeometry::new(8, 8, 30.0))
        .with_origin(DVec3::new(0.0, 0.0, -5.0))
        .with_object(planar_patch());

    let (index, hit) =
        closest_intersection(&scene, scene.origin, DVec3::Z, &SolverOptions::default()).unwrap();

    assert_eq!(index, 0);
    assert!((hit.uv - DVec2::new(0.5, 0.5)).length() < 1e-12);
    assert!(hit.location.length() < 1e-12);
}

#[test]
fn test_sphere_front_face() {
    init_logging();
    let scene = SceneDescriptor::new(ScreenGeometry::new(8, 8, 30.0)).with_object(Sphere::new(
        DVec3::new(0.0, 0.0, 5.0),
        1.0,
        solid(DVec3::ONE),
        Material::Diffuse,
    ));

    let (_, hit) =
        closest_intersection(&scene, DVec3::ZERO, DVec3::Z, &SolverOptions::default()).unwrap();

    assert!((hit.location - DVec3::new(0.0, 0.0, 4.0)).length() < 1e-12);
    // Front face: the normal points back at the ray origin
    assert!(hit.normal.dot(DVec3::ZERO - hit.location) > 0.0);
}

#[test]
fn test_every_pixel_shaded_once() {
    init_logging();
    let screen = ScreenGeometry::new(512, 512, 30.0);
    let calls: Vec<AtomicU32> = (0..512 * 512).map(|_| AtomicU32::new(0)).collect();

    let buffer = render_with(&screen, 1, 0, |sample, _| {
        calls[(sample.y * 512 + sample.x) as usize].fetch_add(1, Ordering::Relaxed);
        [0; 3]
    })
    .unwrap();

    assert_eq!(buffer.data.len(), 512 * 512 * 3);
    assert!(calls.iter().all(|count| count.load(Ordering::Relaxed) == 1));
}

#[test]
fn test_thread_count_does_not_change_pixels() {
    init_logging();
    let settings = RenderSettings::default().with_max_depth(1).with_seed(3);
    let scene = SceneDescriptor::new(ScreenGeometry::new(16, 12, 40.0))
        .with_light(DVec3::new(0.0, 5.0, -5.0))
        .with_settings(settings)
        .with_object(curved_patch(Material::Flat))
        .with_object(Sphere::new(
            DVec3::new(0.8, 0.3, 3.5),
            0.4,
            solid(DVec3::new(0.2, 0.8, 0.2)),
            Material::Diffuse,
        ));

    let single = render(&scene, 1).unwrap();
    let several = render(&scene, 4).unwrap();
    let again = render(&scene, 4).unwrap();

    assert_eq!(single, several);
    assert_eq!(several, again);
}

#[test]
fn test_curved_patch_is_visible() {
    init_logging();
    let settings = RenderSettings::default().with_samples(1);
    let scene = SceneDescriptor::new(ScreenGeometry::new(9, 9, 30.0))
        .with_light(DVec3::new(0.0, 0.0, -10.0))
        .with_settings(settings)
        .with_object(curved_patch(Material::Flat));

    let (_, hit) =
        closest_intersection(&scene, DVec3::ZERO, DVec3::Z, &settings.solver_options()).unwrap();
    assert!(hit.location.z > 4.0 && hit.location.z < 6.0);

    let buffer = render(&scene, 2).unwrap();
    let center = buffer.get(4, 4);
    // Flat shading of the patch colour, not the blue-white sky
    assert!(center[0] > center[2]);
}
