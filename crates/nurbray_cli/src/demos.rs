//! Built-in demo scenes.

use std::f64::consts::SQRT_2;
use std::path::Path;

use anyhow::{bail, Context, Result};
use nurbray_core::{
    checker, load_wavefront, parse_wavefront, solid, ColorFunction, ControlMesh, MeshHierarchy,
    TriangleMesh,
};
use nurbray_math::{to_homogeneous, weighted_point, DMat4, DVec3, DVec4};
use nurbray_renderer::{
    BezierSurface, FacettedScene, HierarchyScene, Material, RenderSettings, SceneDescriptor,
    ScreenGeometry, Sphere,
};

pub const SCENES: &[&str] = &[
    "curved",
    "twisted",
    "sphere-patch",
    "spheres",
    "multiple",
    "hierarchy",
    "facetted",
];

/// A scene ready for one of the three tracers.
pub enum Demo {
    Surfaces(SceneDescriptor),
    Facetted(FacettedScene),
    Hierarchy(HierarchyScene),
}

/// Build demo `name`. `mesh` replaces the built-in model of the facetted scene.
pub fn build(
    name: &str,
    screen: ScreenGeometry,
    settings: RenderSettings,
    mesh: Option<&Path>,
) -> Result<Demo> {
    let demo = match name {
        "curved" => Demo::Surfaces(
            single_surface(screen, settings, curved_patch()?)
                .with_settings(RenderSettings { epsilon: 1e-5, ..settings }),
        ),
        "twisted" => Demo::Surfaces(
            single_surface(screen, settings, twisted_patch()?)
                .with_settings(RenderSettings { epsilon: 1e-9, ..settings }),
        ),
        "sphere-patch" => Demo::Surfaces(
            single_surface(screen, settings, sphere_patch()?)
                .with_origin(DVec3::new(0.0, 0.0, -35.0))
                .with_light(DVec3::new(1.0, -1.0, 5.0))
                .with_settings(RenderSettings { epsilon: 1e-5, ..settings }),
        ),
        "spheres" => Demo::Surfaces(spheres(screen, settings)),
        "multiple" => Demo::Surfaces(multiple_surfaces(screen, settings)?),
        "hierarchy" => Demo::Hierarchy(HierarchyScene {
            screen,
            origin: DVec3::new(0.0, 0.0, -5.0),
            light: DVec3::new(-1.0, 2.0, -5.0),
            hierarchy: MeshHierarchy::build(&curved_patch()?, 6),
            color: checker_texture(0),
        }),
        "facetted" => {
            let mesh = match mesh {
                Some(path) => load_wavefront(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => octahedron()?,
            };
            Demo::Facetted(FacettedScene {
                screen,
                origin: DVec3::new(0.0, 0.0, -5.0),
                light: DVec3::new(-1.0, 2.0, -5.0),
                mesh,
            })
        }
        other => bail!("Unknown scene '{}', expected one of: {}", other, SCENES.join(", ")),
    };
    Ok(demo)
}

fn checker_texture(index: usize) -> ColorFunction {
    let rgb = |r: f64, g: f64, b: f64| DVec3::new(r, g, b) / 255.0;
    match index {
        0 => checker(rgb(255.0, 210.0, 80.0), rgb(210.0, 80.0, 255.0), 10.0),
        _ => checker(rgb(255.0, 80.0, 210.0), rgb(25.0, 255.0, 45.0), 10.0),
    }
}

fn single_surface(
    screen: ScreenGeometry,
    settings: RenderSettings,
    mesh: ControlMesh<DVec4>,
) -> SceneDescriptor {
    SceneDescriptor::new(screen)
        .with_origin(DVec3::new(0.0, 0.0, -5.0))
        .with_light(DVec3::new(-1.0, 2.0, -5.0))
        .with_settings(settings)
        .with_object(BezierSurface::new(mesh, checker_texture(0), Material::Flat))
}

/// Biquadratic patch with two heavily weighted middle points.
pub fn curved_patch() -> Result<ControlMesh<DVec4>> {
    Ok(ControlMesh::from_rows(vec![
        vec![
            to_homogeneous(DVec3::new(-1.5, 1.5, 1.0)),
            weighted_point(DVec3::new(0.0, 0.0, 0.2), 5.0),
            to_homogeneous(DVec3::new(1.5, -0.5, 1.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(-1.0, 0.5, 2.0)),
            to_homogeneous(DVec3::new(0.0, -0.5, 2.0)),
            to_homogeneous(DVec3::new(1.0, 0.5, 2.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(-1.0, -3.0, 3.0)),
            weighted_point(DVec3::new(0.0, -0.4, 3.0), 5.0),
            to_homogeneous(DVec3::new(1.0, -1.0, 3.0)),
        ],
    ])?)
}

/// Bilinear saddle.
pub fn twisted_patch() -> Result<ControlMesh<DVec4>> {
    Ok(ControlMesh::from_rows(vec![
        vec![
            to_homogeneous(DVec3::new(-2.0, 0.0, 1.0)),
            to_homogeneous(DVec3::new(2.0, 0.0, 1.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(0.0, -2.0, 2.0)),
            to_homogeneous(DVec3::new(0.0, 2.0, 2.0)),
        ],
    ])?)
}

/// Degree 4 × 4 rational patch covering an octant of a sphere of radius 8.
pub fn sphere_patch() -> Result<ControlMesh<DVec4>> {
    let s = SQRT_2;
    let p = |x: f64, y: f64, z: f64, w: f64| weighted_point(DVec3::new(x, y, z), w);
    let mesh = ControlMesh::from_rows(vec![
        vec![
            p(8.0, 0.0, 0.0, 8.0),
            p(4.0 * s, 2.0 * s, 0.0, 4.0 * s),
            p(4.0, 4.0, 0.0, 16.0 / 3.0),
            p(2.0 * s, 4.0 * s, 0.0, 4.0 * s),
            p(0.0, 8.0, 0.0, 8.0),
        ],
        vec![
            p(4.0 * s, -2.0 * s, 0.0, 4.0 * s),
            p(4.0, 0.0, -3.0, 3.0),
            p(5.0 * s / 3.0, 5.0 * s / 3.0, -8.0 * s / 3.0, 4.0 * s / 3.0),
            p(0.0, 4.0, -3.0, 3.0),
            p(-2.0 * s, 4.0 * s, 0.0, 4.0 * s),
        ],
        vec![
            p(4.0, -4.0, 0.0, 16.0 / 3.0),
            p(5.0 * s / 3.0, -5.0 * s / 3.0, -8.0 * s / 3.0, 4.0 * s / 3.0),
            p(0.0, 0.0, -16.0 / 3.0, 8.0 / 9.0),
            p(-5.0 * s / 3.0, 5.0 * s / 3.0, -8.0 * s / 3.0, 4.0 * s / 3.0),
            p(-4.0, 4.0, 0.0, 16.0 / 3.0),
        ],
        vec![
            p(2.0 * s, -4.0 * s, 0.0, 4.0 * s),
            p(0.0, -4.0, -3.0, 3.0),
            p(-5.0 * s / 3.0, -5.0 * s / 3.0, -8.0 * s / 3.0, 4.0 * s / 3.0),
            p(-4.0, 0.0, -3.0, 3.0),
            p(-4.0 * s, 2.0 * s, 0.0, 4.0 * s),
        ],
        vec![
            p(0.0, -8.0, 0.0, 8.0),
            p(-2.0 * s, -4.0 * s, 0.0, 4.0 * s),
            p(-4.0, -4.0, 0.0, 16.0 / 3.0),
            p(-4.0 * s, -2.0 * s, 0.0, 4.0 * s),
            p(-8.0, 0.0, 0.0, 8.0),
        ],
    ])?;
    let rotation = DMat4::from_rotation_y(25f64.to_radians()) * DMat4::from_rotation_x(60f64.to_radians());
    Ok(mesh.transformed(rotation))
}

fn spheres(screen: ScreenGeometry, settings: RenderSettings) -> SceneDescriptor {
    SceneDescriptor::new(screen)
        .with_origin(DVec3::new(0.0, 0.0, -5.0))
        .with_light(DVec3::new(-1.0, 2.0, -5.0))
        .with_settings(settings)
        .with_object(Sphere::new(
            DVec3::new(0.0, -101.0, 3.0),
            100.0,
            solid(DVec3::new(0.8, 0.8, 0.0)),
            Material::Diffuse,
        ))
        .with_object(Sphere::new(
            DVec3::new(-0.6, -0.4, 2.5),
            0.6,
            checker_texture(1),
            Material::Diffuse,
        ))
        .with_object(Sphere::new(
            DVec3::new(0.7, -0.3, 3.0),
            0.7,
            solid(DVec3::ONE),
            Material::Reflective,
        ))
}

fn multiple_surfaces(screen: ScreenGeometry, settings: RenderSettings) -> Result<SceneDescriptor> {
    let placed = |scale: f64, offset: DVec3| -> Result<ControlMesh<DVec4>> {
        let transform = DMat4::from_translation(offset) * DMat4::from_scale(DVec3::splat(scale));
        Ok(curved_patch()?.transformed(transform))
    };

    let plane = ControlMesh::from_rows(vec![
        vec![
            to_homogeneous(DVec3::new(-1.5, -1.5, 50.0)),
            to_homogeneous(DVec3::new(1.5, -1.5, 50.0)),
        ],
        vec![
            to_homogeneous(DVec3::new(-1.5, -1.5, -0.5)),
            to_homogeneous(DVec3::new(1.5, -1.5, -0.5)),
        ],
    ])?;

    Ok(SceneDescriptor::new(screen)
        .with_origin(DVec3::new(0.0, 0.0, -5.0))
        .with_light(DVec3::new(-1.0, 2.0, -5.0))
        .with_settings(settings)
        .with_object(BezierSurface::new(
            placed(-0.6, DVec3::new(0.4, 0.4, 3.0))?,
            checker_texture(0),
            Material::Diffuse,
        ))
        .with_object(BezierSurface::new(
            placed(0.6, DVec3::new(-0.3, -0.3, 2.0))?,
            checker_texture(1),
            Material::Reflective,
        ))
        .with_object(BezierSurface::new(plane, checker_texture(0), Material::Diffuse)))
}

const OCTAHEDRON: &str = "\
v 0 1 0
v 1 0 0
v 0 0 -1
v -1 0 0
v 0 0 1
v 0 -1 0
f 1 3 2
f 1 4 3
f 1 5 4
f 1 2 5
f 6 2 3
f 6 3 4
f 6 4 5
f 6 5 2
";

fn octahedron() -> Result<TriangleMesh> {
    Ok(parse_wavefront(OCTAHEDRON)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_builds() {
        let screen = ScreenGeometry::new(4, 4, 30.0);
        for name in SCENES {
            assert!(build(name, screen, RenderSettings::default(), None).is_ok(), "{name}");
        }
        assert!(build("teapot", screen, RenderSettings::default(), None).is_err());
    }

    #[test]
    fn test_sphere_patch_corners_on_sphere() {
        use nurbray_core::bezier::surface::evaluate_rational;

        let mesh = sphere_patch().unwrap();
        for (u, v) in [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)] {
            let radius = evaluate_rational(&mesh, u, v).length();
            assert!((radius - 8.0).abs() < 1e-9, "{radius}");
        }
    }
}
