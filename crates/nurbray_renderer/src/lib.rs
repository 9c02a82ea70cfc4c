//! nurbray renderer - multi-threaded CPU ray tracing of rational Bezier
//! surfaces.
//!
//! Scenes hold Bezier patches and spheres. Patches are intersected exactly,
//! up to a tolerance, by the root finder in `nurbray_core` instead of being
//! tessellated. Two auxiliary tracers draw flat triangle meshes and
//! pre-subdivided patch hierarchies.

mod material;
mod object;
mod pixel_buffer;
mod renderer;
mod scene;
mod scheduler;
mod screen;
mod shader;
mod sphere;
mod subdivided;
mod triangle;

pub use material::{random_in_hemisphere, reflect, shade_factor, Material};
pub use object::{BezierSurface, Intersection, SceneObject, HIT_EPSILON};
pub use pixel_buffer::PixelBuffer;
pub use renderer::{color_to_rgb, gamma_correct, render, render_pixel, RenderError, RenderResult};
pub use scene::{FacettedScene, HierarchyScene, RenderSettings, SceneDescriptor};
pub use scheduler::{pixel_seed, render_with, PixelSample, TileCursor};
pub use screen::ScreenGeometry;
pub use shader::{closest_intersection, sky_gradient, trace, DIFFUSE_SAMPLES};
pub use sphere::Sphere;
pub use subdivided::render_hierarchy;
pub use triangle::{intersect_triangle, render_facetted};

/// Re-export common math and color types
pub use nurbray_core::{Color, ColorFunction};
pub use nurbray_math::{DVec2, DVec3, DVec4};
