//! Hierarchy tracer: shades the pre-subdivided leaf patches a ray passes
//! through, without solving for exact roots.

use crate::material::shade_factor;
use crate::renderer::color_to_rgb;
use crate::scheduler::render_with;
use crate::{HierarchyScene, PixelBuffer, RenderResult};

/// Render `scene` flat-shaded per leaf; pixels that miss stay black.
///
/// Among the leaves whose convex hull contains the ray, the one whose
/// barycentre is nearest the camera wins.
pub fn render_hierarchy(scene: &HierarchyScene, thread_count: usize) -> RenderResult<PixelBuffer> {
    log::info!("Rendering mesh hierarchy with {} nodes", scene.hierarchy.len());

    render_with(&scene.screen, thread_count, 0, |sample, _| {
        let nearest = scene
            .hierarchy
            .intersect(scene.origin, sample.ray)
            .into_iter()
            .map(|index| scene.hierarchy.node(index))
            .map(|node| ((node.barycenter() - scene.origin).length_squared(), node))
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((_, leaf)) = nearest else {
            return [0; 3];
        };

        let shade = shade_factor(leaf.corner_normal(), scene.light);
        let uv = leaf.window.midpoint();
        color_to_rgb(shade * (scene.color)(uv.x, uv.y), None)
    })
}
