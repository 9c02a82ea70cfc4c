//! Render entry point for scenes of Bezier surfaces and spheres.
//!
//! Implements:
//! - Recursive shading with configurable depth
//! - Jittered supersampling
//! - Gamma correction

use nurbray_core::Color;
use rand::{Rng, RngCore};
use thiserror::Error;

use crate::scheduler::{render_with, PixelSample};
use crate::shader::trace;
use crate::{PixelBuffer, SceneDescriptor};

/// Errors that can occur while rendering or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render needs at least one worker thread")]
    NoWorkers,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render `scene` on `thread_count` workers.
pub fn render(scene: &SceneDescriptor, thread_count: usize) -> RenderResult<PixelBuffer> {
    let settings = scene.settings;
    log::info!(
        "Rendering {} objects at {}x{}, {} samples per pixel",
        scene.objects.len(),
        scene.screen.width,
        scene.screen.height,
        settings.samples_per_pixel.max(1)
    );

    render_with(&scene.screen, thread_count, settings.seed, |sample, rng| {
        color_to_rgb(render_pixel(scene, sample, rng), settings.gamma)
    })
}

/// Average colour of one pixel.
///
/// A single sample traces the pixel centre; more samples jitter the ray
/// uniformly within the pixel.
pub fn render_pixel(scene: &SceneDescriptor, sample: &PixelSample, rng: &mut dyn RngCore) -> Color {
    let samples = scene.settings.samples_per_pixel.max(1);
    if samples == 1 {
        return trace(scene, scene.origin, sample.ray, 0, rng);
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..samples {
        let x = sample.x as f64 + rng.gen_range(-0.5f64..0.5);
        let y = sample.y as f64 + rng.gen_range(-0.5f64..0.5);
        let ray = scene.screen.ray_through(x, y);
        pixel_color += trace(scene, scene.origin, ray, 0, rng);
    }

    pixel_color / samples as f64
}

/// `pow(max(v, 0), 1 / gamma)`.
#[inline]
pub fn gamma_correct(linear: f64, gamma: f64) -> f64 {
    if linear > 0.0 {
        linear.powf(1.0 / gamma)
    } else {
        0.0
    }
}

/// Convert a colour to 8-bit RGB, rounding and clamping each channel.
pub fn color_to_rgb(color: Color, gamma: Option<f64>) -> [u8; 3] {
    color.to_array().map(|channel| {
        let value = match gamma {
            Some(gamma) => gamma_correct(channel, gamma),
            None => channel.max(0.0),
        };
        (255.0 * value).round().clamp(0.0, 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::sky_gradient;
    use crate::{RenderSettings, ScreenGeometry};
    use nurbray_math::DVec3;

    #[test]
    fn test_gamma_correct() {
        assert_eq!(gamma_correct(-1.0, 1.5), 0.0);
        assert!((gamma_correct(1.0, 1.5) - 1.0).abs() < 1e-12);
        assert!((gamma_correct(0.25, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(DVec3::new(1.0, 0.0, 2.0), None), [255, 0, 255]);
        assert_eq!(color_to_rgb(DVec3::new(0.5, -0.1, 0.25), Some(2.0)), [180, 0, 128]);
    }

    #[test]
    fn test_empty_scene_is_sky() {
        let screen = ScreenGeometry::new(8, 6, 30.0);
        let settings = RenderSettings::default().with_samples(1);
        let scene = SceneDescriptor::new(screen).with_settings(settings);

        let buffer = render(&scene, 2).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                let ray = screen.ray_through(x as f64, y as f64).normalize();
                assert_eq!(buffer.get(x, y), color_to_rgb(sky_gradient(ray), settings.gamma));
            }
        }
    }
}
