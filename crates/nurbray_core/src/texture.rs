//! Surface colouring: `(u, v) -> colour` functions for scene objects.
//!
//! Colours are linear RGB in `[0, 1]³`. Objects hold a shared
//! [`ColorFunction`], so procedural patterns and image textures look the same
//! to the shader.

use std::path::Path;
use std::sync::Arc;

use nurbray_math::DVec3;
use thiserror::Error;

pub type Color = DVec3;

/// Shared callable giving the colour at a surface parameter.
pub type ColorFunction = Arc<dyn Fn(f64, f64) -> Color + Send + Sync>;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture {0} has no pixels")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// The same colour everywhere.
pub fn solid(color: Color) -> ColorFunction {
    Arc::new(move |_, _| color)
}

/// Alternating squares: `cells` per unit of parameter space.
pub fn checker(a: Color, b: Color, cells: f64) -> ColorFunction {
    Arc::new(move |u, v| {
        let parity = (u * cells).round() as i64 + (v * cells).round() as i64;
        if parity.rem_euclid(2) == 0 {
            a
        } else {
            b
        }
    })
}

/// An image sampled with bilinear filtering.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    pub width: u32,
    pub height: u32,

    /// Linear RGB, row-major from the top of the image.
    pub pixels: Vec<Color>,
}

impl ImageTexture {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Load an image file, converting sRGB bytes to linear colour.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| DVec3::new(srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])))
            .collect();

        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self::new(width, height, pixels))
    }

    /// Sample at `(u, v)`, wrapping outside `[0, 1]`, with `v = 0` at the bottom.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);

        let x = u * (self.width as f64 - 1.0);
        let y = (1.0 - v) * (self.height as f64 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x.fract();
        let fy = y.fract();

        let top = self.pixel(x0, y0).lerp(self.pixel(x1, y0), fx);
        let bottom = self.pixel(x0, y1).lerp(self.pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    pub fn into_color_function(self) -> ColorFunction {
        Arc::new(move |u, v| self.sample(u, v))
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let index = (y * self.width + x) as usize;
        self.pixels.get(index).copied().unwrap_or(DVec3::ZERO)
    }
}

/// Convert an sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color() {
        let color = solid(DVec3::new(1.0, 0.5, 0.0));
        assert_eq!(color(0.3, 0.9), DVec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let white = DVec3::ONE;
        let black = DVec3::ZERO;
        let pattern = checker(white, black, 4.0);

        assert_eq!(pattern(0.0, 0.0), white);
        assert_eq!(pattern(0.25, 0.0), black);
        assert_eq!(pattern(0.25, 0.25), white);
    }

    #[test]
    fn test_image_bilinear_sample() {
        // 2x1 image: black on the left, white on the right
        let texture = ImageTexture::new(2, 1, vec![DVec3::ZERO, DVec3::ONE]);

        assert_eq!(texture.sample(0.0, 0.5), DVec3::ZERO);
        assert!((texture.sample(0.5, 0.5) - DVec3::splat(0.5)).length() < 1e-12);
        let color = texture.into_color_function();
        assert!((color(0.25, 0.0).x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file() {
        assert!(ImageTexture::load("/nonexistent/texture.png").is_err());
    }

    #[test]
    fn test_srgb_to_linear() {
        // Black stays black
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);

        // White stays white
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
