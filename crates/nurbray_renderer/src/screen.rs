//! Screen geometry: pixel <-> ray mapping for a pinhole camera at the origin
//! looking down `+Z`, optionally pre-rotated.

use nurbray_math::{DMat3, DVec3, EulerRot};

/// Pixel grid plus field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,

    rotation: DMat3,
    inverse_rotation: DMat3,
    tan_fov_x: f64,
    tan_fov_y: f64,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32, fov_degrees: f64) -> Self {
        let tan_fov_y = (0.5 * fov_degrees).to_radians().tan();
        let aspect_ratio = width as f64 / height as f64;
        Self {
            width,
            height,
            fov_degrees,
            rotation: DMat3::IDENTITY,
            inverse_rotation: DMat3::IDENTITY,
            tan_fov_x: tan_fov_y * aspect_ratio,
            tan_fov_y,
        }
    }

    /// Rotate every generated ray by `rotation`.
    pub fn with_rotation(mut self, rotation: DMat3) -> Self {
        self.rotation = rotation;
        self.inverse_rotation = rotation.inverse();
        self
    }

    /// Pre-rotation from three angles in radians, applied about `Y`, `Z` and
    /// then `X`.
    pub fn with_euler(self, e1: f64, e2: f64, e3: f64) -> Self {
        self.with_rotation(DMat3::from_euler(EulerRot::YZX, e1, e2, e3))
    }

    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Unnormalized direction through pixel `(x, y)`; `(0, 0)` is the top-left
    /// pixel and integer coordinates hit pixel centres.
    pub fn ray_through(&self, x: f64, y: f64) -> DVec3 {
        let xx = (2.0 * ((x + 0.5) / self.width as f64) - 1.0) * self.tan_fov_x;
        let yy = (1.0 - 2.0 * ((y + 0.5) / self.height as f64)) * self.tan_fov_y;
        self.rotation * DVec3::new(xx, yy, 1.0)
    }

    /// Pixel whose centre ray is closest to `ray`, if the ray points in front
    /// of the camera. The result may lie outside the screen.
    pub fn pixel_of(&self, ray: DVec3) -> Option<(i64, i64)> {
        let local = self.inverse_rotation * ray;
        if local.z <= 0.0 {
            return None;
        }
        let (px, py) = (local.x / local.z, local.y / local.z);
        let x = (-0.5 + 0.5 * self.width as f64 * (px / self.tan_fov_x + 1.0)).round();
        let y = (-0.5 - 0.5 * self.height as f64 * (py / self.tan_fov_y - 1.0)).round();
        Some((x as i64, y as i64))
    }
}
