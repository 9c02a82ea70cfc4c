//! Rendered images and their serialization.

use std::fmt::Write as _;
use std::path::Path;

use crate::RenderResult;

/// Row-major, top-to-bottom RGB bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 3);
        Self {
            width,
            height,
            data,
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    /// Plain-text PPM (`P3`).
    pub fn to_ppm_string(&self) -> String {
        let mut out = format!("P3\n{} {}\n255\n", self.width, self.height);
        for value in &self.data {
            let _ = write!(out, "{value} ");
        }
        out
    }

    pub fn write_ppm(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path, self.to_ppm_string())?;
        Ok(())
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_format() {
        let buffer = PixelBuffer::new(2, 1, vec![255, 0, 0, 0, 128, 7]);
        assert_eq!(buffer.to_ppm_string(), "P3\n2 1\n255\n255 0 0 0 128 7 ");
    }

    #[test]
    fn test_get() {
        let buffer = PixelBuffer::new(2, 2, (0..12).collect());
        assert_eq!(buffer.get(1, 1), [9, 10, 11]);
    }

    #[test]
    fn test_write_files() {
        let dir = std::env::temp_dir();
        let buffer = PixelBuffer::new(1, 1, vec![1, 2, 3]);

        let ppm = dir.join("nurbray_pixel_buffer_test.ppm");
        buffer.write_ppm(&ppm).unwrap();
        assert_eq!(std::fs::read_to_string(&ppm).unwrap(), "P3\n1 1\n255\n1 2 3 ");

        let png = dir.join("nurbray_pixel_buffer_test.png");
        buffer.save_png(&png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [1, 2, 3]);

        let _ = std::fs::remove_file(ppm);
        let _ = std::fs::remove_file(png);
    }
}
