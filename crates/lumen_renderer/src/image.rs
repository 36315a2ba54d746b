//! Floating-point RGBA image buffers used as render targets.

use lumen_math::Vec4;
use rayon::prelude::*;
use thiserror::Error;

/// A render target could not be allocated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to allocate {width}x{height} RGBA32F image")]
pub struct AllocationError {
    pub width: u32,
    pub height: u32,
}

/// Row-major RGBA32F image. Every pixel is writable by index.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

impl ImageBuffer {
    /// Allocate a zeroed image, reporting failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> Result<Self, AllocationError> {
        let err = AllocationError { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| err.clone())?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| err)?;
        pixels.resize(len, Vec4::ZERO);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Vec4) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Overwrite every pixel with `other`'s. Sizes must match.
    pub fn copy_from(&mut self, other: &ImageBuffer) {
        debug_assert_eq!(self.size(), other.size());
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Blend `sample` in with weight `weight`: `self = sample * w + self * (1 - w)`.
    ///
    /// With `weight = 1 / (n + 1)` over successive samples this keeps `self`
    /// equal to the running mean of all samples.
    pub fn blend_from(&mut self, sample: &ImageBuffer, weight: f32) {
        debug_assert_eq!(self.size(), sample.size());
        self.pixels
            .par_iter_mut()
            .zip(sample.pixels.par_iter())
            .for_each(|(dst, src)| {
                *dst = *src * weight + *dst * (1.0 - weight);
            });
    }

    /// Convert to gamma-corrected RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA, clamping to [0, 1].
pub fn color_to_rgba(color: Vec4) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    let a = (255.0 * color.w.clamp(0.0, 1.0)) as u8;
    [r, g, b, a]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let image = ImageBuffer::try_new(4, 3).unwrap();
        assert_eq!(image.pixels.len(), 12);
        assert!(image.pixels.iter().all(|p| *p == Vec4::ZERO));
    }

    #[test]
    fn test_get_set() {
        let mut image = ImageBuffer::try_new(4, 3).unwrap();
        image.set(3, 2, Vec4::ONE);
        assert_eq!(image.get(3, 2), Vec4::ONE);
        assert_eq!(image.pixels[11], Vec4::ONE);
    }

    #[test]
    fn test_huge_allocation_fails() {
        let err = ImageBuffer::try_new(u32::MAX, u32::MAX).unwrap_err();
        assert_eq!(err.width, u32::MAX);
    }

    #[test]
    fn test_blend_weights() {
        let mut acc = ImageBuffer::try_new(1, 1).unwrap();
        acc.pixels[0] = Vec4::splat(2.0);
        let mut sample = ImageBuffer::try_new(1, 1).unwrap();
        sample.pixels[0] = Vec4::splat(4.0);

        acc.blend_from(&sample, 0.5);
        assert_eq!(acc.pixels[0], Vec4::splat(3.0));
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Vec4::new(1.0, 0.0, 4.0, 1.0)), [255, 0, 255, 255]);
        assert_eq!(color_to_rgba(Vec4::new(-1.0, 0.25, 0.0, 0.0)), [0, 127, 0, 0]);
    }
}
