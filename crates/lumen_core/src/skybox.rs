//! Skybox images for the trace kernel's environment lookup.
//!
//! Pixels are stored as linear RGBA floats, the format the kernel samples.
//! HDR sources are kept as-is; 8-bit sources are decoded from sRGB.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use lumen_math::Vec3;
use thiserror::Error;

/// Errors that can occur during skybox loading.
#[derive(Error, Debug)]
pub enum SkyboxError {
    #[error("Failed to load skybox {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Skybox {0} has zero size")]
    Empty(String),
}

pub type SkyboxResult<T> = Result<T, SkyboxError>;

/// An equirectangular environment image.
#[derive(Clone, Debug, PartialEq)]
pub struct Skybox {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear), row-major order
    pub pixels: Vec<[f32; 4]>,
}

impl Skybox {
    /// Create a 1x1 skybox of a single colour.
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
        }
    }

    /// Load a skybox image from disk.
    pub fn load(path: impl AsRef<Path>) -> SkyboxResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| SkyboxError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let skybox = Self::from_image(img);
        if skybox.pixels.is_empty() {
            return Err(SkyboxError::Empty(path.display().to_string()));
        }

        log::info!(
            "Loaded skybox: {} ({}x{}, {:.1} KB)",
            path.display(),
            skybox.width,
            skybox.height,
            skybox.size_bytes() as f32 / 1024.0
        );
        Ok(skybox)
    }

    /// Convert a decoded image to linear float RGBA.
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();

        let pixels = match &img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => img
                .to_rgba32f()
                .pixels()
                .map(|p| p.0)
                .collect(),
            _ => img
                .to_rgba8()
                .pixels()
                .map(|p| {
                    [
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                        p[3] as f32 / 255.0, // Alpha is linear
                    ]
                })
                .collect(),
        };

        Self {
            width,
            height,
            pixels,
        }
    }

    /// Raw pixel bytes for upload.
    pub fn pixel_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
