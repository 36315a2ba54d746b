//! Tiled CPU dispatch.
//!
//! Splits the target into 8x8 tiles, matching the compute thread-group
//! shape, and evaluates a per-pixel function over them in parallel.

use lumen_math::Vec4;
use rayon::prelude::*;

use crate::image::ImageBuffer;
use crate::kernel::{FrameParams, KernelError, KernelResult, SceneBinding, TraceKernel};

/// Thread-group edge length in pixels.
pub const TILE_SIZE: u32 = 8;

/// Number of thread groups needed to cover a target: `(ceil(w/8), ceil(h/8))`.
pub fn dispatch_size(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(TILE_SIZE), height.div_ceil(TILE_SIZE))
}

/// A rectangular region of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Cover the image in row-major order. Edge tiles are clipped.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            tiles.push(Tile {
                x,
                y,
                width: tile_size.min(width - x),
                height: tile_size.min(height - y),
            });
            x += tile_size;
        }
        y += tile_size;
    }

    tiles
}

/// CPU kernel that evaluates `shade(x, y, params)` for every pixel.
///
/// Useful as a deterministic stand-in for the real trace kernel.
pub struct TileKernel<F> {
    shade: F,
    scene: Option<SceneBinding>,
}

impl<F> TileKernel<F>
where
    F: Fn(u32, u32, &FrameParams) -> Vec4 + Sync,
{
    pub fn new(shade: F) -> Self {
        Self { shade, scene: None }
    }

    pub fn scene(&self) -> Option<&SceneBinding> {
        self.scene.as_ref()
    }
}

impl<F> TraceKernel for TileKernel<F>
where
    F: Fn(u32, u32, &FrameParams) -> Vec4 + Sync,
{
    fn bind_scene(&mut self, scene: &SceneBinding) -> KernelResult<()> {
        self.scene = Some(scene.clone());
        Ok(())
    }

    fn dispatch(&mut self, params: &FrameParams, target: &mut ImageBuffer) -> KernelResult<()> {
        if self.scene.is_none() {
            return Err(KernelError::NoScene);
        }
        let expected = (params.width, params.height);
        if target.size() != expected {
            return Err(KernelError::TargetSize {
                expected,
                got: target.size(),
            });
        }

        let tiles = generate_tiles(params.width, params.height, TILE_SIZE);
        let results: Vec<(Tile, Vec<Vec4>)> = tiles
            .into_par_iter()
            .map(|tile| {
                let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);
                for ty in 0..tile.height {
                    for tx in 0..tile.width {
                        pixels.push((self.shade)(tile.x + tx, tile.y + ty, params));
                    }
                }
                (tile, pixels)
            })
            .collect();

        for (tile, pixels) in results {
            for (i, color) in pixels.into_iter().enumerate() {
                let i = i as u32;
                target.set(tile.x + i % tile.width, tile.y + i / tile.width, color);
            }
        }
        Ok(())
    }

    fn unbind(&mut self) {
        self.scene = None;
    }
}
