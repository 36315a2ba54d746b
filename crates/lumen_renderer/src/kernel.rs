//! The seam between the accumulation controller and the trace kernel.
//!
//! The kernel itself (ray generation, intersection, shading) lives outside
//! this crate. The controller only needs to bind scene buffers, hand over
//! per-frame parameters and receive one radiance sample per pixel.

use std::sync::Arc;

use lumen_core::{SceneBuffers, Skybox};
use lumen_math::{CameraState, Mat4, Vec2};
use thiserror::Error;

use crate::image::ImageBuffer;

/// Errors reported by a trace kernel.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("No scene bound to the kernel")]
    NoScene,

    #[error("Target is {got:?}, expected {expected:?}")]
    TargetSize {
        expected: (u32, u32),
        got: (u32, u32),
    },

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Scene data shared with the kernel until the next rebuild.
#[derive(Clone, Debug)]
pub struct SceneBinding {
    pub buffers: Arc<SceneBuffers>,
    pub skybox: Option<Arc<Skybox>>,
}

/// Sub-pixel position the kernel should sample at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelOffset {
    /// Halton jitter in [0, 1)²
    Jittered(Vec2),
    /// Pixel centre
    Center,
}

impl PixelOffset {
    pub fn as_vec2(self) -> Vec2 {
        match self {
            PixelOffset::Jittered(offset) => offset,
            PixelOffset::Center => Vec2::splat(0.5),
        }
    }
}

/// Everything the kernel reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
    pub pixel_offset: PixelOffset,
    /// Random seed in [0, 1)
    pub seed: f32,
    /// Index of this sample since the last reset
    pub sample: u32,
    pub width: u32,
    pub height: u32,
    pub sphere_count: u32,
    pub quad_count: u32,
    pub triangle_count: u32,
}

impl FrameParams {
    pub fn new(
        camera: &CameraState,
        pixel_offset: PixelOffset,
        seed: f32,
        sample: u32,
        resolution: (u32, u32),
        buffers: &SceneBuffers,
    ) -> Self {
        Self {
            camera_to_world: camera.camera_to_world,
            inverse_projection: camera.inverse_projection,
            pixel_offset,
            seed,
            sample,
            width: resolution.0,
            height: resolution.1,
            sphere_count: buffers.sphere_count() as u32,
            quad_count: buffers.quad_count() as u32,
            triangle_count: buffers.triangle_count() as u32,
        }
    }
}

/// A compute kernel that writes one radiance sample per pixel.
pub trait TraceKernel {
    /// Make scene buffers available to subsequent dispatches.
    fn bind_scene(&mut self, scene: &SceneBinding) -> KernelResult<()>;

    /// Write one sample for every pixel of `target`.
    fn dispatch(&mut self, params: &FrameParams, target: &mut ImageBuffer) -> KernelResult<()>;

    /// Release any bound scene buffers.
    fn unbind(&mut self) {}
}
