//! Lumen Renderer - progressive accumulation around an external trace kernel.
//!
//! The kernel is anything implementing [`TraceKernel`]. This crate owns the
//! render targets, decides the per-frame sub-pixel offset and seed, and
//! composites kernel output into a converged image.

mod accumulation;
mod image;
mod kernel;
mod targets;
mod tiles;

pub use accumulation::{AccumulationController, RenderError, RenderResult};
pub use image::{color_to_rgba, linear_to_gamma, AllocationError, ImageBuffer};
pub use kernel::{FrameParams, KernelError, KernelResult, PixelOffset, SceneBinding, TraceKernel};
pub use targets::RenderTargets;
pub use tiles::{dispatch_size, generate_tiles, Tile, TileKernel, TILE_SIZE};
