//! Lumen Core - scene geometry for the progressive quad tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Sphere`, `Quad` (with derived plane), `Triangle`, and
//!   the shared `Material` record
//! - **Geometry**: quad/cube builders and bulk quad transformation
//! - **Meshes**: OBJ loading and mesh-to-triangle decomposition
//! - **Scenes**: random sphere placement, the Cornell box preset, and the
//!   fixed-layout buffers uploaded to the trace kernel
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{SceneBuilder, SceneConfig};
//!
//! let scene = SceneBuilder::new(&SceneConfig::default()).build()?;
//! let buffers = scene.to_buffers();
//! println!("{} quads", buffers.quad_count());
//! ```

pub mod config;
pub mod geometry;
pub mod gpu;
pub mod mesh;
pub mod primitives;
pub mod scene;
pub mod skybox;

// Re-export commonly used types
pub use config::{
    ConfigError, LumenConfig, MaterialConfig, MeshConfig, RenderSettings, SceneConfig,
    ScenePreset, SphereConfig,
};
pub use geometry::{make_cube, make_quad, transform_quads, CubeFace};
pub use gpu::{GpuQuad, GpuSphere, GpuTriangle, SceneBuffers};
pub use mesh::{mesh_to_triangles, Mesh, MeshError};
pub use primitives::{Material, Quad, Sphere, Triangle};
pub use scene::{
    build_cornell_box, build_sphere_field, create_random_spheres, Scene, SceneBuilder,
    SceneError, SpherePlacement,
};
pub use skybox::{Skybox, SkyboxError};
