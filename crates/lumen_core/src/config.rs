//! Host-supplied configuration.
//!
//! The core treats all of this as read-only input at scene-build and frame
//! time. Every field has a default, so a config file only needs to name what
//! it overrides.

use std::path::{Path, PathBuf};

use lumen_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitives::Material;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid sphere radius range [{0}, {1}]")]
    RadiusRange(f32, f32),

    #[error("Resolution must be non-zero, got {0}x{1}")]
    Resolution(u32, u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which fixed scene to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// Enclosed room with two boxes and a ceiling light
    #[default]
    CornellBox,
    /// Random spheres resting on a large floor quad
    SphereField,
}

/// Random sphere placement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    /// Radius drawn uniformly from [min, max]
    pub radius_range: [f32; 2],
    /// Number of placement attempts
    pub max_count: u32,
    /// Radius of the disk sphere centres are drawn from
    pub placement_radius: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius_range: [3.0, 8.0],
            max_count: 100,
            placement_radius: 100.0,
        }
    }
}

/// Material as written in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            albedo: [0.8, 0.8, 0.8],
            specular: [0.04, 0.04, 0.04],
            smoothness: 0.5,
            emission: [0.0, 0.0, 0.0],
        }
    }
}

impl From<MaterialConfig> for Material {
    fn from(m: MaterialConfig) -> Self {
        Material {
            albedo: Vec3::from_array(m.albedo),
            specular: Vec3::from_array(m.specular),
            smoothness: m.smoothness,
            emission: Vec3::from_array(m.emission),
        }
    }
}

/// A triangle mesh to add to the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Path to a Wavefront OBJ file
    pub path: PathBuf,
    #[serde(default)]
    pub material: MaterialConfig,
}

/// Everything needed to (re)build the scene buffers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub preset: ScenePreset,
    pub spheres: SphereConfig,
    pub mesh: Option<MeshConfig>,
    pub skybox: Option<PathBuf>,
    /// Seed for sphere placement; entropy when absent
    pub seed: Option<u64>,
}

/// Per-frame renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Jittered progressive accumulation when on, pixel-centre sampling when off
    pub anti_aliasing: bool,
    /// Output resolution (width, height)
    pub resolution: (u32, u32),
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            anti_aliasing: true,
            resolution: (1280, 720),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LumenConfig {
    pub scene: SceneConfig,
    pub render: RenderSettings,
}

impl LumenConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let [min, max] = self.scene.spheres.radius_range;
        if !(min > 0.0 && min <= max) {
            return Err(ConfigError::RadiusRange(min, max));
        }

        let (w, h) = self.render.resolution;
        if w == 0 || h == 0 {
            return Err(ConfigError::Resolution(w, h));
        }
        Ok(())
    }
}
