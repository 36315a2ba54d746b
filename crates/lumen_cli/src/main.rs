// Headless driver: builds a scene, accumulates frames, writes the result.
// Run with: cargo run --release -- [config.json] [--frames N] [--out image.png]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lumen_core::{LumenConfig, SceneBuilder, ScenePreset};
use lumen_math::{CameraState, Vec3, Vec4};
use lumen_renderer::{AccumulationController, FrameParams, TileKernel};

/// Command line options.
#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    frames: u32,
    out: Option<PathBuf>,
}

impl Args {
    fn parse(args: &[String]) -> Result<Self> {
        let mut parsed = Args {
            config: None,
            frames: 16,
            out: None,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = iter.next().context("--frames needs a value")?;
                    parsed.frames = value
                        .parse()
                        .with_context(|| format!("Invalid frame count: {}", value))?;
                }
                "--out" => {
                    let value = iter.next().context("--out needs a path")?;
                    parsed.out = Some(PathBuf::from(value));
                }
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                path => {
                    if parsed.config.is_some() {
                        bail!("Only one config file may be given");
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }
}

/// Default viewpoint for each preset.
fn preset_camera(preset: ScenePreset, aspect: f32) -> CameraState {
    match preset {
        ScenePreset::CornellBox => CameraState::look_at(
            Vec3::new(0.0, 3.0, -2.9),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::Y,
            70.0,
            aspect,
        ),
        ScenePreset::SphereField => CameraState::look_at(
            Vec3::new(0.0, 40.0, -150.0),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            aspect,
        ),
    }
}

/// Stand-in for the trace kernel: colours each pixel by its primary ray
/// direction.
fn ray_direction_color(x: u32, y: u32, params: &FrameParams) -> Vec4 {
    let offset = params.pixel_offset.as_vec2();
    let u = (x as f32 + offset.x) / params.width as f32 * 2.0 - 1.0;
    let v = 1.0 - (y as f32 + offset.y) / params.height as f32 * 2.0;

    let view = params.inverse_projection.project_point3(Vec3::new(u, v, 0.0));
    let direction = params
        .camera_to_world
        .transform_vector3(view)
        .normalize_or_zero();

    ((direction + Vec3::ONE) * 0.5).extend(1.0)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = Args::parse(&argv)?;

    let config = match &args.config {
        Some(path) => LumenConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LumenConfig::default(),
    };

    let start = Instant::now();
    let scene = SceneBuilder::new(&config.scene)
        .build()
        .context("Failed to build scene")?;
    log::info!("Scene built in {:?}", start.elapsed());

    let buffers = Arc::new(scene.to_buffers());
    let skybox = scene.skybox.map(Arc::new);

    let (width, height) = config.render.resolution;
    let camera = preset_camera(config.scene.preset, width as f32 / height as f32);

    let mut kernel = TileKernel::new(ray_direction_color);
    let mut controller = AccumulationController::new(config.render);
    controller.initialize(config.render.resolution)?;
    controller.load_scene(&mut kernel, buffers, skybox)?;

    let start = Instant::now();
    for _ in 0..args.frames {
        controller.render_frame(&mut kernel, &camera)?;
    }
    log::info!(
        "Rendered {} frames at {}x{} in {:?} ({} accumulated samples)",
        args.frames,
        width,
        height,
        start.elapsed(),
        controller.sample_count()
    );

    if let Some(out) = &args.out {
        let converged = controller
            .converged()
            .context("No frame was rendered")?;
        let image = image::RgbaImage::from_raw(converged.width, converged.height, converged.to_rgba8())
            .context("Image buffer size mismatch")?;
        image
            .save(out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        log::info!("Saved {}", out.display());
    }

    controller.shutdown(&mut kernel);
    Ok(())
}
