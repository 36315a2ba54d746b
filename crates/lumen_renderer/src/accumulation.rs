//! Progressive accumulation across frames.
//!
//! Each frame the kernel writes one sample per pixel into the raw target.
//! With anti-aliasing on, the sample is jittered by the Halton sequence and
//! folded into the converged target as a running mean. With it off, the
//! kernel samples pixel centres and its output replaces the converged image.
//!
//! The sample count `n` drops back to 0 whenever the image would otherwise
//! mix stale and fresh samples: new scene, camera moved, or targets
//! reallocated.

use std::sync::Arc;

use lumen_core::{RenderSettings, SceneBuffers, Skybox};
use lumen_math::{jitter_offset, CameraState, Mat4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::image::{AllocationError, ImageBuffer};
use crate::kernel::{FrameParams, KernelError, PixelOffset, SceneBinding, TraceKernel};
use crate::targets::RenderTargets;

/// Errors that can occur while producing a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("No scene loaded")]
    NoScene,
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Owns the render targets and sample count, and drives the kernel once
/// per frame.
pub struct AccumulationController {
    settings: RenderSettings,
    targets: Option<RenderTargets>,
    scene: Option<SceneBinding>,
    sample_count: u32,
    last_camera: Option<Mat4>,
    rng: StdRng,
}

impl AccumulationController {
    pub fn new(settings: RenderSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Controller with a reproducible per-frame seed stream.
    pub fn with_seed(settings: RenderSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: RenderSettings, rng: StdRng) -> Self {
        Self {
            settings,
            targets: None,
            scene: None,
            sample_count: 0,
            last_camera: None,
            rng,
        }
    }

    /// Allocate render targets at `resolution`.
    pub fn initialize(&mut self, resolution: (u32, u32)) -> RenderResult<()> {
        self.settings.resolution = resolution;
        self.sample_count = 0;
        RenderTargets::ensure(&mut self.targets, resolution)?;
        Ok(())
    }

    /// Replace the scene bound to `kernel`. Accumulation restarts.
    pub fn load_scene<K: TraceKernel>(
        &mut self,
        kernel: &mut K,
        buffers: Arc<SceneBuffers>,
        skybox: Option<Arc<Skybox>>,
    ) -> RenderResult<()> {
        if self.scene.take().is_some() {
            kernel.unbind();
        }

        let binding = SceneBinding { buffers, skybox };
        kernel.bind_scene(&binding)?;

        log::info!(
            "Bound scene: {} spheres, {} quads, {} triangles",
            binding.buffers.sphere_count(),
            binding.buffers.quad_count(),
            binding.buffers.triangle_count()
        );
        self.scene = Some(binding);
        self.sample_count = 0;
        Ok(())
    }

    /// Restart accumulation after the camera moved.
    pub fn on_camera_changed(&mut self) {
        self.sample_count = 0;
    }

    /// Request a new output size; applied at the start of the next frame.
    pub fn set_resolution(&mut self, resolution: (u32, u32)) {
        if resolution.0 == 0 || resolution.1 == 0 {
            log::warn!("Ignoring zero resolution {:?}", resolution);
            return;
        }
        self.settings.resolution = resolution;
    }

    /// Switch between jittered accumulation and pixel-centre sampling.
    pub fn set_anti_aliasing(&mut self, enabled: bool) {
        if self.settings.anti_aliasing != enabled {
            self.settings.anti_aliasing = enabled;
            self.sample_count = 0;
        }
    }

    /// Samples folded into the converged image since the last reset.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Latest composited image, if targets exist.
    pub fn converged(&self) -> Option<&ImageBuffer> {
        self.targets.as_ref().map(|t| &t.converged)
    }

    /// Trace one frame and composite it.
    pub fn render_frame<K: TraceKernel>(
        &mut self,
        kernel: &mut K,
        camera: &CameraState,
    ) -> RenderResult<&ImageBuffer> {
        if self
            .last_camera
            .is_some_and(|last| last != camera.camera_to_world)
        {
            self.on_camera_changed();
        }
        self.last_camera = Some(camera.camera_to_world);

        let scene = self.scene.as_ref().ok_or(RenderError::NoScene)?;
        let (targets, reallocated) = RenderTargets::ensure(&mut self.targets, self.settings.resolution)?;
        if reallocated {
            self.sample_count = 0;
        }

        let pixel_offset = if self.settings.anti_aliasing {
            PixelOffset::Jittered(jitter_offset(self.sample_count))
        } else {
            PixelOffset::Center
        };
        let params = FrameParams::new(
            camera,
            pixel_offset,
            self.rng.gen::<f32>(),
            self.sample_count,
            targets.size(),
            &scene.buffers,
        );

        kernel.dispatch(&params, &mut targets.raw)?;

        if self.settings.anti_aliasing {
            if self.sample_count == 0 {
                targets.converged.copy_from(&targets.raw);
            } else {
                let weight = 1.0 / (self.sample_count as f32 + 1.0);
                targets.converged.blend_from(&targets.raw, weight);
            }
            self.sample_count += 1;
        } else {
            targets.converged.copy_from(&targets.raw);
        }

        log::debug!(
            "Frame {:?} offset {:?}, n = {}",
            targets.size(),
            params.pixel_offset,
            self.sample_count
        );
        Ok(&targets.converged)
    }

    /// Release targets and unbind the scene.
    pub fn shutdown<K: TraceKernel>(&mut self, kernel: &mut K) {
        if self.scene.take().is_some() {
            kernel.unbind();
        }
        self.targets = None;
        self.sample_count = 0;
        self.last_camera = None;
        log::info!("Accumulation controller shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{build_cornell_box, Sphere, Material};
    use lumen_math::{Vec2, Vec3, Vec4};

    /// Returns a scripted constant per frame and records every dispatch.
    struct ScriptedKernel {
        values: Vec<f32>,
        frame: usize,
        params: Vec<FrameParams>,
        bound: bool,
        fail: bool,
    }

    impl ScriptedKernel {
        fn new(values: Vec<f32>) -> Self {
            Self {
                values,
                frame: 0,
                params: Vec::new(),
                bound: false,
                fail: false,
            }
        }
    }

    impl TraceKernel for ScriptedKernel {
        fn bind_scene(&mut self, _scene: &SceneBinding) -> Result<(), KernelError> {
            self.bound = true;
            Ok(())
        }

        fn dispatch(&mut self, params: &FrameParams, target: &mut ImageBuffer) -> Result<(), KernelError> {
            if self.fail {
                return Err(KernelError::Dispatch("device lost".into()));
            }
            let value = self.values[self.frame % self.values.len()];
            self.frame += 1;
            self.params.push(*params);
            target.pixels.fill(Vec4::splat(value));
            Ok(())
        }

        fn unbind(&mut self) {
            self.bound = false;
        }
    }

    fn settings(anti_aliasing: bool) -> RenderSettings {
        RenderSettings {
            anti_aliasing,
            resolution: (4, 4),
        }
    }

    fn buffers() -> Arc<SceneBuffers> {
        let spheres = [Sphere::new(Vec3::ZERO, 1.0, Material::default())];
        Arc::new(SceneBuffers::new(&spheres, &build_cornell_box(), &[]))
    }

    fn setup(anti_aliasing: bool, values: Vec<f32>) -> (AccumulationController, ScriptedKernel) {
        let mut controller = AccumulationController::with_seed(settings(anti_aliasing), 1);
        let mut kernel = ScriptedKernel::new(values);
        controller.initialize((4, 4)).unwrap();
        controller.load_scene(&mut kernel, buffers(), None).unwrap();
        (controller, kernel)
    }

    #[test]
    fn test_running_mean() {
        let values = vec![1.0, 5.0, 3.0, 7.0, 0.5];
        let (mut controller, mut kernel) = setup(true, values.clone());
        let camera = CameraState::default();

        for k in 1..=values.len() {
            let image = controller.render_frame(&mut kernel, &camera).unwrap();
            let mean = values[..k].iter().sum::<f32>() / k as f32;
            for p in &image.pixels {
                assert!((p.x - mean).abs() < 0.001, "frame {k}: {} vs {mean}", p.x);
            }
            assert_eq!(controller.sample_count(), k as u32);
        }
    }

    #[test]
    fn test_reset_discards_history() {
        let (mut controller, mut kernel) = setup(true, vec![10.0, 10.0, 2.0]);
        let camera = CameraState::default();

        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.on_camera_changed();
        assert_eq!(controller.sample_count(), 0);

        let image = controller.render_frame(&mut kernel, &camera).unwrap();
        assert!((image.pixels[0].x - 2.0).abs() < 0.001);
        assert_eq!(controller.sample_count(), 1);
    }

    #[test]
    fn test_camera_move_resets() {
        let (mut controller, mut kernel) = setup(true, vec![4.0, 4.0, 9.0]);
        let camera = CameraState::default();

        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.render_frame(&mut kernel, &camera).unwrap();
        assert_eq!(controller.sample_count(), 2);

        let moved = CameraState::look_at(Vec3::new(0.0, 3.0, -10.0), Vec3::new(0.0, 3.0, 0.0), Vec3::Y, 60.0, 1.0);
        let image = controller.render_frame(&mut kernel, &moved).unwrap();
        assert!((image.pixels[0].x - 9.0).abs() < 0.001);
        assert_eq!(controller.sample_count(), 1);
    }

    #[test]
    fn test_load_scene_resets() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        let camera = CameraState::default();

        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.load_scene(&mut kernel, buffers(), None).unwrap();

        assert_eq!(controller.sample_count(), 0);
        assert!(kernel.bound);
    }

    #[test]
    fn test_jitter_follows_halton() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        let camera = CameraState::default();

        for _ in 0..4 {
            controller.render_frame(&mut kernel, &camera).unwrap();
        }

        let expected = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 1.0 / 3.0),
            Vec2::new(0.25, 2.0 / 3.0),
            Vec2::new(0.75, 1.0 / 9.0),
        ];
        for (params, want) in kernel.params.iter().zip(expected) {
            let got = params.pixel_offset.as_vec2();
            assert!((got - want).length() < 0.001, "{got:?} vs {want:?}");
            assert!((0.0..1.0).contains(&params.seed));
        }
        assert_eq!(kernel.params[3].sample, 3);
        assert_eq!(kernel.params[0].sphere_count, 1);
        assert_eq!(kernel.params[0].quad_count, 24);
    }

    #[test]
    fn test_static_mode_replaces_image() {
        let (mut controller, mut kernel) = setup(false, vec![2.0, 6.0]);
        let camera = CameraState::default();

        controller.render_frame(&mut kernel, &camera).unwrap();
        let image = controller.render_frame(&mut kernel, &camera).unwrap();

        assert!((image.pixels[0].x - 6.0).abs() < 0.001);
        assert_eq!(controller.sample_count(), 0);
        assert!(kernel
            .params
            .iter()
            .all(|p| p.pixel_offset == PixelOffset::Center));
    }

    #[test]
    fn test_resolution_change_applies_next_frame() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        let camera = CameraState::default();

        controller.render_frame(&mut kernel, &camera).unwrap();
        controller.set_resolution((8, 2));
        assert_eq!(controller.converged().unwrap().size(), (4, 4));

        let image = controller.render_frame(&mut kernel, &camera).unwrap();
        assert_eq!(image.size(), (8, 2));
        assert_eq!(controller.sample_count(), 1);
        assert_eq!((kernel.params[1].width, kernel.params[1].height), (8, 2));
    }

    #[test]
    fn test_allocation_failure_produces_no_frame() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        let camera = CameraState::default();

        controller.set_resolution((u32::MAX, u32::MAX));
        let result = controller.render_frame(&mut kernel, &camera);

        assert!(matches!(result, Err(RenderError::Allocation(_))));
        assert!(kernel.params.is_empty());
    }

    #[test]
    fn test_kernel_error_propagates() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        kernel.fail = true;

        let result = controller.render_frame(&mut kernel, &CameraState::default());
        assert!(matches!(result, Err(RenderError::Kernel(KernelError::Dispatch(_)))));
        assert_eq!(controller.sample_count(), 0);
    }

    #[test]
    fn test_render_without_scene() {
        let mut controller = AccumulationController::with_seed(settings(true), 1);
        let mut kernel = ScriptedKernel::new(vec![1.0]);

        let result = controller.render_frame(&mut kernel, &CameraState::default());
        assert!(matches!(result, Err(RenderError::NoScene)));
    }

    #[test]
    fn test_shutdown() {
        let (mut controller, mut kernel) = setup(true, vec![1.0]);
        controller.render_frame(&mut kernel, &CameraState::default()).unwrap();

        controller.shutdown(&mut kernel);
        assert!(!kernel.bound);
        assert!(controller.converged().is_none());
        assert_eq!(controller.sample_count(), 0);
    }
}
