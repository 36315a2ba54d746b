//! Scene assembly: random sphere placement, the Cornell box preset and the
//! builder that turns a `SceneConfig` into uploadable buffers.

use lumen_math::{Transform, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::config::{SceneConfig, ScenePreset, SphereConfig};
use crate::geometry::{make_cube, make_quad, transform_quads};
use crate::gpu::SceneBuffers;
use crate::mesh::{Mesh, MeshError};
use crate::primitives::{Material, Quad, Sphere, Triangle};
use crate::skybox::{Skybox, SkyboxError};

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Skybox error: {0}")]
    Skybox(#[from] SkyboxError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Outcome of [`create_random_spheres`].
#[derive(Debug, Clone, Default)]
pub struct SpherePlacement {
    /// Accepted spheres, in placement order
    pub spheres: Vec<Sphere>,
    /// Candidates discarded because they overlapped an accepted sphere
    pub rejected: u32,
}

/// Place up to `config.max_count` non-overlapping spheres on the y = 0 plane.
///
/// Each attempt draws one candidate. A candidate that overlaps an already
/// accepted sphere is dropped and not retried, so fewer than `max_count`
/// spheres may come back; the shortfall is reported in `rejected`.
pub fn create_random_spheres(config: &SphereConfig, rng: &mut impl Rng) -> SpherePlacement {
    let [min_radius, max_radius] = config.radius_range;
    let mut placement = SpherePlacement::default();

    for _ in 0..config.max_count {
        let radius = min_radius + rng.gen::<f32>() * (max_radius - min_radius);
        let (x, z) = random_in_unit_disk(rng);
        let position = Vec3::new(
            x * config.placement_radius,
            radius,
            z * config.placement_radius,
        );
        let candidate = Sphere::new(position, radius, Material::default());

        if placement.spheres.iter().any(|s| s.overlaps(&candidate)) {
            placement.rejected += 1;
            continue;
        }

        let material = random_sphere_material(rng);
        placement.spheres.push(Sphere { material, ..candidate });
    }

    log::debug!(
        "Placed {} of {} spheres ({} rejected)",
        placement.spheres.len(),
        config.max_count,
        placement.rejected
    );
    placement
}

/// Half metal, half dielectric; one in ten becomes a light.
fn random_sphere_material(rng: &mut impl Rng) -> Material {
    let color = hsv_to_rgb(rng.gen(), rng.gen(), rng.gen());
    let metal = rng.gen::<f32>() < 0.5;

    let mut material = if metal {
        Material {
            albedo: Vec3::ZERO,
            specular: color,
            smoothness: 1.0,
            emission: Vec3::ZERO,
        }
    } else {
        Material {
            albedo: color,
            specular: Vec3::splat(0.04),
            smoothness: rng.gen(),
            emission: Vec3::ZERO,
        }
    };

    if rng.gen::<f32>() < 0.1 {
        material.emission = Vec3::splat(5.0);
    }
    material
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut impl Rng) -> (f32, f32) {
    loop {
        let x = rng.gen::<f32>() * 2.0 - 1.0;
        let z = rng.gen::<f32>() * 2.0 - 1.0;
        if x * x + z * z < 1.0 {
            return (x, z);
        }
    }
}

/// Convert hue/saturation/value (all 0-1) to linear RGB.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h6 = (h.fract() * 6.0).min(5.999_999);
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// Build the Cornell box as 24 quads.
///
/// Order: floor, light cube (6), ceiling, right wall, left wall, front wall,
/// back wall, right cube (6), left cube (6). The room spans +/-3 on X and Z
/// and 0..6 on Y; every wall faces inward.
pub fn build_cornell_box() -> Vec<Quad> {
    let white = Material::diffuse(Vec3::new(0.7295, 0.7355, 0.729));
    let red = Material::diffuse(Vec3::new(0.611, 0.0555, 0.062));
    let green = Material::diffuse(Vec3::new(0.117, 0.4125, 0.115));

    let wall = make_quad(3.0).with_material(white);
    let red_wall = make_quad(3.0).with_material(red);
    let green_wall = make_quad(3.0).with_material(green);

    let cube_with = |material: Material| -> Vec<Quad> {
        make_cube(2.0)
            .into_iter()
            .map(|q| q.with_material(material))
            .collect()
    };

    let placed = |transform: Transform, quads: &[Quad]| transform_quads(&transform.to_matrix(), quads);

    let mut quads = Vec::with_capacity(24);

    // Floor
    quads.push(wall);

    // Light: a flattened cube just under the ceiling
    quads.extend(placed(
        Transform::from_translation(Vec3::new(0.0, 6.0, 0.0)).with_scale(Vec3::new(1.0, 0.05, 1.0)),
        &cube_with(Material::emissive(20.0)),
    ));

    // Ceiling
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(0.0, 6.0, 0.0), 180.0, Vec3::Z),
        &[wall],
    ));

    // Right
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(3.0, 3.0, 0.0), 90.0, Vec3::Z),
        &[green_wall],
    ));

    // Left
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(-3.0, 3.0, 0.0), -90.0, Vec3::Z),
        &[red_wall],
    ));

    // Front
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(0.0, 3.0, 3.0), -90.0, Vec3::X),
        &[wall],
    ));

    // Back
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(0.0, 3.0, -3.0), 90.0, Vec3::X),
        &[wall],
    ));

    // Right cube
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(1.0, 1.0, -1.0), 20.0, Vec3::Y),
        &cube_with(Material::diffuse(Vec3::splat(0.6))),
    ));

    // Left cube, stretched to twice the height
    quads.extend(placed(
        Transform::from_translation_angle_axis(Vec3::new(-1.0, 2.0, 1.0), -20.0, Vec3::Y)
            .with_scale(Vec3::new(1.0, 2.0, 1.0)),
        &cube_with(Material::diffuse(Vec3::splat(0.5))),
    ));

    quads
}

/// Random spheres resting on a 30x30 floor.
pub fn build_sphere_field(config: &SphereConfig, rng: &mut impl Rng) -> (Vec<Sphere>, Vec<Quad>) {
    let floor = make_quad(15.0).with_material(Material {
        albedo: Vec3::splat(0.8),
        specular: Vec3::splat(0.03),
        smoothness: 0.2,
        emission: Vec3::ZERO,
    });

    let placement = create_random_spheres(config, rng);
    (placement.spheres, vec![floor])
}

/// The logical scene before packing into export records.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub quads: Vec<Quad>,
    pub triangles: Vec<Triangle>,
    pub skybox: Option<Skybox>,
}

impl Scene {
    /// Pack into the flat per-kind arrays the kernel consumes.
    pub fn to_buffers(&self) -> SceneBuffers {
        SceneBuffers::new(&self.spheres, &self.quads, &self.triangles)
    }
}

/// Builds a [`Scene`] from configuration.
pub struct SceneBuilder<'a> {
    config: &'a SceneConfig,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(config: &'a SceneConfig) -> Self {
        Self { config }
    }

    /// Assemble the preset, then any configured mesh and skybox.
    ///
    /// Mesh or skybox failures abort the build; nothing partial is returned.
    pub fn build(&self) -> SceneResult<Scene> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut scene = Scene::default();
        match self.config.preset {
            ScenePreset::CornellBox => {
                scene.quads = build_cornell_box();
            }
            ScenePreset::SphereField => {
                let (spheres, quads) = build_sphere_field(&self.config.spheres, &mut rng);
                scene.spheres = spheres;
                scene.quads = quads;
            }
        }

        if let Some(mesh_config) = &self.config.mesh {
            let mesh = Mesh::load_obj(&mesh_config.path)?;
            scene.triangles = mesh.to_triangles(mesh_config.material.into())?;
        }

        if let Some(path) = &self.config.skybox {
            scene.skybox = Some(Skybox::load(path)?);
        }

        log::info!(
            "Built {:?} scene: {} spheres, {} quads, {} triangles",
            self.config.preset,
            scene.spheres.len(),
            scene.quads.len(),
            scene.triangles.len()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CubeFace;

    #[test]
    fn test_random_spheres_never_overlap() {
        let config = SphereConfig {
            radius_range: [3.0, 8.0],
            max_count: 50,
            placement_radius: 100.0,
        };

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = create_random_spheres(&config, &mut rng);

            assert_eq!(
                placement.spheres.len() as u32 + placement.rejected,
                config.max_count
            );
            for (i, a) in placement.spheres.iter().enumerate() {
                for b in &placement.spheres[i + 1..] {
                    let d = a.position.distance(b.position);
                    assert!(d >= a.radius + b.radius, "seed {seed}: overlap");
                }
            }
        }
    }

    #[test]
    fn test_random_spheres_rest_on_ground() {
        let config = SphereConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        for s in create_random_spheres(&config, &mut rng).spheres {
            assert_eq!(s.position.y, s.radius);
            assert!((3.0..=8.0).contains(&s.radius));
            assert!(Vec3::new(s.position.x, 0.0, s.position.z).length() < 100.0);
        }
    }

    #[test]
    fn test_crowded_placement_reports_shortfall() {
        // Tiny disk: after the first sphere nearly everything collides
        let config = SphereConfig {
            radius_range: [1.0, 1.0],
            max_count: 20,
            placement_radius: 0.5,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let placement = create_random_spheres(&config, &mut rng);

        assert_eq!(placement.spheres.len(), 1);
        assert_eq!(placement.rejected, 19);
    }

    #[test]
    fn test_sphere_materials() {
        let config = SphereConfig::default();
        let mut rng = StdRng::seed_from_u64(3);

        for s in create_random_spheres(&config, &mut rng).spheres {
            let m = s.material;
            if m.albedo == Vec3::ZERO {
                assert_eq!(m.smoothness, 1.0);
            } else {
                assert_eq!(m.specular, Vec3::splat(0.04));
                assert!((0.0..=1.0).contains(&m.smoothness));
            }
            assert!(m.emission == Vec3::ZERO || m.emission == Vec3::splat(5.0));
        }
    }

    #[test]
    fn test_hsv_to_rgb() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.25), Vec3::splat(0.25));
        let blue = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert!((blue - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_cornell_box_quad_count() {
        let quads = build_cornell_box();
        assert_eq!(quads.len(), 1 + 6 + 1 + 1 + 1 + 1 + 1 + 6 + 6);
    }

    #[test]
    fn test_cornell_box_walls_face_inward() {
        let quads = build_cornell_box();
        // floor, ceiling, right, left, front, back
        let walls = [(0, Vec3::Y), (7, -Vec3::Y), (8, -Vec3::X), (9, Vec3::X), (10, -Vec3::Z), (11, Vec3::Z)];

        for (index, expected) in walls {
            let quad = &quads[index];
            assert!(
                (quad.normal() - expected).length() < 0.001,
                "quad {index} normal {:?}",
                quad.normal()
            );
            for p in quad.corners() {
                assert!(quad.plane().evaluate(*p).abs() < 0.01);
                assert!(p.x.abs() < 3.001 && p.z.abs() < 3.001);
                assert!(p.y > -0.001 && p.y < 6.001);
            }
        }

        assert_eq!(quads[8].material.albedo, Vec3::new(0.117, 0.4125, 0.115));
        assert_eq!(quads[9].material.albedo, Vec3::new(0.611, 0.0555, 0.062));
    }

    #[test]
    fn test_cornell_box_light() {
        let quads = build_cornell_box();
        let light = &quads[1..7];

        for quad in light {
            assert_eq!(quad.material.emission, Vec3::splat(20.0));
            for p in quad.corners() {
                assert!((p.y - 6.0).abs() <= 0.05 + 0.001);
            }
        }
        let bottom = &light[CubeFace::Bottom as usize];
        assert!((bottom.normal() + Vec3::Y).length() < 0.001);

        let emissive = quads.iter().filter(|q| q.material.is_emissive()).count();
        assert_eq!(emissive, 6);
    }

    #[test]
    fn test_cornell_box_cubes_on_floor() {
        let quads = build_cornell_box();
        let right_cube = &quads[12..18];
        let left_cube = &quads[18..24];

        let min_y = |qs: &[Quad]| qs.iter().flat_map(|q| q.corners()).map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = |qs: &[Quad]| qs.iter().flat_map(|q| q.corners()).map(|p| p.y).fold(f32::MIN, f32::max);

        assert!(min_y(right_cube).abs() < 0.001);
        assert!((max_y(right_cube) - 2.0).abs() < 0.001);
        assert!(min_y(left_cube).abs() < 0.001);
        assert!((max_y(left_cube) - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_sphere_field() {
        let mut rng = StdRng::seed_from_u64(9);
        let (spheres, quads) = build_sphere_field(&SphereConfig::default(), &mut rng);

        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].material.smoothness, 0.2);
        assert!(!spheres.is_empty());
    }

    #[test]
    fn test_builder_cornell_box() {
        let config = SceneConfig::default();
        let scene = SceneBuilder::new(&config).build().unwrap();
        let buffers = scene.to_buffers();

        assert_eq!(buffers.quad_count(), 24);
        assert_eq!(buffers.sphere_count(), 0);
        assert_eq!(buffers.triangle_count(), 0);
        assert!(scene.skybox.is_none());
    }

    #[test]
    fn test_builder_is_reproducible_with_seed() {
        let config = SceneConfig {
            preset: ScenePreset::SphereField,
            seed: Some(11),
            ..Default::default()
        };
        let a = SceneBuilder::new(&config).build().unwrap().to_buffers();
        let b = SceneBuilder::new(&config).build().unwrap().to_buffers();

        assert_eq!(a, b);
        assert!(a.sphere_count() > 0);
    }

    #[test]
    fn test_builder_missing_mesh_fails() {
        let config = SceneConfig {
            mesh: Some(crate::config::MeshConfig {
                path: "/missing/mesh.obj".into(),
                material: Default::default(),
            }),
            ..Default::default()
        };

        assert!(matches!(
            SceneBuilder::new(&config).build(),
            Err(SceneError::Mesh(_))
        ));
    }
}
