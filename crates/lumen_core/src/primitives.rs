//! Scene primitives: spheres, quads and triangles sharing one material record.
//!
//! A `Quad`'s plane is derived from its corners. Corners are private and
//! every way of producing a quad (construction, transformation) recomputes
//! the plane, so a quad with a stale plane cannot be observed.

use lumen_math::{Mat4, Plane, Vec3};

/// Surface response shared by every primitive kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse colour (RGB, 0-1)
    pub albedo: Vec3,
    /// Specular colour (RGB, 0-1)
    pub specular: Vec3,
    /// 0 = rough, 1 = mirror
    pub smoothness: f32,
    /// Emitted radiance (RGB, >= 0)
    pub emission: Vec3,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Vec3::ZERO,
            specular: Vec3::ZERO,
            smoothness: 0.0,
            emission: Vec3::ZERO,
        }
    }
}

impl Material {
    /// Rough, non-specular surface of the given colour.
    pub fn diffuse(albedo: Vec3) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// White light source with flat `strength` emission in every channel.
    pub fn emissive(strength: f32) -> Self {
        Self {
            albedo: Vec3::ONE,
            specular: Vec3::ONE,
            smoothness: 0.0,
            emission: Vec3::splat(strength),
        }
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(position: Vec3, radius: f32, material: Material) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            material,
        }
    }

    /// True if the two bounding spheres interpenetrate.
    ///
    /// Touching spheres (distance == sum of radii) do not overlap.
    pub fn overlaps(&self, other: &Sphere) -> bool {
        let min_dist = self.radius + other.radius;
        self.position.distance_squared(other.position) < min_dist * min_dist
    }
}

/// A planar, four-cornered primitive with its derived plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    corners: [Vec3; 4],
    plane: Plane,
    pub material: Material,
}

impl Quad {
    /// Create a quad from four coplanar, counter-clockwise corners.
    ///
    /// Coplanarity is the caller's responsibility.
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3, material: Material) -> Self {
        Self {
            corners: [p1, p2, p3, p4],
            plane: Plane::from_corners(p1, p2, p3, p4),
            material,
        }
    }

    /// Create an unlit (all-zero material) quad from its corners.
    pub fn from_corners(corners: [Vec3; 4]) -> Self {
        let [p1, p2, p3, p4] = corners;
        Self::new(p1, p2, p3, p4, Material::default())
    }

    /// Same corners, different material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Apply `matrix` to every corner (as points, w = 1) and rederive the plane.
    ///
    /// The normal follows the transformed winding, so reflections flip it.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let [p1, p2, p3, p4] = self.corners.map(|p| matrix.transform_point3(p));
        Self::new(p1, p2, p3, p4, self.material)
    }

    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Unit normal of the corner winding.
    pub fn normal(&self) -> Vec3 {
        self.plane.normal
    }

    /// Average of the four corners.
    pub fn center(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>() / 4.0
    }

    pub fn is_degenerate(&self) -> bool {
        self.plane.is_degenerate()
    }
}

/// A triangle primitive. Intersection data is computed by the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Vec3,
    pub p2: Vec3,
    pub p3: Vec3,
    pub material: Material,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(p1: Vec3, p2: Vec3, p3: Vec3, material: Material) -> Self {
        Self { p1, p2, p3, material }
    }
}
