//! Fixed-layout primitive records as the trace kernel reads them.
//!
//! Every record is a tightly packed run of `f32`s in the field order below.
//! The kernel declares matching structs, so these layouts never change
//! between scene rebuilds.

use bytemuck::{Pod, Zeroable};

use crate::primitives::{Material, Quad, Sphere, Triangle};

/// Sphere record (56 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuSphere {
    pub position: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

/// Quad record (116 bytes). `equation` is (a, b, c), `dist` is d.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuQuad {
    pub p1: [f32; 3],
    pub p2: [f32; 3],
    pub p3: [f32; 3],
    pub p4: [f32; 3],
    pub normal: [f32; 3],
    pub equation: [f32; 3],
    pub dist: f32,
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

/// Triangle record (76 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub p1: [f32; 3],
    pub p2: [f32; 3],
    pub p3: [f32; 3],
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<GpuSphere>() == 56);
const _: () = assert!(std::mem::size_of::<GpuQuad>() == 116);
const _: () = assert!(std::mem::size_of::<GpuTriangle>() == 76);

impl From<&Sphere> for GpuSphere {
    fn from(sphere: &Sphere) -> Self {
        let Material {
            albedo,
            specular,
            smoothness,
            emission,
        } = sphere.material;
        Self {
            position: sphere.position.to_array(),
            radius: sphere.radius,
            albedo: albedo.to_array(),
            specular: specular.to_array(),
            smoothness,
            emission: emission.to_array(),
        }
    }
}

impl From<&Quad> for GpuQuad {
    fn from(quad: &Quad) -> Self {
        let [p1, p2, p3, p4] = *quad.corners();
        let plane = quad.plane();
        let m = quad.material;
        Self {
            p1: p1.to_array(),
            p2: p2.to_array(),
            p3: p3.to_array(),
            p4: p4.to_array(),
            normal: plane.normal.to_array(),
            equation: plane.equation.to_array(),
            dist: plane.dist,
            albedo: m.albedo.to_array(),
            specular: m.specular.to_array(),
            smoothness: m.smoothness,
            emission: m.emission.to_array(),
        }
    }
}

impl From<&Triangle> for GpuTriangle {
    fn from(triangle: &Triangle) -> Self {
        let m = triangle.material;
        Self {
            p1: triangle.p1.to_array(),
            p2: triangle.p2.to_array(),
            p3: triangle.p3.to_array(),
            albedo: m.albedo.to_array(),
            specular: m.specular.to_array(),
            smoothness: m.smoothness,
            emission: m.emission.to_array(),
        }
    }
}

/// Flat per-kind primitive arrays for one scene.
///
/// Built once per scene (re)load and replaced wholesale; there is no API
/// for editing a built buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneBuffers {
    spheres: Vec<GpuSphere>,
    quads: Vec<GpuQuad>,
    triangles: Vec<GpuTriangle>,
}

impl SceneBuffers {
    /// Pack primitives into their export records, preserving order.
    pub fn new(spheres: &[Sphere], quads: &[Quad], triangles: &[Triangle]) -> Self {
        Self {
            spheres: spheres.iter().map(GpuSphere::from).collect(),
            quads: quads.iter().map(GpuQuad::from).collect(),
            triangles: triangles.iter().map(GpuTriangle::from).collect(),
        }
    }

    pub fn spheres(&self) -> &[GpuSphere] {
        &self.spheres
    }

    pub fn quads(&self) -> &[GpuQuad] {
        &self.quads
    }

    pub fn triangles(&self) -> &[GpuTriangle] {
        &self.triangles
    }

    pub fn sphere_count(&self) -> usize {
        self.spheres.len()
    }

    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Raw bytes of the sphere array, ready for a GPU-visible buffer.
    pub fn sphere_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.spheres)
    }

    pub fn quad_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quads)
    }

    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// True if there is nothing to trace.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.quads.is_empty() && self.triangles.is_empty()
    }
}
