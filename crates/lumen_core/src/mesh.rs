//! Indexed triangle meshes and their decomposition into `Triangle`s.
//!
//! Meshes can be built in memory or loaded from Wavefront OBJ files. The
//! kernel only understands flat triangle records, so a mesh is always
//! decomposed with [`mesh_to_triangles`] before upload.

use std::path::Path;

use lumen_math::Vec3;
use thiserror::Error;

use crate::primitives::{Material, Triangle};

/// Errors that can occur while loading or decomposing a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Index count {index_count} is not a multiple of 3")]
    Malformed { index_count: usize },

    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("OBJ load error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("No geometry found in {0}")]
    NoGeometry(String),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Emit one `Triangle` per consecutive index triple.
///
/// Fails without producing any triangles if the index count is not a
/// multiple of 3 or if any index falls outside `vertices`.
pub fn mesh_to_triangles(
    vertices: &[Vec3],
    indices: &[u32],
    material: Material,
) -> MeshResult<Vec<Triangle>> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::Malformed {
            index_count: indices.len(),
        });
    }

    let lookup = |index: u32| {
        vertices
            .get(index as usize)
            .copied()
            .ok_or(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            })
    };

    indices
        .chunks_exact(3)
        .map(|face| {
            Ok(Triangle::new(
                lookup(face[0])?,
                lookup(face[1])?,
                lookup(face[2])?,
                material,
            ))
        })
        .collect()
}

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Load every model in an OBJ file into a single triangulated mesh.
    pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )?;

        let mut mesh = Mesh::default();
        for model in &models {
            let base = mesh.positions.len() as u32;
            mesh.positions.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            mesh.indices
                .extend(model.mesh.indices.iter().map(|i| i + base));
        }

        if mesh.indices.is_empty() {
            return Err(MeshError::NoGeometry(path.display().to_string()));
        }

        log::info!(
            "Loaded {} ({} models, {} vertices, {} triangles)",
            path.display(),
            models.len(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Decompose into triangles sharing `material`.
    pub fn to_triangles(&self, material: Material) -> MeshResult<Vec<Triangle>> {
        mesh_to_triangles(&self.positions, &self.indices, material)
    }
}
