use glam::{Mat4, Vec3};

/// Camera matrices handed to the trace kernel each frame.
///
/// The kernel reconstructs primary rays from these two matrices alone, so
/// this is all of the camera the renderer needs to know about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Camera space -> world space (inverse of the view matrix)
    pub camera_to_world: Mat4,
    /// Clip space -> camera space (inverse of the projection matrix)
    pub inverse_projection: Mat4,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

impl CameraState {
    /// Create a camera state directly from its matrices.
    pub fn new(camera_to_world: Mat4, inverse_projection: Mat4) -> Self {
        Self {
            camera_to_world,
            inverse_projection,
        }
    }

    /// Build a perspective camera at `position` looking at `target`.
    ///
    /// `fov_y_degrees` is the vertical field of view. Right-handed, camera
    /// looks down its local -Z.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(position, target, up);
        let projection = Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, 0.1, 1000.0);
        Self {
            camera_to_world: view.inverse(),
            inverse_projection: projection.inverse(),
        }
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        self.camera_to_world.transform_point3(Vec3::ZERO)
    }

    /// Update aspect ratio (e.g., on window resize), keeping the same field of view.
    pub fn with_projection(mut self, fov_y_degrees: f32, aspect: f32) -> Self {
        let projection = Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, 0.1, 1000.0);
        self.inverse_projection = projection.inverse();
        self
    }
}
