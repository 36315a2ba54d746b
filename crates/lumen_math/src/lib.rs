// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod camera;
mod halton;
mod plane;
mod transform;

pub use camera::CameraState;
pub use halton::{halton, jitter_offset};
pub use plane::Plane;
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_cross_follows_right_hand_rule() {
        let c = Vec3::X.cross(Vec3::Z);
        assert_eq!(c, -Vec3::Y);
    }

    #[test]
    fn test_mat4_point_uses_w_one() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector3(Vec3::ZERO), Vec3::ZERO);
    }
}
