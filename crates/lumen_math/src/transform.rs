// Rigid/affine transform helpers.
//
// Transforms compose as translation * rotation * scale and are applied
// right-to-left to homogeneous points (w = 1).

use crate::{Mat4, Quat, Vec3};

/// Transform components that can be composed into a matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform from all three components.
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Translation followed by a rotation of `degrees` about `axis`.
    pub fn from_translation_angle_axis(translation: Vec3, degrees: f32, axis: Vec3) -> Self {
        Self {
            translation,
            rotation: Self::angle_axis(degrees, axis),
            ..Default::default()
        }
    }

    /// Replace the scale component.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation of `degrees` about `axis` (normalized here).
    pub fn angle_axis(degrees: f32, axis: Vec3) -> Quat {
        Quat::from_axis_angle(axis.normalize(), degrees.to_radians())
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
