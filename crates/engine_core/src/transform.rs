//! Transform component and utilities for spatial positioning.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// First-person orientation: yaw around world Y, then pitch around local X.
    pub fn from_yaw_pitch(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0),
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Turn to face `direction` on the horizontal plane. Vertical components
    /// are ignored; a zero direction leaves the rotation unchanged.
    pub fn face_direction(&mut self, direction: Vec3) {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > 1e-6 {
            let yaw = (-flat.x).atan2(-flat.z);
            self.rotation = Quat::from_rotation_y(yaw);
        }
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn yaw_pitch_forward() {
        let t = Transform::from_yaw_pitch(Vec3::ZERO, 0.0, 0.0);
        assert!((t.forward() - Vec3::NEG_Z).length() < EPS);

        let t = Transform::from_yaw_pitch(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 0.0);
        assert!((t.forward() - Vec3::NEG_X).length() < EPS);

        let t = Transform::from_yaw_pitch(Vec3::ZERO, 0.0, std::f32::consts::FRAC_PI_2);
        assert!((t.forward() - Vec3::Y).length() < EPS);
    }

    #[test]
    fn face_direction_points_forward_along_target() {
        let mut t = Transform::default();
        t.face_direction(Vec3::new(1.0, 5.0, 0.0));
        assert!((t.forward() - Vec3::X).length() < EPS);

        let before = t.rotation;
        t.face_direction(Vec3::Y);
        assert_eq!(t.rotation, before);
    }

    #[test]
    fn raw_matrix_carries_translation() {
        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::X);
        let raw = TransformRaw::from(t);
        assert_eq!(raw.model[3], [2.0, 2.0, 3.0, 1.0]);
    }
}
