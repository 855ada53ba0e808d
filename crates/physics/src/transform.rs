//! Rigid transform (position + orientation) utilities.
//!
//! Bodies carry their pose as a position plus an orientation quaternion; the
//! helpers here convert to the 4x4 matrices a renderer consumes and move
//! points/vectors between world and body space.

use glam::{Mat4, Quat, Vec3};

/// A rigid-body pose: translation followed by rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose with the identity orientation.
    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Map a body-local point into world space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.position
    }

    /// Map a world point into body-local space.
    #[must_use]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Rotate a body-local direction into world space.
    #[must_use]
    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Rotate a world direction into body-local space.
    #[must_use]
    pub fn inverse_transform_vector(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Convert a pose to a 4x4 transformation matrix.
#[must_use]
pub fn to_transform_matrix(transform: &Transform) -> [[f32; 4]; 4] {
    Mat4::from_rotation_translation(transform.rotation, transform.position).to_cols_array_2d()
}

/// Convert a pose plus a local mesh offset to a 4x4 transform matrix.
///
/// Used for objects where the visual mesh origin is offset from the body
/// center.
#[must_use]
pub fn to_transform_matrix_with_offset(transform: &Transform, mesh_offset: Vec3) -> [[f32; 4]; 4] {
    let m = Mat4::from_rotation_translation(transform.rotation, transform.position)
        * Mat4::from_translation(mesh_offset);
    m.to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let m = to_transform_matrix(&Transform::IDENTITY);
        assert_eq!(m[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(m[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(m[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn translation_lands_in_last_column() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let m = to_transform_matrix(&t);
        assert_eq!(m[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn mesh_offset_applies_in_local_space() {
        let t = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        let m = to_transform_matrix_with_offset(&t, Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(m[3][1], 0.5);
    }

    #[test]
    fn point_round_trip() {
        let t = Transform::new(
            Vec3::new(3.0, -1.0, 2.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_3),
        );
        let p = Vec3::new(0.5, 2.0, -0.25);
        let back = t.inverse_transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }
}
