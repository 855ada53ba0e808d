//! Rigid body state.

use crate::shape::Shape;
use crate::transform::Transform;
use glam::{Mat3, Quat, Vec3};
use std::sync::Arc;

/// Surface response properties, combined pairwise at contact time.
#[derive(Copy, Clone, Debug)]
pub struct Material {
    pub friction: f32,
    pub rolling_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            rolling_friction: 0.0,
            restitution: 0.0,
        }
    }
}

/// A simulated rigid body.
///
/// Mass 0 marks a static body: infinite mass and inertia, never integrated,
/// and immune to impulses. Once registered with a world the world is the sole
/// mutator of its pose and velocities during a step.
#[derive(Clone, Debug)]
pub struct RigidBody {
    pub shape: Arc<Shape>,
    pub transform: Transform,
    pub linvel: Vec3,
    pub angvel: Vec3,
    pub material: Material,
    pub linear_damping: f32,
    pub angular_damping: f32,
    mass: f32,
    inv_mass: f32,
    inv_inertia_local: Vec3,
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl RigidBody {
    #[must_use]
    pub fn new(shape: Arc<Shape>, mass: f32, transform: Transform) -> Self {
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        let inertia = shape.local_inertia(mass);
        let inv_inertia_local = Vec3::new(
            if inertia.x > 0.0 { 1.0 / inertia.x } else { 0.0 },
            if inertia.y > 0.0 { 1.0 / inertia.y } else { 0.0 },
            if inertia.z > 0.0 { 1.0 / inertia.z } else { 0.0 },
        );
        Self {
            shape,
            transform,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            material: Material::default(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            mass,
            inv_mass,
            inv_inertia_local,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Inverse inertia diagonal in body space.
    #[must_use]
    pub fn inv_inertia_local(&self) -> Vec3 {
        self.inv_inertia_local
    }

    /// Inverse inertia tensor rotated into world space.
    #[must_use]
    pub fn inv_inertia_world(&self) -> Mat3 {
        let r = Mat3::from_quat(self.transform.rotation);
        r * Mat3::from_diagonal(self.inv_inertia_local) * r.transpose()
    }

    /// Velocity of the material point at `rel_pos` (world offset from the
    /// body origin).
    #[must_use]
    pub fn velocity_at(&self, rel_pos: Vec3) -> Vec3 {
        self.linvel + self.angvel.cross(rel_pos)
    }

    /// Apply an impulse through the center of mass. No-op on static bodies.
    pub fn apply_central_impulse(&mut self, impulse: Vec3) {
        self.linvel += impulse * self.inv_mass;
    }

    /// Apply an impulse at a world offset from the body origin, imparting
    /// both linear and angular velocity. No-op on static bodies.
    pub fn apply_impulse(&mut self, impulse: Vec3, rel_pos: Vec3) {
        if self.is_static() {
            return;
        }
        self.linvel += impulse * self.inv_mass;
        self.angvel += self.inv_inertia_world() * rel_pos.cross(impulse);
    }

    /// Apply a pure angular impulse. No-op on static bodies.
    pub fn apply_torque_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.angvel += self.inv_inertia_world() * impulse;
    }

    /// Accumulate a force through the center of mass for the next sub-step.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a force at a world offset from the body origin.
    pub fn apply_force_at(&mut self, force: Vec3, rel_pos: Vec3) {
        self.force += force;
        self.torque += rel_pos.cross(force);
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Impulse denominator for a unit impulse applied at `rel_pos` along
    /// `dir`: the effective inverse mass seen by the solver.
    #[must_use]
    pub fn impulse_denominator(&self, rel_pos: Vec3, dir: Vec3) -> f32 {
        let angular = (self.inv_inertia_world() * rel_pos.cross(dir)).cross(rel_pos);
        self.inv_mass + angular.dot(dir)
    }

    /// Orientation integrated by `angvel` over `dt`, renormalized.
    #[must_use]
    pub(crate) fn integrated_rotation(&self, dt: f32) -> Quat {
        let w = self.angvel;
        if w.length_squared() < 1e-12 {
            return self.transform.rotation;
        }
        let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.transform.rotation;
        (self.transform.rotation + dq * (0.5 * dt)).normalize()
    }
}
