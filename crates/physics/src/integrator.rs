//! Numerical integration of body state.
//!
//! Semi-implicit Euler: forces update velocities first, then the updated
//! velocities advance the pose. Damping is applied per sub-step after the
//! pose update so a body with zero damping follows the discrete free-fall
//! sum exactly.

use crate::body::RigidBody;
use glam::Vec3;

/// Fold gravity and accumulated forces/torques into velocities.
pub fn apply_forces(bodies: &mut [Option<RigidBody>], gravity: Vec3, dt: f32) {
    for body in bodies.iter_mut().flatten() {
        if body.is_static() {
            continue;
        }
        let acceleration = gravity + body.force * body.inv_mass();
        body.linvel += acceleration * dt;
        body.angvel += body.inv_inertia_world() * body.torque * dt;
    }
}

/// Advance poses by the current velocities, then damp.
pub fn integrate_transforms(bodies: &mut [Option<RigidBody>], dt: f32) {
    for body in bodies.iter_mut().flatten() {
        if body.is_static() {
            continue;
        }
        body.transform.position += body.linvel * dt;
        body.transform.rotation = body.integrated_rotation(dt);

        let lin_factor = (1.0 - body.linear_damping * dt).clamp(0.0, 1.0);
        let ang_factor = (1.0 - body.angular_damping * dt).clamp(0.0, 1.0);
        body.linvel *= lin_factor;
        body.angvel *= ang_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::transform::Transform;
    use std::sync::Arc;

    #[test]
    fn static_bodies_do_not_move() {
        let body = RigidBody::new(
            Arc::new(Shape::cuboid(Vec3::ONE)),
            0.0,
            Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
        );
        let mut slots = vec![Some(body)];
        apply_forces(&mut slots, Vec3::new(0.0, -9.807, 0.0), 0.1);
        integrate_transforms(&mut slots, 0.1);
        let body = slots[0].as_ref().unwrap();
        assert_eq!(body.transform.position.y, 3.0);
        assert_eq!(body.linvel, Vec3::ZERO);
    }

    #[test]
    fn velocity_updates_before_position() {
        let body = RigidBody::new(Arc::new(Shape::ball(0.5)), 1.0, Transform::IDENTITY);
        let mut slots = vec![Some(body)];
        let g = Vec3::new(0.0, -10.0, 0.0);
        apply_forces(&mut slots, g, 0.5);
        integrate_transforms(&mut slots, 0.5);
        let body = slots[0].as_ref().unwrap();
        // Semi-implicit: y = v1 * dt = (-10 * 0.5) * 0.5
        assert!((body.transform.position.y + 2.5).abs() < 1e-6);
    }
}
