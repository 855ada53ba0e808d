//! Sphere-versus-box collision detection.
//!
//! The box is handled analytically in its own local frame: clamp the sphere
//! center onto the box, then compare against the radius. Sphere-versus-hull
//! pairs go through the generic GJK/EPA path instead.

use crate::body::RigidBody;
use crate::shape::COLLISION_MARGIN;
use glam::Vec3;

use super::{ContactPoint, PairGeometry};

/// Detect contact between a ball body `a` and a cuboid body `b`.
pub(super) fn detect_ball_cuboid(
    a: &RigidBody,
    b: &RigidBody,
    radius: f32,
    half_extents: Vec3,
) -> Option<PairGeometry> {
    let padded = half_extents + Vec3::splat(COLLISION_MARGIN);
    let center_local = b.transform.inverse_transform_point(a.transform.position);
    let closest_local = center_local.clamp(-padded, padded);
    let offset = center_local - closest_local;
    let distance_squared = offset.length_squared();

    if distance_squared > radius * radius {
        return None;
    }

    let (normal_local, depth, surface_local) = if distance_squared > 1e-10 {
        // Center outside the box: push along the closest-point direction.
        let distance = distance_squared.sqrt();
        (offset / distance, radius - distance, closest_local)
    } else {
        // Center inside the box: exit through the nearest face.
        let to_face = padded - center_local.abs();
        let (axis, sign) = if to_face.x <= to_face.y && to_face.x <= to_face.z {
            (Vec3::X, center_local.x.signum())
        } else if to_face.y <= to_face.z {
            (Vec3::Y, center_local.y.signum())
        } else {
            (Vec3::Z, center_local.z.signum())
        };
        let normal = axis * sign;
        let depth = to_face.min_element() + radius;
        let surface = center_local + normal * to_face.min_element();
        (normal, depth, surface)
    };

    // Convention: normal points from A (ball) to B (box).
    let normal_world = b.transform.transform_vector(-normal_local);
    let point_world = b.transform.transform_point(surface_local);
    Some(PairGeometry {
        normal: normal_world,
        points: vec![ContactPoint {
            point: point_world,
            depth,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::transform::Transform;
    use std::sync::Arc;

    fn ball_at(pos: Vec3, radius: f32) -> RigidBody {
        RigidBody::new(
            Arc::new(Shape::ball(radius)),
            1.0,
            Transform::from_position(pos),
        )
    }

    fn cuboid_at(pos: Vec3, half: Vec3) -> RigidBody {
        RigidBody::new(
            Arc::new(Shape::cuboid(half)),
            0.0,
            Transform::from_position(pos),
        )
    }

    #[test]
    fn ball_resting_on_box_pushes_up() {
        let table = cuboid_at(Vec3::new(0.0, -0.5, 0.0), Vec3::new(5.0, 0.5, 5.0));
        let ball = ball_at(Vec3::new(0.0, 0.2, 0.0), 0.25);
        let geo = detect_ball_cuboid(&ball, &table, 0.25, Vec3::new(5.0, 0.5, 5.0))
            .expect("contact");
        // Normal from ball into table points down.
        assert!(geo.normal.y < -0.99);
        assert!(geo.points[0].depth > 0.0);
    }

    #[test]
    fn distant_ball_misses() {
        let table = cuboid_at(Vec3::ZERO, Vec3::splat(0.5));
        let ball = ball_at(Vec3::new(0.0, 3.0, 0.0), 0.25);
        assert!(detect_ball_cuboid(&ball, &table, 0.25, Vec3::splat(0.5)).is_none());
    }
}
