//! Sphere-sphere collision detection.

use crate::body::RigidBody;
use glam::Vec3;

use super::{ContactPoint, PairGeometry};

/// Detect contact between two ball-shaped bodies.
pub(super) fn detect(a: &RigidBody, b: &RigidBody, ra: f32, rb: f32) -> Option<PairGeometry> {
    let delta = b.transform.position - a.transform.position;
    let distance_squared = delta.length_squared();
    let min_distance = ra + rb;
    if distance_squared >= min_distance * min_distance {
        return None;
    }

    let distance = distance_squared.sqrt();
    // Coincident centers fall back to a fixed up direction.
    let normal = if distance > 1e-4 {
        delta / distance
    } else {
        Vec3::Y
    };
    let depth = min_distance - distance;
    let point = a.transform.position + normal * (ra - depth * 0.5);
    Some(PairGeometry {
        normal,
        points: vec![ContactPoint { point, depth }],
    })
}
