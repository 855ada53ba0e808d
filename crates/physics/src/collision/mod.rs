//! Collision detection.
//!
//! Narrow-phase contacts are generated per candidate pair from the broad
//! phase: analytic routines for the sphere cases, GJK/EPA over support
//! mappings for everything convex-versus-convex, with a face-clip pass that
//! widens a single penetration result into a stable contact patch.

pub(crate) mod broad_phase;
mod epa;
mod gjk;
mod manifold;
mod sphere_convex;
mod sphere_sphere;

use crate::body::RigidBody;
use crate::shape::Shape;
use crate::world::BodyId;
use glam::Vec3;

/// One point of a contact patch.
#[derive(Copy, Clone, Debug)]
pub struct ContactPoint {
    /// Contact position in world space.
    pub point: Vec3,
    /// Penetration depth along the manifold normal (negative means
    /// separation and is culled before solving).
    pub depth: f32,
}

/// Shared geometry of a detected pair before materials are combined.
pub(crate) struct PairGeometry {
    pub normal: Vec3,
    pub points: Vec<ContactPoint>,
}

/// A full contact manifold between two bodies.
///
/// `normal` points from body `a` into body `b`; friction and restitution are
/// the combined pair coefficients.
#[derive(Clone, Debug)]
pub struct ContactManifold {
    pub a: BodyId,
    pub b: BodyId,
    pub normal: Vec3,
    pub friction: f32,
    pub rolling_friction: f32,
    pub restitution: f32,
    pub points: Vec<ContactPoint>,
}

/// Combine friction coefficients using the geometric mean.
#[must_use]
pub fn combine_friction(f1: f32, f2: f32) -> f32 {
    (f1 * f2).sqrt()
}

/// Combine restitution coefficients using the geometric mean.
#[must_use]
pub fn combine_restitution(r1: f32, r2: f32) -> f32 {
    (r1 * r2).sqrt()
}

/// Run the narrow phase for one candidate pair.
pub(crate) fn generate_contacts(
    id_a: BodyId,
    a: &RigidBody,
    id_b: BodyId,
    b: &RigidBody,
) -> Option<ContactManifold> {
    let geometry = match (a.shape.as_ref(), b.shape.as_ref()) {
        (Shape::Ball { radius: ra }, Shape::Ball { radius: rb }) => {
            sphere_sphere::detect(a, b, *ra, *rb)?
        }
        (Shape::Ball { radius }, Shape::Cuboid { half_extents }) => {
            sphere_convex::detect_ball_cuboid(a, b, *radius, *half_extents)?
        }
        (Shape::Cuboid { half_extents }, Shape::Ball { radius }) => {
            flip(sphere_convex::detect_ball_cuboid(b, a, *radius, *half_extents)?)
        }
        _ => convex_convex(a, b)?,
    };

    Some(ContactManifold {
        a: id_a,
        b: id_b,
        normal: geometry.normal,
        friction: combine_friction(a.material.friction, b.material.friction),
        rolling_friction: combine_friction(a.material.rolling_friction, b.material.rolling_friction),
        restitution: combine_restitution(a.material.restitution, b.material.restitution),
        points: geometry.points,
    })
}

fn flip(mut geometry: PairGeometry) -> PairGeometry {
    geometry.normal = -geometry.normal;
    geometry
}

/// Generic convex pair: GJK for the overlap test, EPA for normal and depth,
/// then the face-clip patch with the lone EPA point as fallback.
fn convex_convex(a: &RigidBody, b: &RigidBody) -> Option<PairGeometry> {
    let support_a = gjk::SupportMap {
        shape: a.shape.as_ref(),
        transform: &a.transform,
    };
    let support_b = gjk::SupportMap {
        shape: b.shape.as_ref(),
        transform: &b.transform,
    };
    let simplex = gjk::intersect(&support_a, &support_b)?;
    let pen = epa::penetration(&support_a, &support_b, simplex)?;

    if let Some(points) = manifold::build_patch(a, b, pen.normal) {
        return Some(PairGeometry {
            normal: pen.normal,
            points,
        });
    }

    let pa = support_a.support(pen.normal);
    let pb = support_b.support(-pen.normal);
    Some(PairGeometry {
        normal: pen.normal,
        points: vec![ContactPoint {
            point: (pa + pb) * 0.5,
            depth: pen.depth,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use std::sync::Arc;

    fn body(shape: Shape, mass: f32, pos: Vec3) -> RigidBody {
        RigidBody::new(Arc::new(shape), mass, Transform::from_position(pos))
    }

    #[test]
    fn box_resting_on_table_produces_a_patch() {
        let table = body(
            Shape::cuboid(Vec3::new(15.0, 0.25, 15.0)),
            0.0,
            Vec3::new(0.0, -0.25, 0.0),
        );
        let cube = body(Shape::cuboid(Vec3::splat(0.5)), 1.0, Vec3::new(0.0, 0.49, 0.0));
        let manifold =
            generate_contacts(BodyId(0), &table, BodyId(1), &cube).expect("contact");
        assert!(manifold.normal.y > 0.99, "normal={:?}", manifold.normal);
        assert!(
            manifold.points.len() >= 3,
            "expected a patch, got {} points",
            manifold.points.len()
        );
    }

    #[test]
    fn separated_boxes_produce_no_manifold() {
        let a = body(Shape::cuboid(Vec3::splat(0.5)), 1.0, Vec3::ZERO);
        let b = body(Shape::cuboid(Vec3::splat(0.5)), 1.0, Vec3::new(5.0, 0.0, 0.0));
        assert!(generate_contacts(BodyId(0), &a, BodyId(1), &b).is_none());
    }

    #[test]
    fn ball_against_hull_reports_contact() {
        let pin_points = [
            Vec3::new(-0.1, 0.0, -0.1),
            Vec3::new(0.1, 0.0, -0.1),
            Vec3::new(-0.1, 0.0, 0.1),
            Vec3::new(0.1, 0.0, 0.1),
            Vec3::new(-0.05, 0.4, -0.05),
            Vec3::new(0.05, 0.4, -0.05),
            Vec3::new(-0.05, 0.4, 0.05),
            Vec3::new(0.05, 0.4, 0.05),
        ];
        let hull = Shape::convex_hull(&pin_points).unwrap();
        let pin = body(hull, 1.0, Vec3::ZERO);
        let ball = body(Shape::ball(0.25), 1.0, Vec3::new(-0.3, 0.1, 0.0));
        let manifold = generate_contacts(BodyId(0), &ball, BodyId(1), &pin).expect("contact");
        // Ball sits to the -x side, so it pushes the pin toward +x.
        assert!(manifold.normal.x > 0.5, "normal={:?}", manifold.normal);
    }
}
