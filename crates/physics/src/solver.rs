//! Impulse-based contact resolution.
//!
//! Sequential impulses over every manifold point: a normal impulse drives
//! the separating velocity toward its restitution target, a tangential
//! impulse clamped by the Coulomb cone resists slip, and an angular impulse
//! models rolling friction. Penetration left over after the velocity pass is
//! removed by direct position correction split by inverse mass.

use crate::body::RigidBody;
use crate::collision::ContactManifold;
use glam::Vec3;

const POSITION_CORRECTION_PERCENT: f32 = 0.8;
const POSITION_CORRECTION_SLOP: f32 = 0.005;
/// Impacts slower than this along the normal are treated as inelastic so
/// resting stacks do not vibrate.
const RESTITUTION_THRESHOLD: f32 = 1.0;

struct SolverPoint {
    point: Vec3,
    depth: f32,
    target_normal_velocity: f32,
    accumulated_normal_impulse: f32,
}

struct SolverContact {
    a: usize,
    b: usize,
    normal: Vec3,
    friction: f32,
    rolling_friction: f32,
    points: Vec<SolverPoint>,
}

/// Resolve all manifolds against the body set.
pub(crate) fn resolve(
    slots: &mut [Option<RigidBody>],
    manifolds: &[ContactManifold],
    iterations: u32,
) {
    let mut contacts = prepare(slots, manifolds);

    for _ in 0..iterations {
        for contact in &mut contacts {
            let Some((body_a, body_b)) = pair_mut(slots, contact.a, contact.b) else {
                continue;
            };
            solve_velocity(body_a, body_b, contact);
        }
    }

    for contact in &contacts {
        let Some((body_a, body_b)) = pair_mut(slots, contact.a, contact.b) else {
            continue;
        };
        apply_rolling_friction(body_a, body_b, contact);
        correct_positions(body_a, body_b, contact);
    }
}

/// Capture pre-solve normal velocities so restitution bounces off the
/// impact speed, not a partially resolved one.
fn prepare(slots: &mut [Option<RigidBody>], manifolds: &[ContactManifold]) -> Vec<SolverContact> {
    let mut contacts = Vec::with_capacity(manifolds.len());
    for manifold in manifolds {
        let (ia, ib) = (manifold.a.index(), manifold.b.index());
        let Some((body_a, body_b)) = pair_mut(slots, ia, ib) else {
            continue;
        };
        let points = manifold
            .points
            .iter()
            .filter(|p| p.depth > 0.0)
            .map(|p| {
                let rel_a = p.point - body_a.transform.position;
                let rel_b = p.point - body_b.transform.position;
                let approach = (body_b.velocity_at(rel_b) - body_a.velocity_at(rel_a))
                    .dot(manifold.normal);
                let bounce = if -approach > RESTITUTION_THRESHOLD {
                    -approach * manifold.restitution
                } else {
                    0.0
                };
                SolverPoint {
                    point: p.point,
                    depth: p.depth,
                    target_normal_velocity: bounce,
                    accumulated_normal_impulse: 0.0,
                }
            })
            .collect::<Vec<_>>();
        if points.is_empty() {
            continue;
        }
        contacts.push(SolverContact {
            a: ia,
            b: ib,
            normal: manifold.normal,
            friction: manifold.friction,
            rolling_friction: manifold.rolling_friction,
            points,
        });
    }
    contacts
}

fn solve_velocity(body_a: &mut RigidBody, body_b: &mut RigidBody, contact: &mut SolverContact) {
    let normal = contact.normal;
    for point in &mut contact.points {
        let rel_a = point.point - body_a.transform.position;
        let rel_b = point.point - body_b.transform.position;

        let relative = body_b.velocity_at(rel_b) - body_a.velocity_at(rel_a);
        let normal_velocity = relative.dot(normal);
        if normal_velocity < point.target_normal_velocity {
            let k = body_a.impulse_denominator(rel_a, normal)
                + body_b.impulse_denominator(rel_b, normal);
            if k > 0.0 {
                let j = (point.target_normal_velocity - normal_velocity) / k;
                body_a.apply_impulse(-normal * j, rel_a);
                body_b.apply_impulse(normal * j, rel_b);
                point.accumulated_normal_impulse += j;
            }
        }

        // Coulomb friction against the updated relative velocity.
        let relative = body_b.velocity_at(rel_b) - body_a.velocity_at(rel_a);
        let tangential = relative - normal * relative.dot(normal);
        let slip = tangential.length();
        if slip > 1e-6 {
            let tangent = tangential / slip;
            let k = body_a.impulse_denominator(rel_a, tangent)
                + body_b.impulse_denominator(rel_b, tangent);
            if k > 0.0 {
                let limit = contact.friction * point.accumulated_normal_impulse;
                let jt = (-slip / k).clamp(-limit, limit);
                body_a.apply_impulse(-tangent * jt, rel_a);
                body_b.apply_impulse(tangent * jt, rel_b);
            }
        }
    }
}

/// Spend an angular impulse proportional to the total normal load against
/// each body's spin, clamped so it stops rotation rather than reversing it.
fn apply_rolling_friction(
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    contact: &SolverContact,
) {
    if contact.rolling_friction <= 0.0 {
        return;
    }
    let total_load: f32 = contact
        .points
        .iter()
        .map(|p| p.accumulated_normal_impulse)
        .sum();
    if total_load <= 0.0 {
        return;
    }
    let budget = contact.rolling_friction * total_load;
    for body in [body_a, body_b] {
        if body.is_static() {
            continue;
        }
        let spin = body.angvel.length();
        if spin < 1e-5 {
            continue;
        }
        let axis = body.angvel / spin;
        let gain = (body.inv_inertia_world() * axis).dot(axis);
        let delta = (budget * gain).min(spin);
        body.angvel -= axis * delta;
    }
}

fn correct_positions(body_a: &mut RigidBody, body_b: &mut RigidBody, contact: &SolverContact) {
    let inv_sum = body_a.inv_mass() + body_b.inv_mass();
    if inv_sum <= 0.0 {
        return;
    }
    let scale = POSITION_CORRECTION_PERCENT / (inv_sum * contact.points.len() as f32);
    for point in &contact.points {
        let magnitude = (point.depth - POSITION_CORRECTION_SLOP).max(0.0) * scale;
        if magnitude <= 0.0 {
            continue;
        }
        let correction = contact.normal * magnitude;
        body_a.transform.position -= correction * body_a.inv_mass();
        body_b.transform.position += correction * body_b.inv_mass();
    }
}

/// Distinct mutable borrows of two body slots.
fn pair_mut(
    slots: &mut [Option<RigidBody>],
    a: usize,
    b: usize,
) -> Option<(&mut RigidBody, &mut RigidBody)> {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = slots.split_at_mut(b);
        match (left[a].as_mut(), right[0].as_mut()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    } else {
        let (left, right) = slots.split_at_mut(a);
        match (right[0].as_mut(), left[b].as_mut()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::generate_contacts;
    use crate::shape::Shape;
    use crate::transform::Transform;
    use crate::world::BodyId;
    use std::sync::Arc;

    fn slot(shape: Shape, mass: f32, pos: Vec3) -> Option<RigidBody> {
        Some(RigidBody::new(
            Arc::new(shape),
            mass,
            Transform::from_position(pos),
        ))
    }

    #[test]
    fn falling_ball_on_static_table_stops_sinking() {
        let mut slots = vec![
            slot(
                Shape::cuboid(Vec3::new(5.0, 0.25, 5.0)),
                0.0,
                Vec3::new(0.0, -0.25, 0.0),
            ),
            slot(Shape::ball(0.25), 1.0, Vec3::new(0.0, 0.23, 0.0)),
        ];
        slots[1].as_mut().unwrap().linvel = Vec3::new(0.0, -2.0, 0.0);

        let manifold = {
            let a = slots[0].as_ref().unwrap();
            let b = slots[1].as_ref().unwrap();
            generate_contacts(BodyId(0), a, BodyId(1), b).expect("contact")
        };
        resolve(&mut slots, &[manifold], 10);

        let ball = slots[1].as_ref().unwrap();
        assert!(ball.linvel.y >= -1e-3, "still sinking: {:?}", ball.linvel);
        // Static table never moves.
        let table = slots[0].as_ref().unwrap();
        assert_eq!(table.transform.position, Vec3::new(0.0, -0.25, 0.0));
    }

    #[test]
    fn restitution_bounces_fast_impacts() {
        let mut slots = vec![
            slot(
                Shape::cuboid(Vec3::new(5.0, 0.25, 5.0)),
                0.0,
                Vec3::new(0.0, -0.25, 0.0),
            ),
            slot(Shape::ball(0.25), 1.0, Vec3::new(0.0, 0.2, 0.0)),
        ];
        {
            let table = slots[0].as_mut().unwrap();
            table.material.restitution = 0.5;
            let ball = slots[1].as_mut().unwrap();
            ball.material.restitution = 0.5;
            ball.linvel = Vec3::new(0.0, -4.0, 0.0);
        }
        let manifold = {
            let a = slots[0].as_ref().unwrap();
            let b = slots[1].as_ref().unwrap();
            generate_contacts(BodyId(0), a, BodyId(1), b).expect("contact")
        };
        resolve(&mut slots, &[manifold], 10);
        let ball = slots[1].as_ref().unwrap();
        // Combined restitution 0.5 of a 4 m/s impact.
        assert!(ball.linvel.y > 1.5, "no bounce: {:?}", ball.linvel);
    }
}
