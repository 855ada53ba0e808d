//! The stepped physics world.
//!
//! Owns every registered body and vehicle and advances them in fixed
//! sub-steps. A `step` call is atomic from the caller's point of view: once
//! it returns, every body's transform reflects the fully resolved state for
//! the frame.

use crate::body::RigidBody;
use crate::collision::{self, broad_phase, ContactManifold};
use crate::error::PhysicsError;
use crate::integrator;
use crate::raycast::{raycast_shape, Ray, RayHit};
use crate::solver;
use crate::vehicle::{RaycastVehicle, VehicleId};
use glam::Vec3;

/// Fixed sub-step length; frame deltas are subdivided into these.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

const SOLVER_ITERATIONS: u32 = 10;

/// Stable handle to a registered body.
///
/// Slots are never reused, so a handle kept past `remove_body` reads back
/// `None` instead of aliasing a newer body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) u32);

impl BodyId {
    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Broadphase/narrowphase/solver/dynamics aggregate.
pub struct PhysicsWorld {
    gravity: Vec3,
    accumulator: f32,
    bodies: Vec<Option<RigidBody>>,
    vehicles: Vec<RaycastVehicle>,
}

impl PhysicsWorld {
    /// Create an empty world. Gravity is fixed for the world's lifetime.
    #[must_use]
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            accumulator: 0.0,
            bodies: Vec::new(),
            vehicles: Vec::new(),
        }
    }

    #[must_use]
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Register a body.
    ///
    /// # Errors
    ///
    /// Rejects malformed shapes and degenerate mass/inertia pairings at
    /// registration time; nothing invalid is ever stepped.
    pub fn add_body(&mut self, body: RigidBody) -> Result<BodyId, PhysicsError> {
        body.shape.validate()?;
        let mass = body.mass();
        if !mass.is_finite() || mass < 0.0 {
            return Err(PhysicsError::DegenerateBody(format!(
                "mass must be finite and non-negative, got {mass}"
            )));
        }
        if mass > 0.0 {
            let inertia = body.shape.local_inertia(mass);
            if inertia.min_element() <= 0.0 || !inertia.is_finite() {
                return Err(PhysicsError::DegenerateBody(format!(
                    "dynamic body has unusable inertia {inertia:?}"
                )));
            }
        }
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Some(body));
        Ok(id)
    }

    /// Remove a body. Returns it if the handle was live. Takes effect
    /// immediately; callers queueing removals apply them between frames.
    pub fn remove_body(&mut self, id: BodyId) -> Option<RigidBody> {
        self.bodies.get_mut(id.index())?.take()
    }

    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.index())?.as_ref()
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id.index())?.as_mut()
    }

    /// Iterate live bodies in registration order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|b| (BodyId(i as u32), b)))
    }

    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.iter().filter(|slot| slot.is_some()).count()
    }

    /// Register a vehicle whose chassis body is already in the world.
    ///
    /// # Errors
    ///
    /// The chassis handle must refer to a live dynamic body.
    pub fn add_vehicle(&mut self, vehicle: RaycastVehicle) -> Result<VehicleId, PhysicsError> {
        match self.body(vehicle.chassis) {
            Some(body) if !body.is_static() => {}
            Some(_) => {
                return Err(PhysicsError::DegenerateBody(
                    "vehicle chassis must be dynamic".into(),
                ))
            }
            None => return Err(PhysicsError::UnknownBody(vehicle.chassis)),
        }
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(vehicle);
        Ok(id)
    }

    #[must_use]
    pub fn vehicle(&self, id: VehicleId) -> Option<&RaycastVehicle> {
        self.vehicles.get(id.0 as usize)
    }

    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut RaycastVehicle> {
        self.vehicles.get_mut(id.0 as usize)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = (VehicleId, &RaycastVehicle)> {
        self.vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| (VehicleId(i as u32), v))
    }

    /// Advance the simulation by `delta_time` seconds.
    ///
    /// Time is consumed in fixed sub-steps, at most `max_sub_steps` per
    /// call; any backlog beyond that is dropped so a stalled frame cannot
    /// snowball.
    pub fn step(&mut self, delta_time: f32, max_sub_steps: u32) {
        self.accumulator += delta_time.max(0.0);
        let mut steps = (self.accumulator / FIXED_TIMESTEP) as u32;
        if steps > max_sub_steps {
            tracing::debug!(
                backlog = self.accumulator,
                max_sub_steps,
                "dropping simulation backlog"
            );
            steps = max_sub_steps;
            self.accumulator = FIXED_TIMESTEP * steps as f32;
        }
        self.accumulator -= FIXED_TIMESTEP * steps as f32;
        for _ in 0..steps {
            self.sub_step(FIXED_TIMESTEP);
        }
    }

    fn sub_step(&mut self, dt: f32) {
        // 1. Fold gravity and accumulated forces into velocities.
        integrator::apply_forces(&mut self.bodies, self.gravity, dt);

        // 2. Vehicles raycast and feed impulses into their chassis.
        let mut vehicles = std::mem::take(&mut self.vehicles);
        for vehicle in &mut vehicles {
            vehicle.update(self, dt);
        }
        self.vehicles = vehicles;

        // 3. Advance poses.
        integrator::integrate_transforms(&mut self.bodies, dt);

        // 4. Broad phase.
        let pairs = {
            let mut entries: Vec<broad_phase::BroadEntry> = self
                .bodies()
                .map(|(id, body)| broad_phase::BroadEntry {
                    id,
                    aabb: body.shape.aabb(&body.transform),
                    is_static: body.is_static(),
                })
                .collect();
            broad_phase::potential_pairs(&mut entries)
        };

        // 5. Narrow phase.
        let mut manifolds: Vec<ContactManifold> = Vec::with_capacity(pairs.len());
        for (id_a, id_b) in pairs {
            let (Some(a), Some(b)) = (self.body(id_a), self.body(id_b)) else {
                continue;
            };
            if let Some(manifold) = collision::generate_contacts(id_a, a, id_b, b) {
                manifolds.push(manifold);
            }
        }

        // 6. Impulse resolution and position correction.
        solver::resolve(&mut self.bodies, &manifolds, SOLVER_ITERATIONS);

        for body in self.bodies.iter_mut().flatten() {
            body.clear_forces();
        }
    }

    /// Closest ray hit over all live bodies, optionally excluding one (a
    /// vehicle never hits its own chassis).
    #[must_use]
    pub fn raycast(&self, ray: &Ray, max_distance: f32, exclude: Option<BodyId>) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (id, body) in self.bodies() {
            if exclude == Some(id) {
                continue;
            }
            let limit = best.map_or(max_distance, |hit| hit.distance);
            if let Some((distance, normal)) =
                raycast_shape(body.shape.as_ref(), &body.transform, ray, limit)
            {
                best = Some(RayHit {
                    body: id,
                    distance,
                    point: ray.point_at(distance),
                    normal,
                });
            }
        }
        best
    }
}
