//! Projectile spawning.
//!
//! Pointer gestures turn into spawn requests; requests queue here and are
//! drained at the start of the next frame so the body list never changes
//! while the solver is iterating it. Sub-threshold power is the gesture
//! debounce: the request is dropped silently instead of spawning a
//! near-stationary ball.

use crate::context::SimulationContext;
use crate::registry::RenderHandle;
use crate::render::RenderCollaborator;
use glam::Vec3;
use physics::{BodyId, Material, RigidBody, Shape, Transform};
use std::sync::Arc;

/// The original throw scaled pointer power by this factor into a launch
/// speed.
pub const DEFAULT_SPEED_SCALE: f32 = 20.0;
pub const DEFAULT_MIN_POWER: f32 = 0.05;

struct SpawnRequest {
    origin: Vec3,
    direction: Vec3,
    power: f32,
}

/// Creates one-shot dynamic balls from gesture input.
pub struct ProjectileSpawner {
    shape: Arc<Shape>,
    mass: f32,
    prototype: RenderHandle,
    /// Gestures weaker than this are ignored outright.
    pub min_power: f32,
    /// Launch speed per unit of gesture power.
    pub speed_scale: f32,
    /// Local offset at which the launch impulse is applied; off-center
    /// values add spin.
    pub launch_offset: Vec3,
    /// Surface response given to every spawned ball.
    pub material: Material,
    /// When set, each new ball replaces the previous one (bowling retry).
    pub replace_previous: bool,
    pending: Vec<SpawnRequest>,
    last_spawned: Option<BodyId>,
}

impl ProjectileSpawner {
    #[must_use]
    pub fn new(radius: f32, mass: f32, prototype: RenderHandle) -> Self {
        Self {
            shape: Arc::new(Shape::ball(radius)),
            mass,
            prototype,
            min_power: DEFAULT_MIN_POWER,
            speed_scale: DEFAULT_SPEED_SCALE,
            launch_offset: Vec3::ZERO,
            material: Material::default(),
            replace_previous: false,
            pending: Vec::new(),
            last_spawned: None,
        }
    }

    /// Queue a throw. Returns whether the gesture was accepted; a rejected
    /// gesture is a no-op, not an error.
    pub fn queue(&mut self, origin: Vec3, direction: Vec3, power: f32) -> bool {
        if power < self.min_power {
            tracing::debug!(power, min = self.min_power, "gesture below threshold, ignored");
            return false;
        }
        let Some(direction) = direction.try_normalize() else {
            tracing::debug!("gesture has no direction, ignored");
            return false;
        };
        self.pending.push(SpawnRequest {
            origin,
            direction,
            power,
        });
        true
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    #[must_use]
    pub fn last_spawned(&self) -> Option<BodyId> {
        self.last_spawned
    }

    /// Drain the queue: create each ball, apply its launch impulse, bind a
    /// freshly instantiated render handle. Called by the frame driver before
    /// stepping; never touches any existing body.
    pub fn apply_pending(
        &mut self,
        ctx: &mut SimulationContext,
        renderer: &mut impl RenderCollaborator,
    ) -> Vec<BodyId> {
        let requests = std::mem::take(&mut self.pending);
        let mut spawned = Vec::with_capacity(requests.len());
        for request in requests {
            if self.replace_previous {
                if let Some(previous) = self.last_spawned.take() {
                    ctx.world.remove_body(previous);
                    if let Some(handle) = ctx.registry.unbind(previous) {
                        renderer.retire(handle);
                    }
                }
            }

            let mut body = RigidBody::new(
                Arc::clone(&self.shape),
                self.mass,
                Transform::from_position(request.origin),
            );
            body.material = self.material;
            let id = match ctx.world.add_body(body) {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(%err, "projectile rejected");
                    continue;
                }
            };
            let impulse = request.direction * (request.power * self.speed_scale * self.mass);
            if let Some(body) = ctx.world.body_mut(id) {
                body.apply_impulse(impulse, self.launch_offset);
            }

            let handle = renderer.instantiate(self.prototype);
            ctx.registry.bind(id, handle);
            tracing::debug!(?id, power = request.power, "projectile spawned");

            self.last_spawned = Some(id);
            spawned.push(id);
        }
        spawned
    }
}
