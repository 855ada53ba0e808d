//! Frame driver.
//!
//! One tick per display refresh: measure the clock delta (clamped against
//! stalls), drain queued spawns, feed input to the driven vehicle, step the
//! world, run the sync bridge, hand the frame to the renderer. The order is
//! fixed and nothing here is re-entrant; there is never more than one step
//! in flight.

use crate::context::SimulationContext;
use crate::input::InputState;
use crate::render::RenderCollaborator;
use crate::spawner::ProjectileSpawner;
use crate::sync::{sync_transforms, sync_wheels};
use std::time::Instant;

/// The per-frame scheduling loop body.
pub struct FrameDriver {
    last_tick: Option<Instant>,
    max_frame_delta: f32,
    max_sub_steps: u32,
}

impl FrameDriver {
    #[must_use]
    pub fn new(max_frame_delta: f32, max_sub_steps: u32) -> Self {
        Self {
            last_tick: None,
            max_frame_delta,
            max_sub_steps,
        }
    }

    /// Run one frame, measuring elapsed wall time since the previous tick.
    pub fn tick(
        &mut self,
        ctx: &mut SimulationContext,
        spawner: Option<&mut ProjectileSpawner>,
        renderer: &mut impl RenderCollaborator,
        input: &InputState,
    ) {
        let now = Instant::now();
        let delta = match self.last_tick {
            Some(previous) => (now - previous).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.tick_with_delta(delta, ctx, spawner, renderer, input);
    }

    /// The same frame path with an injected delta; used headless and by
    /// tests.
    pub fn tick_with_delta(
        &mut self,
        delta: f32,
        ctx: &mut SimulationContext,
        spawner: Option<&mut ProjectileSpawner>,
        renderer: &mut impl RenderCollaborator,
        input: &InputState,
    ) {
        // 1. Stall guard: a backgrounded tab must not integrate minutes of
        //    gravity in one go.
        let delta = delta.clamp(0.0, self.max_frame_delta);

        // 2. Structural changes land between frames, never mid-step.
        if let Some(spawner) = spawner {
            spawner.apply_pending(ctx, renderer);
        }
        if let Some(vehicle_id) = ctx.driven_vehicle {
            if let Some(vehicle) = ctx.world.vehicle_mut(vehicle_id) {
                vehicle.set_engine_force(input.throttle());
                vehicle.set_brake(input.braking());
                let steering = input.steering_direction() * vehicle.tuning.max_steering_angle;
                vehicle.set_steering(steering);
            }
        }

        // 3. Advance the world.
        ctx.world.step(delta, self.max_sub_steps);

        // 4. Mirror the results onto the renderer.
        sync_transforms(&ctx.world, &ctx.registry, renderer);
        sync_wheels(&ctx.world, &ctx.wheel_bindings, renderer);

        // 5. Hand off; the host schedules the next tick.
        renderer.present();
    }
}
