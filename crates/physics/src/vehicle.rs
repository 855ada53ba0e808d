//! Raycast vehicle model.
//!
//! The chassis is an ordinary rigid body; wheels are massless rays. Each
//! sub-step every wheel casts along its suspension direction, and a grounded
//! wheel feeds three impulses back into the chassis: a spring/damper along
//! the contact normal, a longitudinal drive/brake impulse, and a lateral
//! impulse cancelling side slip. Both tangential impulses share a friction
//! circle bounded by `friction_slip` times the wheel's normal load.

use crate::raycast::Ray;
use crate::transform::Transform;
use crate::world::{BodyId, PhysicsWorld};
use glam::{Quat, Vec3};

/// Chassis-level tuning limits.
#[derive(Copy, Clone, Debug)]
pub struct VehicleTuning {
    pub max_engine_force: f32,
    pub max_brake_force: f32,
    /// Steering clamp in radians.
    pub max_steering_angle: f32,
    pub max_suspension_force: f32,
    /// Always-on longitudinal drag at the contact patch; keeps a parked
    /// vehicle from creeping on suspension rock.
    pub rolling_resistance: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_engine_force: 3000.0,
            max_brake_force: 400.0,
            max_steering_angle: std::f32::consts::FRAC_PI_6,
            max_suspension_force: 12_000.0,
            rolling_resistance: 8.0,
        }
    }
}

/// Static description of one wheel.
#[derive(Copy, Clone, Debug)]
pub struct WheelDesc {
    /// Suspension attachment point in chassis space.
    pub chassis_connection: Vec3,
    /// Suspension ray direction in chassis space (usually straight down).
    pub suspension_dir: Vec3,
    /// Axle direction in chassis space (points out the right side).
    pub axle: Vec3,
    pub rest_length: f32,
    pub radius: f32,
    pub suspension_stiffness: f32,
    pub suspension_damping: f32,
    /// Friction-circle coefficient: grip scales with normal load.
    pub friction_slip: f32,
    /// 0..1; lower values absorb lateral force instead of rolling the
    /// chassis at speed.
    pub roll_influence: f32,
    pub steers: bool,
    pub driven: bool,
}

/// Per-wheel runtime state, refreshed every sub-step.
#[derive(Copy, Clone, Debug)]
pub struct WheelState {
    pub desc: WheelDesc,
    pub grounded: bool,
    pub suspension_length: f32,
    pub compression: f32,
    pub suspension_force: f32,
    pub contact_point: Vec3,
    pub contact_normal: Vec3,
    pub ground_body: Option<BodyId>,
    pub steering: f32,
    /// Accumulated spin around the axle, for rendering.
    pub rotation: f32,
    pub world_transform: Transform,
}

impl WheelState {
    fn new(desc: WheelDesc) -> Self {
        Self {
            desc,
            grounded: false,
            suspension_length: desc.rest_length,
            compression: 0.0,
            suspension_force: 0.0,
            contact_point: Vec3::ZERO,
            contact_normal: Vec3::Y,
            ground_body: None,
            steering: 0.0,
            rotation: 0.0,
            world_transform: Transform::IDENTITY,
        }
    }
}

/// Handle to a vehicle registered with a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VehicleId(pub(crate) u32);

/// A four-wheeled raycast vehicle.
///
/// Wheel order is fixed and significant: steering only ever applies to the
/// front pair.
pub struct RaycastVehicle {
    pub chassis: BodyId,
    pub tuning: VehicleTuning,
    wheels: [WheelState; 4],
    engine_force: f32,
    brake_force: f32,
    steering: f32,
}

pub const WHEEL_FRONT_LEFT: usize = 0;
pub const WHEEL_FRONT_RIGHT: usize = 1;
pub const WHEEL_BACK_LEFT: usize = 2;
pub const WHEEL_BACK_RIGHT: usize = 3;

impl RaycastVehicle {
    #[must_use]
    pub fn new(chassis: BodyId, wheels: [WheelDesc; 4], tuning: VehicleTuning) -> Self {
        Self {
            chassis,
            tuning,
            wheels: wheels.map(WheelState::new),
            engine_force: 0.0,
            brake_force: 0.0,
            steering: 0.0,
        }
    }

    /// Throttle in [-1, 1]; negative reverses.
    pub fn set_engine_force(&mut self, normalized: f32) {
        self.engine_force = normalized.clamp(-1.0, 1.0) * self.tuning.max_engine_force;
    }

    /// Brake in [0, 1], applied to all wheels.
    pub fn set_brake(&mut self, normalized: f32) {
        self.brake_force = normalized.clamp(0.0, 1.0) * self.tuning.max_brake_force;
    }

    /// Steering angle in radians, clamped to the tuning maximum and applied
    /// to the front wheel pair.
    pub fn set_steering(&mut self, angle: f32) {
        let max = self.tuning.max_steering_angle;
        self.steering = angle.clamp(-max, max);
    }

    #[must_use]
    pub fn steering(&self) -> f32 {
        self.steering
    }

    #[must_use]
    pub fn wheels(&self) -> &[WheelState; 4] {
        &self.wheels
    }

    /// Advance the vehicle by one sub-step: raycasts, suspension, drive and
    /// friction impulses, wheel pose bookkeeping.
    pub(crate) fn update(&mut self, world: &mut PhysicsWorld, dt: f32) {
        let Some(chassis) = world.body(self.chassis) else {
            return;
        };
        let chassis_transform = chassis.transform;

        for wheel in &mut self.wheels {
            wheel.steering = if wheel.desc.steers { self.steering } else { 0.0 };
        }

        self.cast_wheels(world, &chassis_transform);
        self.apply_suspension(world, dt);
        self.apply_wheel_friction(world, &chassis_transform, dt);
        self.update_wheel_transforms(world, &chassis_transform, dt);
    }

    fn cast_wheels(&mut self, world: &PhysicsWorld, chassis_transform: &Transform) {
        for wheel in &mut self.wheels {
            let hard_point = chassis_transform.transform_point(wheel.desc.chassis_connection);
            let dir = chassis_transform
                .transform_vector(wheel.desc.suspension_dir)
                .normalize_or_zero();
            let ray_length = wheel.desc.rest_length + wheel.desc.radius;

            match world.raycast(&Ray::new(hard_point, dir), ray_length, Some(self.chassis)) {
                Some(hit) => {
                    let min_length = wheel.desc.rest_length * 0.1;
                    wheel.grounded = true;
                    wheel.suspension_length =
                        (hit.distance - wheel.desc.radius).clamp(min_length, wheel.desc.rest_length);
                    wheel.compression = wheel.desc.rest_length - wheel.suspension_length;
                    wheel.contact_point = hit.point;
                    wheel.contact_normal = hit.normal;
                    wheel.ground_body = Some(hit.body);
                }
                None => {
                    wheel.grounded = false;
                    wheel.suspension_length = wheel.desc.rest_length;
                    wheel.compression = 0.0;
                    wheel.suspension_force = 0.0;
                    wheel.ground_body = None;
                }
            }
        }
    }

    fn apply_suspension(&mut self, world: &mut PhysicsWorld, dt: f32) {
        for wheel in &mut self.wheels {
            if !wheel.grounded {
                continue;
            }
            let Some(chassis) = world.body(self.chassis) else {
                return;
            };
            let rel = wheel.contact_point - chassis.transform.position;
            let down = chassis
                .transform
                .transform_vector(wheel.desc.suspension_dir)
                .normalize_or_zero();
            // Positive while the contact point moves toward the ground.
            let closing_speed = chassis.velocity_at(rel).dot(down);

            let spring = wheel.desc.suspension_stiffness * wheel.compression;
            let damper = wheel.desc.suspension_damping * closing_speed;
            let force = (spring + damper).clamp(0.0, self.tuning.max_suspension_force);
            wheel.suspension_force = force;

            let impulse = wheel.contact_normal * (force * dt);
            if let Some(chassis) = world.body_mut(self.chassis) {
                chassis.apply_impulse(impulse, rel);
            }
        }
    }

    fn apply_wheel_friction(
        &mut self,
        world: &mut PhysicsWorld,
        chassis_transform: &Transform,
        dt: f32,
    ) {
        let driven_count = self
            .wheels
            .iter()
            .filter(|w| w.desc.driven && w.grounded)
            .count()
            .max(1) as f32;

        for wheel in &mut self.wheels {
            if !wheel.grounded {
                continue;
            }
            let Some(chassis) = world.body(self.chassis) else {
                return;
            };

            let up_local = -wheel.desc.suspension_dir;
            let steer_rotation = Quat::from_axis_angle(up_local, wheel.steering);
            let forward_local = steer_rotation * up_local.cross(wheel.desc.axle);
            let axle_local = steer_rotation * wheel.desc.axle;

            let normal = wheel.contact_normal;
            let forward = project_on_plane(chassis_transform.transform_vector(forward_local), normal);
            let side = project_on_plane(chassis_transform.transform_vector(axle_local), normal);
            if forward == Vec3::ZERO || side == Vec3::ZERO {
                continue;
            }

            let rel = wheel.contact_point - chassis.transform.position;
            let contact_vel = chassis.velocity_at(rel);

            // Longitudinal: engine drive plus a brake impulse that opposes
            // the rolling direction without reversing it.
            let mut forward_impulse = 0.0;
            if wheel.desc.driven {
                forward_impulse += self.engine_force / driven_count * dt;
            }
            let drag = self.brake_force + self.tuning.rolling_resistance;
            if drag > 0.0 {
                let rolling_speed = contact_vel.dot(forward);
                let denom = chassis.impulse_denominator(rel, forward);
                if denom > 0.0 {
                    let stop_impulse = -rolling_speed / denom;
                    let limit = drag * dt;
                    forward_impulse += stop_impulse.clamp(-limit, limit);
                }
            }

            // Lateral: cancel side slip at the contact.
            let side_speed = contact_vel.dot(side);
            let side_denom = chassis.impulse_denominator(rel, side);
            let mut side_impulse = if side_denom > 0.0 {
                -side_speed / side_denom
            } else {
                0.0
            };

            // Friction circle: grip budget follows the suspension load.
            let grip = wheel.desc.friction_slip * wheel.suspension_force * dt;
            let demand = (forward_impulse * forward_impulse + side_impulse * side_impulse).sqrt();
            let mut scaled_forward = forward_impulse;
            if demand > grip && demand > 1e-6 {
                let scale = grip / demand;
                scaled_forward *= scale;
                side_impulse *= scale;
            }

            // Lateral force is applied closer to the center of mass so high
            // side loads slide the chassis instead of flipping it.
            let chassis_up = chassis_transform.transform_vector(up_local);
            let lift = rel.dot(chassis_up);
            let side_rel = rel - chassis_up * (lift * (1.0 - wheel.desc.roll_influence));

            if let Some(chassis) = world.body_mut(self.chassis) {
                chassis.apply_impulse(forward * scaled_forward, rel);
                chassis.apply_impulse(side * side_impulse, side_rel);
            }
        }
    }

    fn update_wheel_transforms(
        &mut self,
        world: &PhysicsWorld,
        chassis_transform: &Transform,
        dt: f32,
    ) {
        let chassis_vel = world
            .body(self.chassis)
            .map(|c| (c.linvel, c.angvel, c.transform.position));
        for wheel in &mut self.wheels {
            let hard_point = chassis_transform.transform_point(wheel.desc.chassis_connection);
            let dir = chassis_transform
                .transform_vector(wheel.desc.suspension_dir)
                .normalize_or_zero();

            if wheel.grounded {
                if let Some((linvel, angvel, pos)) = chassis_vel {
                    let rel = wheel.contact_point - pos;
                    let vel = linvel + angvel.cross(rel);
                    let up_local = -wheel.desc.suspension_dir;
                    let forward_local = up_local.cross(wheel.desc.axle);
                    let forward = chassis_transform.transform_vector(forward_local);
                    wheel.rotation += vel.dot(forward) * dt / wheel.desc.radius;
                }
            }

            let up_local = -wheel.desc.suspension_dir;
            let steer_rotation = Quat::from_axis_angle(up_local, wheel.steering);
            let spin_rotation = Quat::from_axis_angle(wheel.desc.axle, wheel.rotation);
            wheel.world_transform = Transform::new(
                hard_point + dir * wheel.suspension_length,
                chassis_transform.rotation * steer_rotation * spin_rotation,
            );
        }
    }
}

fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    (v - normal * v.dot(normal)).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steering_clamps_to_tuning_limit() {
        let wheels = [test_wheel(true); 4];
        let mut vehicle = RaycastVehicle::new(BodyId(0), wheels, VehicleTuning::default());
        vehicle.set_steering(10.0);
        assert!((vehicle.steering() - VehicleTuning::default().max_steering_angle).abs() < 1e-6);
        vehicle.set_steering(-10.0);
        assert!((vehicle.steering() + VehicleTuning::default().max_steering_angle).abs() < 1e-6);
    }

    #[test]
    fn engine_force_clamps_to_unit_throttle() {
        let wheels = [test_wheel(false); 4];
        let mut vehicle = RaycastVehicle::new(BodyId(0), wheels, VehicleTuning::default());
        vehicle.set_engine_force(5.0);
        assert!((vehicle.engine_force - vehicle.tuning.max_engine_force).abs() < 1e-3);
    }

    fn test_wheel(steers: bool) -> WheelDesc {
        WheelDesc {
            chassis_connection: Vec3::ZERO,
            suspension_dir: Vec3::NEG_Y,
            axle: Vec3::X,
            rest_length: 0.3,
            radius: 0.35,
            suspension_stiffness: 6000.0,
            suspension_damping: 900.0,
            friction_slip: 10.0,
            roll_influence: 0.2,
            steers,
            driven: !steers,
        }
    }
}
